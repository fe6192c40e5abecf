use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use parkit_api::{app, AppState};
use parkit_store::app_config::Config;
use serde_json::{json, Value};
use tower::ServiceExt;

const CONFIG: &str = r#"
    [server]
    port = 0

    [facility]
    car_spots = 2
    bike_spots = 1
"#;

fn test_app() -> (Router, AppState) {
    let config = Config::from_toml(CONFIG).expect("Failed to parse config");
    let state = AppState::in_memory(&config);
    (app(state.clone()), state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_entry_then_exit() {
    let (app, _) = test_app();

    let (status, ticket) = send(
        &app,
        "POST",
        "/parking/entries",
        Some(json!({ "selection": 1, "registration": "ABCDEF" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ticket["spot"]["id"], 1);
    assert_eq!(ticket["spot"]["category"], "CAR");
    assert!(ticket["out_time"].is_null());

    let (_, spots) = send(&app, "GET", "/parking/spots", None).await;
    assert_eq!(spots[0]["is_available"], false);
    assert_eq!(spots[1]["is_available"], true);

    let (status, closed) = send(
        &app,
        "POST",
        "/parking/exits",
        Some(json!({ "registration": "ABCDEF" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!closed["out_time"].is_null());
    // Immediate exit falls inside the grace period
    assert_eq!(closed["price"], 0.0);
    assert_eq!(closed["discount_applied"], false);

    let (_, spots) = send(&app, "GET", "/parking/spots", None).await;
    assert_eq!(spots[0]["is_available"], true);

    let (status, history) = send(&app, "GET", "/parking/tickets/ABCDEF", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_second_visit_flags_discount() {
    let (app, _) = test_app();
    let entry = json!({ "selection": 1, "registration": "ABCDEF" });
    let exit = json!({ "registration": "ABCDEF" });

    send(&app, "POST", "/parking/entries", Some(entry.clone())).await;
    send(&app, "POST", "/parking/exits", Some(exit.clone())).await;
    send(&app, "POST", "/parking/entries", Some(entry)).await;
    let (status, closed) = send(&app, "POST", "/parking/exits", Some(exit)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["discount_applied"], true);
}

#[tokio::test]
async fn test_full_facility_is_conflict() {
    let (app, state) = test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/parking/entries",
        Some(json!({ "selection": 2, "registration": "BIKE01" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/parking/entries",
        Some(json!({ "selection": 2, "registration": "BIKE02" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "No BIKE parking spot available");
    assert!(state.tickets.list_tickets("BIKE02").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_entries_are_rejected() {
    let (app, _) = test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/parking/entries",
        Some(json!({ "selection": 3, "registration": "ABCDEF" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/parking/entries",
        Some(json!({ "selection": 1, "registration": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_exit_without_ticket_is_not_found() {
    let (app, _) = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/parking/exits",
        Some(json!({ "registration": "UNKNOWN" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No open ticket for vehicle UNKNOWN");
}
