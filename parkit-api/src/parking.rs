use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use parkit_core::FixedInput;
use parkit_shared::{ParkingSpot, Ticket, VehicleCategory};
use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    /// 1 = car, 2 = bike
    pub selection: i32,
    pub registration: String,
}

#[derive(Debug, Deserialize)]
pub struct ExitRequest {
    pub registration: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/parking/entries", post(enter_vehicle))
        .route("/parking/exits", post(exit_vehicle))
        .route("/parking/spots", get(list_spots))
        .route("/parking/tickets/{registration}", get(list_tickets))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /parking/entries
/// Allocate a spot and open a ticket
pub async fn enter_vehicle(
    State(state): State<AppState>,
    Json(req): Json<EntryRequest>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    let service = state.parking_service(Arc::new(FixedInput::entry(req.selection, req.registration)));

    let _guard = state.workflow_lock.lock().await;
    match service.process_incoming_vehicle().await? {
        Some(ticket) => Ok((StatusCode::CREATED, Json(ticket))),
        None => {
            let category = VehicleCategory::from_selection(req.selection)
                .map(|c| c.to_string())
                .unwrap_or_default();
            Err(AppError::ConflictError(format!("No {} parking spot available", category)))
        }
    }
}

/// POST /parking/exits
/// Close the open ticket and return the fare
pub async fn exit_vehicle(
    State(state): State<AppState>,
    Json(req): Json<ExitRequest>,
) -> Result<Json<Ticket>, AppError> {
    let service = state.parking_service(Arc::new(FixedInput::exit(req.registration)));

    let _guard = state.workflow_lock.lock().await;
    let ticket = service.process_exiting_vehicle().await?;
    Ok(Json(ticket))
}

/// GET /parking/spots
pub async fn list_spots(State(state): State<AppState>) -> Result<Json<Vec<ParkingSpot>>, AppError> {
    Ok(Json(state.spots.list_spots().await?))
}

/// GET /parking/tickets/{registration}
/// Visit history for one vehicle, oldest first
pub async fn list_tickets(
    State(state): State<AppState>,
    Path(registration): Path<String>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    Ok(Json(state.tickets.list_tickets(&registration).await?))
}
