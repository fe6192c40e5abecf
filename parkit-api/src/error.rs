use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parkit_fare::FareError;
use parkit_service::ParkingError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<ParkingError> for AppError {
    fn from(err: ParkingError) -> Self {
        match err {
            ParkingError::InvalidSelection(_)
            | ParkingError::InvalidRegistration
            | ParkingError::Input(_)
            | ParkingError::Fare(FareError::InvalidInterval { .. }) => {
                AppError::ValidationError(err.to_string())
            }
            // A category missing from the rate table is a server misconfiguration
            ParkingError::Fare(FareError::UnsupportedCategory(_)) => {
                AppError::InternalServerError(err.to_string())
            }
            ParkingError::TicketNotFound(_) => AppError::NotFoundError(err.to_string()),
            ParkingError::TicketNotUpdated(_) => AppError::ConflictError(err.to_string()),
            ParkingError::Store(_) => AppError::InternalServerError(err.to_string()),
        }
    }
}

impl From<parkit_core::StoreError> for AppError {
    fn from(err: parkit_core::StoreError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}
