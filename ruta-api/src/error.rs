use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use ruta_flow::FlowError;

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
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        match &err {
            FlowError::SessionNotFound(_) | FlowError::JourneyNotFound(_) => {
                AppError::NotFoundError(err.to_string())
            }
            FlowError::InvalidTransition { .. } | FlowError::CallInFlight(_) => {
                AppError::ConflictError(err.to_string())
            }
            FlowError::Validation(_)
            | FlowError::NoSeatsSelected
            | FlowError::JourneyNotBookable(_)
            | FlowError::Seating(_) => AppError::ValidationError(err.to_string()),
            FlowError::Internal(_) => AppError::InternalServerError(err.to_string()),
        }
    }
}
