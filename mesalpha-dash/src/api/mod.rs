//! HTTP API handlers for mesalpha-dash
//!
//! JSON boundary to the presentation layer. Display sentinels
//! (`"Sem Falha"`, `HH:MM` durations) are applied here and nowhere deeper.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mesalpha_common::Error;
use serde_json::json;

pub mod health;
pub mod maintenance;
pub mod production;
pub mod snapshot;

pub use health::health_routes;
pub use maintenance::get_maintenance;
pub use production::{get_filter_options, get_production};
pub use snapshot::get_snapshot;

/// API errors
#[derive(Debug)]
pub enum ApiError {
    InvalidInput(String),
    StoreUnavailable(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => ApiError::InvalidInput(msg),
            Error::StoreUnavailable(msg) => ApiError::StoreUnavailable(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, format!("Invalid input: {}", msg))
            }
            ApiError::StoreUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Record store unavailable: {}", msg),
            ),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Internal error: {}", msg))
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
