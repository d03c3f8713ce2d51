//! API error types and HTTP status mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::scheduler::EngineError;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// API error type that can be converted to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request (e.g., unrecognized time specification).
    BadRequest(String),
    /// Resource not found.
    NotFound(String),
    /// Request conflict (e.g., no unique label left).
    Conflict(String),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidTimeSpec(e) => ApiError::BadRequest(e.to_string()),
            EngineError::LabelExhausted(label) => {
                ApiError::Conflict(format!("no unique schedule label available for: {}", label))
            }
            EngineError::ScheduleNotFound(title) => {
                ApiError::NotFound(format!("schedule not found: {}", title))
            }
            EngineError::Config(e) => ApiError::Internal(e.to_string()),
            EngineError::ChannelError(msg) => ApiError::Internal(msg),
        }
    }
}
