//! Error types for the token gateway.
//!
//! Defines a unified error type that maps cleanly to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error type for gateway operations.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[allow(dead_code)]
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body for API clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            GateError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
            }
            GateError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                "Configuration error".to_string(),
                Some(msg.clone()),
            ),
            GateError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for gateway operations.
pub type GateResult<T> = Result<T, GateError>;
