//! Error types for the compliance gateway.
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
pub enum GatewayError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// A write request carried a body that is not JSON.
    #[error("Malformed JSON body: {0}")]
    MalformedBody(serde_json::Error),

    /// The upstream could not be reached or the exchange broke mid-flight.
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The upstream declared JSON but sent something else.
    #[error("Upstream returned invalid JSON: {0}")]
    InvalidUpstreamBody(#[from] serde_json::Error),

    /// A third-party API answered with a non-success status.
    #[error("Upstream responded {status}: {message}")]
    UpstreamStatus { status: StatusCode, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

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

const GENERIC_FAILURE: &str = "Internal server error";

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            GatewayError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            GatewayError::MalformedBody(e) => (
                StatusCode::BAD_REQUEST,
                "MALFORMED_BODY",
                "Request body is not valid JSON".to_string(),
                Some(e.to_string()),
            ),
            GatewayError::Upstream(e) => {
                tracing::error!(error = %e, "Upstream request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_UNAVAILABLE",
                    GENERIC_FAILURE.to_string(),
                    None,
                )
            }
            GatewayError::InvalidUpstreamBody(e) => {
                tracing::error!(error = %e, "Upstream body could not be parsed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_INVALID",
                    GENERIC_FAILURE.to_string(),
                    None,
                )
            }
            GatewayError::UpstreamStatus { status, message } => {
                tracing::warn!(status = %status, error = %message, "Upstream rejected request");
                (*status, "UPSTREAM_ERROR", message.clone(), None)
            }
            GatewayError::Config(msg) => {
                tracing::error!(error = %msg, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIG_ERROR",
                    "Configuration error".to_string(),
                    None,
                )
            }
            GatewayError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    GENERIC_FAILURE.to_string(),
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
pub type GatewayResult<T> = Result<T, GatewayError>;
