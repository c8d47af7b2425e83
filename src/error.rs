/// Unified error types for the CCIP-Read gateway
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Outer calldata, inner call or DNS-encoded name could not be decoded
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// No entity for the name, no value for the record, or unsupported record
    #[error("Not found: {0}")]
    NotFound(String),

    /// Metadata store failed or timed out
    #[error("Metadata store unavailable: {0}")]
    UpstreamUnavailable(#[from] sqlx::Error),

    /// Missing or invalid startup configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// Stable error code surfaced to clients
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::MalformedRequest(_) => "MalformedRequest",
            GatewayError::NotFound(_) => "NotFound",
            GatewayError::UpstreamUnavailable(_) => "UpstreamUnavailable",
            GatewayError::Configuration(_) | GatewayError::Internal(_) | GatewayError::Io(_) => {
                "InternalServerError"
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Convert GatewayError to HTTP response
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            GatewayError::MalformedRequest(_) | GatewayError::NotFound(_) => self.to_string(),
            GatewayError::UpstreamUnavailable(e) => {
                tracing::error!(error = %e, "metadata store lookup failed");
                "Metadata store unavailable".to_string() // Don't leak details
            }
            _ => {
                tracing::error!(error = %self, "internal gateway error");
                "Internal server error".to_string()
            }
        };

        let body = Json(ErrorResponse {
            error: self.code().to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
