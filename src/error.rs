//! Error types for the bridge
//!
//! Every failure is terminal for the current request. Each variant renders to
//! the JSON shape its route family has always returned to the browser client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input on a proxied or login route
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or malformed input on the essay route
    #[error("Invalid essay request: {0}")]
    InvalidEssayRequest(String),

    /// Upstream rejected the credentials or the exchange token
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Network or parse failure while talking to the platform API
    #[error("Upstream error on {endpoint}: {details}")]
    Upstream { endpoint: String, details: String },

    /// Chat completion failed or came back malformed
    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Route not found: {method} {path}")]
    NotFound { method: String, path: String },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn upstream(endpoint: impl Into<String>, details: impl ToString) -> Self {
        AppError::Upstream {
            endpoint: endpoint.into(),
            details: details.to_string(),
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::InvalidEssayRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Upstream { .. } | AppError::Generation(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::BadRequest(msg) | AppError::Authentication(msg) => json!({ "error": msg }),
            AppError::InvalidEssayRequest(msg) | AppError::Generation(msg) => {
                json!({ "success": false, "message": msg })
            }
            AppError::Upstream { endpoint, details } => json!({
                "error": "Failed to communicate with remote server",
                "details": details,
                "endpoint": endpoint,
            }),
            AppError::NotFound { method, path } => json!({
                "error": "Route not found",
                "path": path,
                "method": method,
            }),
            AppError::Internal(e) => {
                error!(error = ?e, "Unhandled internal error");
                json!({
                    "error": "Internal server error",
                    "message": "Internal server error",
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
