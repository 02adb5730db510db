//! Fallback handlers
//!
//! Unmatched routes get a JSON 404; panics anywhere in the stack become a
//! JSON 500.

use std::any::Any;

use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::AppError;

/// 404 for any route nothing else handled
pub async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::NotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

/// Render a caught panic; the panic message is only included on request
pub fn panic_response(err: Box<dyn Any + Send + 'static>, expose_details: bool) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    error!(details = %details, "Handler panicked");

    let mut body = json!({
        "error": "Internal server error",
        "message": "Internal server error",
    });
    if expose_details {
        body["details"] = json!(details);
    }

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
