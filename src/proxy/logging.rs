//! Request logging utilities for upstream calls
//!
//! Provides structured logging with correlation IDs so a single browser
//! action can be followed through the platform and LLM calls it triggers.
//! Nothing logged here carries credentials or tokens.

use std::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Context for tracking a request through the system
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Upstream handling this request
    pub upstream: String,
    /// Upstream endpoint being called
    pub endpoint: String,
    /// HTTP method sent upstream
    pub method: String,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(upstream: &str, endpoint: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(), // Short ID for readability
            start_time: Instant::now(),
            upstream: upstream.to_string(),
            endpoint: endpoint.to_string(),
            method: "POST".to_string(),
        }
    }

    /// Set the HTTP method
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Log request initiation
    pub fn log_request_start(&self) {
        info!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            method = %self.method,
            endpoint = %self.endpoint,
            "Request started"
        );
    }

    /// Log request being sent to upstream
    pub fn log_upstream_request(&self, url: &str, body_size: Option<usize>) {
        debug!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            url = %url,
            body_size = ?body_size,
            elapsed_ms = %self.elapsed_ms(),
            "Sending request to upstream"
        );
    }

    /// Log response received from upstream
    pub fn log_upstream_response(&self, status: u16) {
        info!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            method = %self.method,
            endpoint = %self.endpoint,
            status = %status,
            elapsed_ms = %self.elapsed_ms(),
            "Response received from upstream"
        );
    }

    /// Log upstream rejection; the body is logged, never returned to the client
    pub fn log_rejected(&self, status: u16, body: &str) {
        error!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            endpoint = %self.endpoint,
            status = %status,
            body = %body,
            elapsed_ms = %self.elapsed_ms(),
            "Upstream rejected request"
        );
    }

    /// Log request failure
    pub fn log_error(&self, error: &str) {
        error!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            method = %self.method,
            endpoint = %self.endpoint,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Request failed"
        );
    }

    /// Log a transport failure, distinguishing timeouts
    pub fn log_transport_error(&self, err: &reqwest::Error) {
        if err.is_timeout() {
            error!(
                trace_id = %self.trace_id,
                upstream = %self.upstream,
                endpoint = %self.endpoint,
                elapsed_ms = %self.elapsed_ms(),
                "Request timed out"
            );
        } else {
            error!(
                trace_id = %self.trace_id,
                upstream = %self.upstream,
                endpoint = %self.endpoint,
                elapsed_ms = %self.elapsed_ms(),
                error = %err,
                "Connection to upstream failed"
            );
        }
    }
}
