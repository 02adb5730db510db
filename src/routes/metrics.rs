//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

/// Register all custom metrics
fn register_metrics() {
    metrics::describe_counter!(
        "redacao_requests_total",
        "Total number of requests processed"
    );
    metrics::describe_histogram!(
        "redacao_request_duration_seconds",
        "Request duration in seconds"
    );
    metrics::describe_counter!(
        "redacao_login_total",
        "Login attempts by outcome"
    );
}

/// Prometheus metrics endpoint handler
///
/// Returns metrics in Prometheus text format for scraping.
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a handled request
pub fn record_request(route: &str, status: u16, duration_secs: f64) {
    metrics::counter!(
        "redacao_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("redacao_request_duration_seconds", "route" => route.to_string())
        .record(duration_secs);
}

/// Record a login outcome
pub fn record_login(outcome: &str) {
    metrics::counter!("redacao_login_total", "outcome" => outcome.to_string()).increment(1);
}
