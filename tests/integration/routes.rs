//! Route table integration tests
//!
//! Tests for the non-proxied surface:
//! - GET /ping, GET /health, GET /metrics
//! - GET /api-docs/openapi.json
//! - Unknown routes and static client files

use std::fs;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::TestHarness;

#[tokio::test]
async fn test_ping_returns_pong_without_upstream_calls() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/ping").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "pong");
    assert!(harness.edusp.received_requests().await.is_empty());
    assert!(harness.credentials.received_requests().await.is_empty());
    assert!(harness.openrouter.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_health_reports_healthy() {
    let harness = TestHarness::new().await;

    for route in ["/health", "/health/live"] {
        let response = harness.server.get(route).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.json::<Value>();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["uptime_seconds"].is_u64());
        assert!(body["timestamp"].is_string());
    }
}

#[tokio::test]
async fn test_metrics_endpoint_renders() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/metrics").await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/api-docs/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let doc = response.json::<Value>();
    let paths = doc["paths"].as_object().unwrap();
    for route in [
        "/registration/edusp",
        "/room/user",
        "/tms/task/todo",
        "/tms/task/{id}/apply",
        "/complete",
        "/generate_essay",
        "/health",
    ] {
        assert!(paths.contains_key(route), "missing {}", route);
    }
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/nonexistent").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "Route not found");
    assert_eq!(body["path"], "/nonexistent");
    assert_eq!(body["method"], "GET");
    assert!(harness.edusp.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_wrong_method_on_known_path_returns_json_404() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/complete").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "Route not found");
    assert_eq!(body["path"], "/complete");
    assert_eq!(body["method"], "GET");

    let response = harness.server.post("/ping").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert_eq!(body["path"], "/ping");
    assert_eq!(body["method"], "POST");

    let response = harness.server.get("/generate_essay").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    assert!(harness.edusp.received_requests().await.is_empty());
    assert!(harness.openrouter.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_static_dir_serves_client_files() {
    let dir = std::env::temp_dir().join(format!("redacao-static-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("index.html"), "<html><body>Redação</body></html>").unwrap();
    fs::write(dir.join("app.js"), "console.log('ok');").unwrap();

    let static_dir = dir.clone();
    let harness = TestHarness::with_config(move |config| {
        config.static_dir = Some(static_dir);
    })
    .await;

    let index = harness.server.get("/").await;
    assert_eq!(index.status_code(), StatusCode::OK);
    assert!(index.text().contains("Redação"));

    let script = harness.server.get("/app.js").await;
    assert_eq!(script.status_code(), StatusCode::OK);
    assert_eq!(script.text(), "console.log('ok');");

    let missing = harness.server.get("/missing.css").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(missing.json::<Value>()["path"], "/missing.css");

    // API routes still win over the static directory
    let ping = harness.server.get("/ping").await;
    assert_eq!(ping.text(), "pong");

    fs::remove_dir_all(&dir).unwrap();
}
