//! HTTP routes for the bridge
//!
//! This module defines all HTTP endpoints exposed to the browser client.

pub mod edusp;
pub mod essay;
pub mod fallback;
pub mod health;
pub mod metrics;

use std::any::Any;
use std::sync::Arc;

use axum::{
    handler::HandlerWithoutStateExt,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{docs::ApiDoc, AppState};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // The client page is served from other origins during development
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let platform_routes = Router::new()
        .route("/registration/edusp", post(edusp::login).fallback(fallback::not_found))
        .route("/room/user", get(edusp::room_user).fallback(fallback::not_found))
        .route("/tms/task/todo", get(edusp::task_todo).fallback(fallback::not_found))
        .route(
            "/tms/task/:id/apply",
            get(edusp::task_apply).fallback(fallback::not_found),
        )
        .route("/complete", post(edusp::complete).fallback(fallback::not_found));

    let essay_routes = Router::new().route(
        "/generate_essay",
        post(essay::generate_essay).fallback(fallback::not_found),
    );

    // A known path with the wrong method is reported like an unknown path
    let public_routes = Router::new()
        .route("/ping", get(health::ping).fallback(fallback::not_found))
        .route("/health", get(health::health_check).fallback(fallback::not_found))
        .route("/health/live", get(health::health_check).fallback(fallback::not_found))
        .route("/metrics", get(metrics::prometheus_metrics).fallback(fallback::not_found))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }).fallback(fallback::not_found),
        );

    let router = Router::new()
        .merge(public_routes)
        .merge(platform_routes)
        .merge(essay_routes);

    // Unmatched paths: static client assets when configured, JSON 404 otherwise
    let router = match &state.config.static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir)
                .call_fallback_on_method_not_allowed(true)
                .fallback(fallback::not_found.into_service()),
        ),
        None => router.fallback(fallback::not_found),
    };

    let expose_details = state.config.expose_error_details;

    router
        // Global middleware (applied to all routes)
        .layer(CatchPanicLayer::custom(
            move |err: Box<dyn Any + Send + 'static>| fallback::panic_response(err, expose_details),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
