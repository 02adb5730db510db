//! EduSP platform endpoints
//!
//! Login runs the two-stage exchange; every other route is relayed to the
//! platform with the same method, path and query.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::{
    edusp::LoginRequest,
    error::{AppError, AppResult},
    proxy::{parse_json_body, ForwardSpec, UpstreamReply},
    routes::metrics::{record_login, record_request},
    AppState,
};

/// Forward a spec and record the outcome under `route`
async fn relay(state: &AppState, route: &'static str, spec: ForwardSpec) -> AppResult<UpstreamReply> {
    let start = Instant::now();
    let result = state.forwarder.forward(spec).await;

    let status = match &result {
        Ok(reply) => reply.status(),
        Err(e) => e.status(),
    };
    record_request(route, status.as_u16(), start.elapsed().as_secs_f64());

    result
}

/// Log in with EduSP credentials
///
/// With `{id, password}` the two-stage exchange runs and only the final
/// session token is returned. A body without credentials is forwarded to the
/// platform unchanged.
#[utoipa::path(
    post,
    path = "/registration/edusp",
    tag = "EduSP",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established", body = crate::edusp::SessionResult),
        (status = 400, description = "Only one of id/password given"),
        (status = 401, description = "Credentials or token exchange rejected"),
        (status = 500, description = "Upstream communication failure")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response> {
    const ROUTE: &str = "/registration/edusp";
    let start = Instant::now();

    let body = parse_json_body(&body)?;
    let request: LoginRequest = match &body {
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| AppError::BadRequest(format!("Invalid login body: {}", e)))?,
        None => LoginRequest::default(),
    };

    let Some(credential) = request.into_credential()? else {
        info!("Login body has no credentials, forwarding as-is");
        let spec = ForwardSpec::new(Method::POST, ["registration", "edusp"])
            .with_headers(headers)
            .with_body(body);
        return Ok(relay(&state, ROUTE, spec).await?.into_response());
    };

    info!(user = %credential.identifier(), "Login request received");

    let result = state.auth_client.login(&credential).await;
    let outcome = match &result {
        Ok(_) => "success",
        Err(e) => e.outcome(),
    };
    record_login(outcome);

    let result = result.map_err(AppError::from);
    let status = match &result {
        Ok(_) => axum::http::StatusCode::OK,
        Err(e) => e.status(),
    };
    record_request(ROUTE, status.as_u16(), start.elapsed().as_secs_f64());

    let session = result?;
    info!(user = %credential.identifier(), "Login succeeded");
    Ok(Json(session).into_response())
}

/// Rooms of the logged-in student
#[utoipa::path(
    get,
    path = "/room/user",
    tag = "EduSP",
    responses((status = 200, description = "Relayed platform response"))
)]
pub async fn room_user(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> AppResult<UpstreamReply> {
    info!("Fetching user rooms");
    let spec = ForwardSpec::new(Method::GET, ["room", "user"])
        .with_query(query)
        .with_headers(headers);
    relay(&state, "/room/user", spec).await
}

/// Pending tasks (essays)
#[utoipa::path(
    get,
    path = "/tms/task/todo",
    tag = "EduSP",
    responses((status = 200, description = "Relayed platform response"))
)]
pub async fn task_todo(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> AppResult<UpstreamReply> {
    info!("Fetching pending tasks");
    let spec = ForwardSpec::new(Method::GET, ["tms", "task", "todo"])
        .with_query(query)
        .with_headers(headers);
    relay(&state, "/tms/task/todo", spec).await
}

/// Open a task for answering
#[utoipa::path(
    get,
    path = "/tms/task/{id}/apply",
    tag = "EduSP",
    params(("id" = String, Path, description = "Task id")),
    responses((status = 200, description = "Relayed platform response"))
)]
pub async fn task_apply(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> AppResult<UpstreamReply> {
    info!(task_id = %id, "Applying to task");
    let spec = ForwardSpec::new(Method::GET, ["tms", "task", id.as_str(), "apply"])
        .with_query(query)
        .with_headers(headers);
    relay(&state, "/tms/task/:id/apply", spec).await
}

/// Save a task answer (draft or submission)
#[utoipa::path(
    post,
    path = "/complete",
    tag = "EduSP",
    request_body = serde_json::Value,
    responses((status = 200, description = "Relayed platform response"))
)]
pub async fn complete(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<UpstreamReply> {
    let body = parse_json_body(&body)?;
    let task_id = body.as_ref().and_then(|b| b.get("task_id")).cloned();
    info!(task_id = ?task_id, "Saving task answer");

    let spec = ForwardSpec::new(Method::POST, ["complete"])
        .with_query(query)
        .with_headers(headers)
        .with_body(body);
    relay(&state, "/complete", spec).await
}
