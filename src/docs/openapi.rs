//! OpenAPI specification for the bridge API
//!
//! Aggregates all browser-facing endpoints and schemas into a single OpenAPI
//! document. Relayed platform responses are opaque and carry no schema.

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::{
    edusp::{LoginRequest, SessionResult},
    essay::{EssayRequest, EssayResponse},
    routes::health::{HealthResponse, HealthStatus},
};

/// OpenAPI specification for the bridge API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Redacao Bridge API",
        version = "1.0.0",
        description = "Proxy between the essay web client, the EduSP platform and the LLM provider"
    ),
    paths(
        crate::routes::edusp::login,
        crate::routes::edusp::room_user,
        crate::routes::edusp::task_todo,
        crate::routes::edusp::task_apply,
        crate::routes::edusp::complete,
        crate::routes::essay::generate_essay,
        crate::routes::health::ping,
        crate::routes::health::health_check,
    ),
    components(
        schemas(
            LoginRequest,
            SessionResult,
            EssayRequest,
            EssayResponse,
            HealthStatus,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "EduSP", description = "Login and platform pass-through endpoints"),
        (name = "Essay", description = "Essay generation"),
        (name = "Health", description = "Liveness checks")
    )
)]
pub struct ApiDoc;

/// Platform session token, forwarded as the `x-api-key` header
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "platform_session",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-api-key"))),
            );
        }
    }
}
