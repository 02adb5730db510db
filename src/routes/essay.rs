//! Essay generation endpoint

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    essay::{self, EssayRequest, EssayResponse},
    routes::metrics::record_request,
    AppState,
};

/// Generate an essay for a genre and assignment text
///
/// Both fields are checked before the provider is called.
#[utoipa::path(
    post,
    path = "/generate_essay",
    tag = "Essay",
    request_body = EssayRequest,
    responses(
        (status = 200, description = "Generated essay text", body = EssayResponse),
        (status = 400, description = "genre or prompt missing"),
        (status = 500, description = "LLM provider failure")
    )
)]
pub async fn generate_essay(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EssayRequest>, JsonRejection>,
) -> AppResult<Json<EssayResponse>> {
    let start = Instant::now();

    let result = async {
        let Json(request) =
            payload.map_err(|rejection| AppError::InvalidEssayRequest(rejection.body_text()))?;
        let (genre, prompt) = request.validate()?;

        let text = essay::generate(
            state.chat_provider.as_ref(),
            &state.config.openrouter_model,
            &genre,
            &prompt,
        )
        .await?;

        info!(genre = %genre, response_len = text.len(), "Essay generated");
        Ok::<_, AppError>(Json(EssayResponse {
            success: true,
            response: text,
        }))
    }
    .await;

    let status = match &result {
        Ok(_) => 200,
        Err(e) => e.status().as_u16(),
    };
    record_request("/generate_essay", status, start.elapsed().as_secs_f64());

    result
}
