//! OpenRouter chat provider
//!
//! Sends chat completions to an OpenRouter-compatible API with the app's
//! attribution headers.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::instrument;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    llm::{
        provider::ChatProvider,
        types::{ChatCompletionRequest, ChatCompletionResponse},
    },
    proxy::RequestContext,
};

/// OpenRouter client
pub struct OpenRouterProvider {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider
    pub fn new(client: reqwest::Client, config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            client,
            base_url: config.openrouter_api_url.clone(),
            headers: build_headers(config)?,
        })
    }
}

/// Authorization plus attribution headers sent with every request
fn build_headers(config: &Config) -> anyhow::Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.openrouter_api_key))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("http-referer"),
        HeaderValue::from_str(&config.openrouter_referer)?,
    );
    headers.insert(
        HeaderName::from_static("x-title"),
        HeaderValue::from_bytes(config.openrouter_title.as_bytes())?,
    );

    Ok(headers)
}

#[async_trait]
impl ChatProvider for OpenRouterProvider {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> AppResult<ChatCompletionResponse> {
        let ctx = RequestContext::new(self.name(), "/chat/completions");
        ctx.log_request_start();

        let url = format!("{}/chat/completions", self.base_url);
        ctx.log_upstream_request(&url, None);

        let response = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                ctx.log_transport_error(&e);
                AppError::Generation(e.to_string())
            })?;

        let status = response.status();
        ctx.log_upstream_response(status.as_u16());

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Generation(e.to_string()))?;

        let parsed = serde_json::from_slice::<ChatCompletionResponse>(&body);

        if !status.is_success() {
            let message = parsed
                .ok()
                .and_then(|r| r.error_message().map(str::to_string))
                .unwrap_or_else(|| "LLM provider error".to_string());
            ctx.log_error(&message);
            return Err(AppError::Generation(message));
        }

        parsed.map_err(|e| {
            ctx.log_error(&e.to_string());
            AppError::Generation(format!("Malformed response from LLM provider: {}", e))
        })
    }
}
