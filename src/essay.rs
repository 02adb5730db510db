//! Essay generation
//!
//! Wraps the student's genre and assignment text in a fixed instruction and
//! asks the chat provider for a complete essay. The genre and prompt are
//! embedded verbatim. The answer is returned as-is; by convention it holds a
//! `TITULO:` line followed by `TEXTO:`, which the client parses.

use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    llm::{ChatCompletionRequest, ChatMessage, ChatProvider},
};

/// Sampling temperature for every essay
pub const ESSAY_TEMPERATURE: f64 = 0.7;

/// Output cap for every essay
pub const ESSAY_MAX_TOKENS: u32 = 2000;

/// Inbound essay request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EssayRequest {
    /// Essay genre, e.g. `dissertativo`
    #[serde(default)]
    pub genre: Option<String>,
    /// Assignment statement and supporting texts
    #[serde(default)]
    pub prompt: Option<String>,
}

impl EssayRequest {
    /// Check presence of both fields, returning `(genre, prompt)`
    pub fn validate(self) -> AppResult<(String, String)> {
        let genre = present(self.genre)
            .ok_or_else(|| AppError::InvalidEssayRequest("genre is required".to_string()))?;
        let prompt = present(self.prompt)
            .ok_or_else(|| AppError::InvalidEssayRequest("prompt is required".to_string()))?;
        Ok((genre, prompt))
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Essay returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EssayResponse {
    pub success: bool,
    /// Generated text, unparsed
    pub response: String,
}

/// Build the instruction message for a genre and assignment
pub fn build_prompt(genre: &str, prompt: &str) -> String {
    format!(
        "Você é um assistente especializado em escrever redações escolares.\n\
         Gênero: {genre}.\n\
         Baseie-se no seguinte enunciado e textos de apoio para produzir uma redação completa, com título e desenvolvimento.\n\
         Formate a resposta exatamente assim:\n\
         \n\
         TITULO: (título da redação)\n\
         TEXTO: (texto completo da redação, com parágrafos)\n\
         \n\
         Segue o conteúdo:\n\
         {prompt}"
    )
}

/// Build the chat completion request for an essay
pub fn essay_completion_request(model: &str, genre: &str, prompt: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::user(build_prompt(genre, prompt))],
        temperature: ESSAY_TEMPERATURE,
        max_tokens: ESSAY_MAX_TOKENS,
    }
}

/// Generate an essay and return the provider's text
pub async fn generate(
    provider: &dyn ChatProvider,
    model: &str,
    genre: &str,
    prompt: &str,
) -> AppResult<String> {
    let request = essay_completion_request(model, genre, prompt);

    info!(
        provider = provider.name(),
        model = %model,
        genre = %genre,
        prompt_len = prompt.len(),
        "Generating essay"
    );

    let response = provider.chat_completion(&request).await?;

    response
        .first_content()
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::Generation(
                response
                    .error_message()
                    .unwrap_or("LLM provider returned no content")
                    .to_string(),
            )
        })
}
