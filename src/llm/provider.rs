//! Chat provider abstraction layer
//!
//! Defines the trait interface for chat-completion backends so the
//! application state can hold any provider behind `Arc<dyn ChatProvider>`.

use async_trait::async_trait;

use crate::{
    error::AppResult,
    llm::types::{ChatCompletionRequest, ChatCompletionResponse},
};

/// Trait defining the interface for chat-completion providers
///
/// Implementations authenticate with their own configured key and never
/// forward client headers upstream.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Get the provider name for logging and metrics
    fn name(&self) -> &'static str;

    /// Send one non-streaming chat completion request
    ///
    /// Non-success statuses and unparseable bodies are returned as
    /// `AppError::Generation` carrying the provider's message when present.
    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> AppResult<ChatCompletionResponse>;
}
