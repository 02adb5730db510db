//! LLM provider module
//!
//! Chat-completion provider trait, wire types and the OpenRouter client.

pub mod openrouter;
pub mod provider;
pub mod types;

pub use openrouter::OpenRouterProvider;
pub use provider::ChatProvider;
pub use types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Role};
