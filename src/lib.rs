//! Redacao Bridge - proxy between the essay web client and its upstreams
//!
//! This library provides the core functionality for the bridge server.
//! It relays the browser client's calls to the EduSP platform, runs the
//! two-stage platform login, and forwards essay generation to an LLM
//! provider.

pub mod config;
pub mod docs;
pub mod edusp;
pub mod error;
pub mod essay;
pub mod llm;
pub mod proxy;
pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::edusp::EduspAuthClient;
pub use crate::llm::{ChatProvider, OpenRouterProvider};
pub use crate::proxy::EduspForwarder;

/// Application state shared across all request handlers
///
/// Built once at startup and never mutated afterwards.
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Relays platform calls
    pub forwarder: Arc<EduspForwarder>,
    /// Runs the two-stage login
    pub auth_client: Arc<EduspAuthClient>,
    /// Chat provider used for essay generation
    pub chat_provider: Arc<dyn ChatProvider>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        let http_client = build_http_client(&config)?;
        let chat_provider: Arc<dyn ChatProvider> =
            Arc::new(OpenRouterProvider::new(http_client.clone(), &config)?);

        Self::with_chat_provider(config, http_client, chat_provider)
    }

    /// Create an application state around an existing client and provider
    ///
    /// Every upstream component gets its own handle on the shared client.
    pub fn with_chat_provider(
        config: Config,
        http_client: reqwest::Client,
        chat_provider: Arc<dyn ChatProvider>,
    ) -> Result<Self> {
        let forwarder = Arc::new(EduspForwarder::new(http_client.clone(), &config)?);
        let auth_client = Arc::new(EduspAuthClient::new(http_client, &config)?);

        Ok(Self {
            config,
            start_time: Instant::now(),
            forwarder,
            auth_client,
            chat_provider,
        })
    }
}

/// Shared HTTP client for every upstream
pub fn build_http_client(config: &Config) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(config.upstream_timeout())
        .build()?)
}

/// Configuration with fixed test secrets and production URLs
#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "CREDENTIALS_SUBSCRIPTION_KEY" => Some("test-subscription-key".to_string()),
        "OPENROUTER_API_KEY" => Some("test-openrouter-key".to_string()),
        _ => None,
    })
    .expect("test config")
}
