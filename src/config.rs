//! Configuration management for the bridge
//!
//! Configuration is loaded from environment variables once at startup.
//! Secrets have no built-in fallback: a missing key fails startup.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// EduSP platform API base URL (rooms, tasks, token redemption)
    pub edusp_api_url: String,
    /// Credentials service base URL (first login stage)
    pub credentials_api_url: String,
    /// Subscription key sent to the credentials service
    pub credentials_subscription_key: String,
    /// Origin the platform expects its web client to come from
    pub platform_origin: String,

    /// OpenRouter-compatible chat completion API URL
    pub openrouter_api_url: String,
    /// OpenRouter API key
    pub openrouter_api_key: String,
    /// Model used for essay generation
    pub openrouter_model: String,
    /// Attribution sent as `HTTP-Referer`
    pub openrouter_referer: String,
    /// Attribution sent as `X-Title`
    pub openrouter_title: String,

    /// Timeout applied to every upstream request
    pub upstream_timeout_seconds: u64,

    /// Directory with the browser client, served for unmatched GET paths
    pub static_dir: Option<PathBuf>,

    /// Include panic details in 500 responses (development only)
    pub expose_error_details: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            host: or("HOST", "0.0.0.0"),
            port: or("PORT", "3000").parse().context("Invalid PORT")?,

            edusp_api_url: trim_base(or("EDUSP_API_URL", "https://edusp-api.ip.tv")),
            credentials_api_url: trim_base(or(
                "CREDENTIALS_API_URL",
                "https://sedintegracoes.educacao.sp.gov.br/credenciais/api",
            )),
            credentials_subscription_key: lookup("CREDENTIALS_SUBSCRIPTION_KEY")
                .context("CREDENTIALS_SUBSCRIPTION_KEY must be set")?,
            platform_origin: trim_base(or(
                "PLATFORM_ORIGIN",
                "https://saladofuturo.educacao.sp.gov.br",
            )),

            openrouter_api_url: trim_base(or("OPENROUTER_API_URL", "https://openrouter.ai/api/v1")),
            openrouter_api_key: lookup("OPENROUTER_API_KEY")
                .context("OPENROUTER_API_KEY must be set")?,
            openrouter_model: or("OPENROUTER_MODEL", "openai/gpt-oss-120b:free"),
            openrouter_referer: or("OPENROUTER_REFERER", "https://network-redacao.onrender.com"),
            openrouter_title: or("OPENROUTER_TITLE", "Network Redação"),

            upstream_timeout_seconds: or("UPSTREAM_TIMEOUT_SECONDS", "30")
                .parse()
                .context("Invalid UPSTREAM_TIMEOUT_SECONDS")?,

            static_dir: lookup("STATIC_DIR").filter(|s| !s.is_empty()).map(PathBuf::from),

            expose_error_details: or("APP_ENV", "production") != "production",
        })
    }

    /// Upstream request timeout
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
