//! EduSP login client
//!
//! Turns a student's credentials into a platform session token in two
//! strictly ordered calls: the credentials service issues an exchange token,
//! which the registration service redeems for the session token. Each stage
//! makes exactly one round trip.

use axum::http::StatusCode;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT,
};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    config::Config,
    edusp::models::{
        CredentialsRequest, CredentialsResponse, ExchangeToken, LoginCredential,
        RedemptionRequest, RedemptionResponse, SessionResult, EDUSP_REALM,
    },
    error::AppError,
    proxy::RequestContext,
};

/// User agent the platform expects from its web client
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const SUBSCRIPTION_KEY_HEADER: &str = "ocp-apim-subscription-key";

/// Why a login stage stopped
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("credentials service rejected the login with status {0}")]
    CredentialsRejected(StatusCode),

    #[error("credentials service answered without a token")]
    TokenMissing,

    #[error("registration service rejected the token with status {0}")]
    RedemptionRejected(StatusCode),

    #[error("registration service answered without an auth token")]
    AuthTokenMissing,

    #[error("transport error during {stage}: {source}")]
    Transport {
        stage: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response during {stage}: {source}")]
    Malformed {
        stage: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl AuthError {
    /// Metric label for this outcome
    pub fn outcome(&self) -> &'static str {
        match self {
            AuthError::CredentialsRejected(_) | AuthError::TokenMissing => "credentials_rejected",
            AuthError::RedemptionRejected(_) | AuthError::AuthTokenMissing => "redemption_rejected",
            AuthError::Transport { .. } | AuthError::Malformed { .. } => "error",
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::CredentialsRejected(_) => {
                AppError::Authentication("Authentication with credentials failed".to_string())
            }
            AuthError::TokenMissing => AppError::Authentication(
                "Token not received from credentials service".to_string(),
            ),
            AuthError::RedemptionRejected(_) => {
                AppError::Authentication("Token exchange failed".to_string())
            }
            AuthError::AuthTokenMissing => AppError::Authentication(
                "Auth token not received from registration service".to_string(),
            ),
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

/// Client for the two login stages
pub struct EduspAuthClient {
    client: reqwest::Client,
    credentials_url: String,
    redemption_url: String,
    credentials_headers: HeaderMap,
    redemption_headers: HeaderMap,
}

impl EduspAuthClient {
    /// Create a new login client
    pub fn new(client: reqwest::Client, config: &Config) -> anyhow::Result<Self> {
        let origin = HeaderValue::from_str(&config.platform_origin)?;
        let referer = HeaderValue::from_str(&format!("{}/", config.platform_origin))?;

        let mut platform = HeaderMap::new();
        platform.insert(ACCEPT, HeaderValue::from_static("application/json"));
        platform.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        platform.insert(ORIGIN, origin);
        platform.insert(REFERER, referer);
        platform.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let mut credentials_headers = platform.clone();
        credentials_headers.insert(
            HeaderName::from_static(SUBSCRIPTION_KEY_HEADER),
            HeaderValue::from_str(&config.credentials_subscription_key)?,
        );

        let mut redemption_headers = platform;
        redemption_headers.insert(
            HeaderName::from_static("x-api-platform"),
            HeaderValue::from_static("webclient"),
        );
        redemption_headers.insert(
            HeaderName::from_static("x-api-realm"),
            HeaderValue::from_static(EDUSP_REALM),
        );

        Ok(Self {
            client,
            credentials_url: format!("{}/LoginCompletoToken", config.credentials_api_url),
            redemption_url: format!("{}/registration/edusp/token", config.edusp_api_url),
            credentials_headers,
            redemption_headers,
        })
    }

    /// Run both stages; stage two starts only after stage one succeeded
    pub async fn login(&self, credential: &LoginCredential) -> Result<SessionResult, AuthError> {
        let token = self.exchange_credentials(credential).await?;
        self.redeem_token(token).await
    }

    /// Stage one: trade credentials for an exchange token
    #[instrument(skip(self, credential), fields(user = %credential.identifier()))]
    pub async fn exchange_credentials(
        &self,
        credential: &LoginCredential,
    ) -> Result<ExchangeToken, AuthError> {
        const STAGE: &str = "credential exchange";
        let ctx = RequestContext::new("credentials", "/LoginCompletoToken");
        ctx.log_request_start();

        let body = CredentialsRequest {
            user: credential.identifier(),
            senha: credential.secret(),
        };

        let response = self
            .client
            .post(&self.credentials_url)
            .headers(self.credentials_headers.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                ctx.log_transport_error(&e);
                AuthError::Transport { stage: STAGE, source: e }
            })?;

        let status = response.status();
        ctx.log_upstream_response(status.as_u16());

        let text = response
            .text()
            .await
            .map_err(|source| AuthError::Transport { stage: STAGE, source })?;

        if !status.is_success() {
            ctx.log_rejected(status.as_u16(), &text);
            return Err(AuthError::CredentialsRejected(status));
        }

        let parsed: CredentialsResponse = serde_json::from_str(&text).map_err(|source| {
            ctx.log_error("credentials response is not valid JSON");
            AuthError::Malformed { stage: STAGE, source }
        })?;

        match parsed.token.filter(|t| !t.is_empty()) {
            Some(token) => {
                debug!("Exchange token received");
                Ok(ExchangeToken::new(token))
            }
            None => {
                ctx.log_error("credentials response has no token");
                Err(AuthError::TokenMissing)
            }
        }
    }

    /// Stage two: redeem the exchange token for the session token
    #[instrument(skip(self, token))]
    pub async fn redeem_token(&self, token: ExchangeToken) -> Result<SessionResult, AuthError> {
        const STAGE: &str = "token redemption";
        let ctx = RequestContext::new("edusp", "/registration/edusp/token");
        ctx.log_request_start();

        let response = self
            .client
            .post(&self.redemption_url)
            .headers(self.redemption_headers.clone())
            .json(&RedemptionRequest {
                token: token.as_str(),
            })
            .send()
            .await
            .map_err(|e| {
                ctx.log_transport_error(&e);
                AuthError::Transport { stage: STAGE, source: e }
            })?;

        let status = response.status();
        ctx.log_upstream_response(status.as_u16());

        let text = response
            .text()
            .await
            .map_err(|source| AuthError::Transport { stage: STAGE, source })?;

        if !status.is_success() {
            ctx.log_rejected(status.as_u16(), &text);
            return Err(AuthError::RedemptionRejected(status));
        }

        let parsed: RedemptionResponse = serde_json::from_str(&text).map_err(|source| {
            ctx.log_error("registration response is not valid JSON");
            AuthError::Malformed { stage: STAGE, source }
        })?;

        let auth_token = parsed
            .auth_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::AuthTokenMissing)?;

        Ok(SessionResult {
            auth_token,
            nick: parsed.nick.unwrap_or_default(),
            realm: EDUSP_REALM.to_string(),
        })
    }
}
