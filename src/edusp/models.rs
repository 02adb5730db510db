//! EduSP login data models
//!
//! Inbound login contract, the values passed between the two login stages,
//! and the wire structures of the credentials and registration services.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Realm reported back to the client after a successful login
pub const EDUSP_REALM: &str = "edusp";

/// Inbound login body
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Student identifier (RA), accepted as a string or a number
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Decide how a login body is handled
    ///
    /// `Ok(Some(_))` runs the two-stage exchange, `Ok(None)` means the body
    /// carries no credentials and is forwarded as-is.
    pub fn into_credential(self) -> Result<Option<LoginCredential>, AppError> {
        match (self.id, self.password) {
            (None, None) => Ok(None),
            (Some(id), Some(password)) if !id.trim().is_empty() && !password.is_empty() => {
                Ok(Some(LoginCredential::new(id, password)))
            }
            _ => Err(AppError::BadRequest(
                "User and password are required".to_string(),
            )),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Identifier {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Identifier>::deserialize(deserializer)?.map(|id| match id {
        Identifier::Text(text) => text,
        Identifier::Number(number) => number.to_string(),
    }))
}

/// Identifier/secret pair, alive only for the duration of one login
#[derive(Clone)]
pub struct LoginCredential {
    identifier: String,
    secret: String,
}

impl LoginCredential {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for LoginCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredential")
            .field("identifier", &self.identifier)
            .field("secret", &"***")
            .finish()
    }
}

/// Stage-one token, consumed by stage two and never serialized outward
pub struct ExchangeToken(String);

impl ExchangeToken {
    pub(crate) fn new(token: String) -> Self {
        Self(token)
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ExchangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExchangeToken(***)")
    }
}

/// Login result returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionResult {
    /// Session token for subsequent platform calls
    pub auth_token: String,
    /// Display name, empty when the platform has none
    pub nick: String,
    /// Always `edusp`
    pub realm: String,
}

/// Body sent to the credentials service
#[derive(Debug, Serialize)]
pub(crate) struct CredentialsRequest<'a> {
    pub user: &'a str,
    pub senha: &'a str,
}

/// Credentials service answer (only the token matters)
#[derive(Debug, Deserialize)]
pub(crate) struct CredentialsResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Body sent to the registration token endpoint
#[derive(Debug, Serialize)]
pub(crate) struct RedemptionRequest<'a> {
    pub token: &'a str,
}

/// Registration token endpoint answer
#[derive(Debug, Deserialize)]
pub(crate) struct RedemptionResponse {
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub nick: Option<String>,
}
