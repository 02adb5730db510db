//! Mock credentials service for testing
//!
//! Provides wiremock-based mocks for login stage one:
//! - POST /LoginCompletoToken - Trade user/senha for an exchange token

use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::common::constants;

pub const LOGIN_PATH: &str = "/LoginCompletoToken";

/// Mock credentials service wrapper
pub struct MockCredentialsServer {
    server: MockServer,
}

impl MockCredentialsServer {
    /// Start a new mock credentials server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the mock server URI
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Get all received requests (for assertion in tests)
    pub async fn received_requests(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Mock a successful login for exactly these credentials
    pub async fn mock_login_success(&self, user: &str, password: &str, exchange_token: &str) {
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .and(header("ocp-apim-subscription-key", constants::TEST_SUBSCRIPTION_KEY))
            .and(header("origin", constants::TEST_PLATFORM_ORIGIN))
            .and(body_json(serde_json::json!({ "user": user, "senha": password })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": exchange_token,
                "DadosUsuario": { "NAME": "Aluno Teste" }
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock a rejected login carrying an upstream-specific error body
    pub async fn mock_login_rejected(&self, status: u16, detail: &str) {
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(serde_json::json!({ "statusRetorno": detail })),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock a successful status whose body carries no token
    pub async fn mock_login_without_token(&self) {
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "DadosUsuario": {} })),
            )
            .mount(&self.server)
            .await;
    }
}
