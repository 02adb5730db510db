//! Login integration tests
//!
//! Tests for POST /registration/edusp:
//! - Two-stage exchange (credentials service, then token redemption)
//! - Failures at each stage
//! - Bodies without credentials forwarded unchanged

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{constants, TestHarness};

fn credentials_body() -> Value {
    json!({ "id": constants::TEST_STUDENT_ID, "password": constants::TEST_PASSWORD })
}

#[tokio::test]
async fn test_login_exchanges_credentials_for_session() {
    let harness = TestHarness::new().await;
    harness
        .credentials
        .mock_login_success(
            constants::TEST_STUDENT_ID,
            constants::TEST_PASSWORD,
            constants::TEST_EXCHANGE_TOKEN,
        )
        .await;
    harness
        .edusp
        .mock_redemption_success(
            constants::TEST_EXCHANGE_TOKEN,
            constants::TEST_AUTH_TOKEN,
            Some("aluno.teste"),
        )
        .await;

    let response = harness
        .server
        .post("/registration/edusp")
        .json(&credentials_body())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "auth_token": constants::TEST_AUTH_TOKEN,
            "nick": "aluno.teste",
            "realm": "edusp"
        })
    );
    assert!(!response.text().contains(constants::TEST_EXCHANGE_TOKEN));

    let redemptions = harness.edusp.redemption_requests().await;
    assert_eq!(redemptions.len(), 1);
}

#[tokio::test]
async fn test_login_defaults_missing_nick_to_empty() {
    let harness = TestHarness::new().await;
    harness
        .credentials
        .mock_login_success(
            constants::TEST_STUDENT_ID,
            constants::TEST_PASSWORD,
            constants::TEST_EXCHANGE_TOKEN,
        )
        .await;
    harness
        .edusp
        .mock_redemption_success(constants::TEST_EXCHANGE_TOKEN, constants::TEST_AUTH_TOKEN, None)
        .await;

    let response = harness
        .server
        .post("/registration/edusp")
        .json(&credentials_body())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["nick"], "");
}

#[tokio::test]
async fn test_login_rejected_credentials_stop_before_redemption() {
    let harness = TestHarness::new().await;
    harness
        .credentials
        .mock_login_rejected(401, "Usuário ou senha inválidos")
        .await;

    let response = harness
        .server
        .post("/registration/edusp")
        .json(&credentials_body())
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Authentication with credentials failed" })
    );
    assert!(!response.text().contains("inválidos"));
    assert!(harness.edusp.redemption_requests().await.is_empty());
}

#[tokio::test]
async fn test_login_without_exchange_token_is_unauthorized() {
    let harness = TestHarness::new().await;
    harness.credentials.mock_login_without_token().await;

    let response = harness
        .server
        .post("/registration/edusp")
        .json(&credentials_body())
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Token not received from credentials service" })
    );
    assert!(harness.edusp.redemption_requests().await.is_empty());
}

#[tokio::test]
async fn test_login_rejected_redemption_is_unauthorized() {
    let harness = TestHarness::new().await;
    harness
        .credentials
        .mock_login_success(
            constants::TEST_STUDENT_ID,
            constants::TEST_PASSWORD,
            constants::TEST_EXCHANGE_TOKEN,
        )
        .await;
    harness.edusp.mock_redemption_rejected(400).await;

    let response = harness
        .server
        .post("/registration/edusp")
        .json(&credentials_body())
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>(), json!({ "error": "Token exchange failed" }));
}

#[tokio::test]
async fn test_login_redemption_without_auth_token_is_unauthorized() {
    let harness = TestHarness::new().await;
    harness
        .credentials
        .mock_login_success(
            constants::TEST_STUDENT_ID,
            constants::TEST_PASSWORD,
            constants::TEST_EXCHANGE_TOKEN,
        )
        .await;
    harness.edusp.mock_redemption_without_auth_token().await;

    let response = harness
        .server
        .post("/registration/edusp")
        .json(&credentials_body())
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_accepts_numeric_id() {
    let harness = TestHarness::new().await;
    harness
        .credentials
        .mock_login_success("123456789", constants::TEST_PASSWORD, constants::TEST_EXCHANGE_TOKEN)
        .await;
    harness
        .edusp
        .mock_redemption_success(constants::TEST_EXCHANGE_TOKEN, constants::TEST_AUTH_TOKEN, None)
        .await;

    let response = harness
        .server
        .post("/registration/edusp")
        .json(&json!({ "id": 123456789, "password": constants::TEST_PASSWORD }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["auth_token"], constants::TEST_AUTH_TOKEN);
}

#[tokio::test]
async fn test_login_with_only_one_credential_is_bad_request() {
    let harness = TestHarness::new().await;

    for body in [
        json!({ "id": constants::TEST_STUDENT_ID }),
        json!({ "password": constants::TEST_PASSWORD }),
        json!({ "id": "   ", "password": constants::TEST_PASSWORD }),
    ] {
        let response = harness.server.post("/registration/edusp").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "body: {}", body);
    }

    assert!(harness.credentials.received_requests().await.is_empty());
    assert!(harness.edusp.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_login_without_credentials_is_forwarded() {
    let harness = TestHarness::new().await;
    let session = json!({ "auth_token": "direct-token", "nick": "aluno" });
    harness
        .edusp
        .mock_json("POST", "/registration/edusp", 200, session.clone())
        .await;

    let body = json!({ "realm": "edusp", "platform": "webclient", "token": "pre-issued" });
    let response = harness.server.post("/registration/edusp").json(&body).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), session);
    assert!(harness.credentials.received_requests().await.is_empty());

    let requests = harness.edusp.received_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/registration/edusp");
    let forwarded: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(forwarded, body);
}
