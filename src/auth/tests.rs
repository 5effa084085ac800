//! Tests for the auth module

use super::*;
use crate::clock::ManualClock;
use crate::error::Error;
use crate::http::ReqwestTransport;
use base64::Engine;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const T0: i64 = 1_700_000_000_000;

fn authenticator(server: &MockServer, clock: Arc<ManualClock>) -> Authenticator {
    Authenticator::new(
        Credentials::new("a", "b"),
        format!("{}{OAUTH_TOKEN_PATH}", server.uri()),
        Arc::new(ReqwestTransport::from_client(reqwest::Client::new())),
    )
    .with_clock(clock)
}

fn token_body(token: &str, expires_in: i64) -> serde_json::Value {
    serde_json::json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": expires_in
    })
}

#[test]
fn test_basic_auth_value() {
    let value = basic_auth_value(&Credentials::new("a", "b"));
    assert_eq!(value, "Basic YTpi");

    let encoded = basic_auth_value(&Credentials::new("client-id", "s3cr:et"));
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.strip_prefix("Basic ").unwrap())
        .unwrap();
    assert_eq!(String::from_utf8(decoded).unwrap(), "client-id:s3cr:et");
}

#[tokio::test]
async fn test_new_authenticator_has_empty_cache() {
    let server = MockServer::start().await;
    let auth = authenticator(&server, Arc::new(ManualClock::new(T0)));

    assert_eq!(auth.token_cache().await, TokenCache::default());
}

#[tokio::test]
async fn test_generate_token_sends_client_credentials_grant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(header("Authorization", "Basic YTpi"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("T1", 3600)))
        .expect(1)
        .mount(&server)
        .await;

    let auth = authenticator(&server, Arc::new(ManualClock::new(T0)));
    let cache = auth.generate_token().await.unwrap();

    assert_eq!(cache, TokenCache::new("T1", T0 + 3_600_000));
    assert_eq!(auth.token_cache().await, cache);
}

#[tokio::test]
async fn test_generate_token_failure_keeps_cache() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("T1", 3600)))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "Client Authentication failed"
        })))
        .mount(&server)
        .await;

    let auth = authenticator(&server, Arc::new(ManualClock::new(T0)));
    let before = auth.generate_token().await.unwrap();

    let err = auth.generate_token().await.unwrap_err();
    match err {
        Error::Auth {
            status,
            status_text,
        } => {
            assert_eq!(status, 401);
            assert_eq!(status_text, "Unauthorized");
        }
        other => panic!("expected auth error, got {other:?}"),
    }

    assert_eq!(auth.token_cache().await, before);
}

#[tokio::test]
async fn test_generate_token_failure_on_empty_cache() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let auth = authenticator(&server, Arc::new(ManualClock::new(T0)));
    let err = auth.get_token().await.unwrap_err();

    assert!(matches!(err, Error::Auth { status: 503, ref status_text } if status_text == "Service Unavailable"));
    assert!(auth.token_cache().await.is_unset());
}

#[tokio::test]
async fn test_generate_token_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer"
        })))
        .mount(&server)
        .await;

    let auth = authenticator(&server, Arc::new(ManualClock::new(T0)));
    let err = auth.generate_token().await.unwrap_err();

    assert!(matches!(err, Error::TokenResponse { .. }));
    assert!(auth.token_cache().await.is_unset());
}

#[tokio::test]
async fn test_get_token_caches_until_refresh_margin() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("T1", 3600)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("T2", 3600)))
        .expect(1)
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::new(T0));
    let auth = authenticator(&server, Arc::clone(&clock));

    assert_eq!(auth.get_token().await.unwrap(), "T1");
    assert_eq!(auth.get_token().await.unwrap(), "T1");

    // One millisecond before the refresh margin
    clock.set(T0 + 3_600_000 - 60_001);
    assert_eq!(auth.get_token().await.unwrap(), "T1");

    clock.set(T0 + 3_600_000 - 60_000);
    assert_eq!(auth.get_token().await.unwrap(), "T2");
    assert_eq!(
        auth.token_cache().await.expires_at_ms,
        T0 + 3_600_000 - 60_000 + 3_600_000
    );
}

#[tokio::test]
async fn test_generate_token_rejects_out_of_range_lifetime() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("X", i64::MAX / 100)))
        .expect(1)
        .mount(&server)
        .await;

    let auth = authenticator(&server, Arc::new(ManualClock::new(T0)));
    let err = auth.generate_token().await.unwrap_err();

    assert!(matches!(err, Error::TokenResponse { .. }));
    assert!(auth.token_cache().await.is_unset());
}

#[tokio::test]
async fn test_generate_token_rejects_negative_lifetime_and_keeps_cache() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("T1", 3600)))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("T2", -5)))
        .mount(&server)
        .await;

    let auth = authenticator(&server, Arc::new(ManualClock::new(T0)));
    let before = auth.generate_token().await.unwrap();

    let err = auth.generate_token().await.unwrap_err();
    assert!(matches!(err, Error::TokenResponse { .. }));
    assert_eq!(auth.token_cache().await, before);
}
