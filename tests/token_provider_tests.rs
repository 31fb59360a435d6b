//! Authorization-code provider against a mocked token endpoint.

use futures::future::join_all;
use serde_json::json;
use uhome::auth::{AuthorizationCodeProvider, TokenProvider};
use uhome::error::UhomeError;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> AuthorizationCodeProvider {
    AuthorizationCodeProvider::new(reqwest::Client::new(), "cid", "ABC")
        .with_token_url(format!("{}/token", server.uri()))
}

#[tokio::test]
async fn first_call_exchanges_authorization_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("client_id=cid"))
        .and(body_string_contains("code=ABC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server);
    assert_eq!(provider.access_token().await.unwrap(), "access-1");

    let cached = provider.cached_token().expect("token cached");
    assert_eq!(cached.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(cached.raw["expires_in"], 3600);
}

#[tokio::test]
async fn unexpired_token_is_reused_without_token_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server);
    for _ in 0..3 {
        assert_eq!(provider.access_token().await.unwrap(), "access-1");
    }
    let results = join_all((0..5).map(|_| provider.access_token())).await;
    assert!(results.iter().all(|r| r.as_deref().ok() == Some("access-1")));
}

#[tokio::test]
async fn expired_token_triggers_exactly_one_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "expires_in": 0
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-2",
            "refresh_token": "refresh-2",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server);
    assert_eq!(provider.access_token().await.unwrap(), "access-1");
    assert_eq!(provider.access_token().await.unwrap(), "access-2");
    assert_eq!(provider.access_token().await.unwrap(), "access-2");
}

#[tokio::test]
async fn seeded_refresh_token_skips_code_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=kept"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-r",
            "expires_in": 60
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider =
        AuthorizationCodeProvider::from_refresh_token(reqwest::Client::new(), "cid", "kept")
            .with_token_url(format!("{}/token", server.uri()));
    assert_eq!(provider.access_token().await.unwrap(), "access-r");
}

#[tokio::test]
async fn error_field_fails_with_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "code expired"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server);
    match provider.access_token().await {
        Err(UhomeError::Authentication(msg)) => assert!(msg.contains("invalid_grant")),
        other => panic!("expected Authentication, got {other:?}"),
    }
    assert!(provider.cached_token().is_none());
}

#[tokio::test]
async fn non_success_status_fails_with_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server);
    match provider.access_token().await {
        Err(UhomeError::Transport { status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body, "bad request");
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_fails_with_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server);
    assert!(matches!(
        provider.access_token().await,
        Err(UhomeError::Authentication(_))
    ));
}

#[tokio::test]
async fn missing_lifetime_fails_with_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "a"})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server);
    assert!(matches!(
        provider.access_token().await,
        Err(UhomeError::Authentication(_))
    ));
    assert!(provider.cached_token().is_none());
}

#[tokio::test]
async fn non_rotating_refresh_token_is_reused() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "r1",
            "expires_in": 0
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-2",
            "expires_in": 0
        })))
        .expect(2)
        .mount(&server)
        .await;

    let provider = provider(&server);
    assert_eq!(provider.access_token().await.unwrap(), "access-1");
    assert_eq!(provider.access_token().await.unwrap(), "access-2");
    assert_eq!(provider.access_token().await.unwrap(), "access-2");

    let bodies: Vec<String> = server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
        .collect();
    assert_eq!(bodies.len(), 3);
    assert!(bodies[2].contains("grant_type=refresh_token"));
    assert!(!bodies[2].contains("code=ABC"));
    assert_eq!(
        provider.cached_token().and_then(|t| t.refresh_token),
        Some("r1".to_string())
    );
}
