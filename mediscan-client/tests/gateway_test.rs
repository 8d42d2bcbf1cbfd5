use mediscan_client::services::{GatewayClient, SessionStore};
use mediscan_client::AppError;
use mediscan_core::config::ApiSettings;
use mediscan_core::error::{NETWORK_ERROR, TIMEOUT_ERROR, UNKNOWN_ERROR};
use reqwest::Method;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(base_url: &str, timeout_ms: u64) -> GatewayClient {
    let settings = ApiSettings {
        base_url: base_url.to_string(),
        timeout_ms,
        ..ApiSettings::default()
    };
    GatewayClient::new(&settings, SessionStore::in_memory()).unwrap()
}

#[tokio::test]
async fn slow_endpoint_times_out_with_408() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = gateway(&server.uri(), 200);
    let started = Instant::now();
    let err = client.request(Method::GET, "/slow", None).await.unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(3));
    match &err {
        AppError::Timeout(api) => {
            assert_eq!(api.code, TIMEOUT_ERROR);
            assert_eq!(api.status, 408);
        }
        other => panic!("Expected Timeout, got {:?}", other),
    }
    assert_eq!(err.to_api_error().status, 408);
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    // Nothing listens on port 9 (discard) in the test environment.
    let client = gateway("http://127.0.0.1:9", 2_000);
    let err = client.request(Method::GET, "/anything", None).await.unwrap_err();

    let api = err.to_api_error();
    assert_eq!(api.code, NETWORK_ERROR);
    assert_eq!(api.status, 0);
}

#[tokio::test]
async fn error_response_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analysis/upload"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Unsupported image",
            "code": "BAD_IMAGE",
            "details": {"maxSizeMb": 10}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let client = gateway(&server.uri(), 2_000);

    let api = client
        .request(Method::POST, "/analysis/upload", Some(&json!({})))
        .await
        .unwrap_err()
        .to_api_error();
    assert_eq!(api.message, "Unsupported image");
    assert_eq!(api.code, "BAD_IMAGE");
    assert_eq!(api.status, 422);
    assert_eq!(api.details, Some(json!({"maxSizeMb": 10})));

    let api = client
        .request(Method::GET, "/broken", None)
        .await
        .unwrap_err()
        .to_api_error();
    assert_eq!(api.message, "Bad Gateway");
    assert_eq!(api.code, UNKNOWN_ERROR);
    assert_eq!(api.status, 502);
}

#[tokio::test]
async fn bearer_and_request_id_are_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .and(header("authorization", "Bearer tok-123"))
        .and(header_exists("x-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionStore::in_memory();
    session
        .update_tokens(&mediscan_client::models::TokenPair {
            access_token: "tok-123".to_string(),
            refresh_token: "r".to_string(),
        })
        .unwrap();
    let settings = ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    };
    let client = GatewayClient::new(&settings, session).unwrap();

    let body = client.request(Method::GET, "/users/profile", None).await.unwrap();
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn anonymous_requests_carry_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = gateway(&server.uri(), 2_000);
    let body = client.request(Method::GET, "/public", None).await.unwrap();
    assert_eq!(body, json!({}));

    let received = server.received_requests().await.unwrap();
    let rendered = format!("{:?}", received[0].headers);
    assert!(!rendered.to_lowercase().contains("authorization"));
}

#[tokio::test]
async fn non_json_success_body_is_wrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/text"))
        .respond_with(ResponseTemplate::new(200).set_body_string("queued"))
        .mount(&server)
        .await;

    let client = gateway(&server.uri(), 2_000);
    let body: Value = client.request(Method::GET, "/text", None).await.unwrap();
    assert_eq!(body, json!({"message": "queued"}));
}

#[tokio::test]
async fn typed_helper_rejects_unexpected_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": 1})))
        .mount(&server)
        .await;

    let client = gateway(&server.uri(), 2_000);
    let err = client
        .get::<mediscan_client::models::UserProfile>("/users/profile")
        .await
        .unwrap_err();
    assert_eq!(err.to_api_error().code, "INVALID_RESPONSE");
}

#[tokio::test]
async fn base_url_trailing_slash_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/analysis/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = gateway(&format!("{}/", server.uri()), 2_000);
    let body = client.delete("/analysis/a1").await.unwrap();
    assert_eq!(body["success"], json!(true));
}
