//! Tests for the HTTP client module

use super::*;
use crate::auth::{Authenticator, CachedToken};
use crate::config::{AuthGrant, MoloniConfig};
use crate::error::Error;
use crate::types::BackoffType;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> HttpClientConfig {
    HttpClientConfig {
        base_url: server.uri(),
        backoff_type: BackoffType::Constant,
        initial_backoff: Duration::from_millis(10),
        max_backoff: Duration::from_secs(1),
        rate_limit: None,
        ..HttpClientConfig::default()
    }
}

fn static_token(token: &str) -> Arc<Authenticator> {
    Arc::new(Authenticator::new(&MoloniConfig {
        auth: AuthGrant::AccessToken {
            access_token: token.to_string(),
        },
        ..MoloniConfig::default()
    }))
}

fn read(body: serde_json::Value) -> RequestConfig {
    RequestConfig::new().json(body).read_only(true)
}

fn write(body: serde_json::Value) -> RequestConfig {
    RequestConfig::new().json(body)
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.base_url, "https://api.moloni.pt");
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert!(config.rate_limit.is_some());
    assert!(config.user_agent.starts_with("moloni-client/"));
}

#[test]
fn test_request_config() {
    let config = RequestConfig::new()
        .query("json", "true")
        .query("human_errors", "true")
        .json(json!({"company_id": 5}));

    assert_eq!(
        config.query,
        vec![
            ("json".to_string(), "true".to_string()),
            ("human_errors".to_string(), "true".to_string())
        ]
    );
    assert!(config.body.is_some());
    assert!(!config.read_only);
    assert!(config.read_only(true).read_only);
}

#[test]
fn test_build_url() {
    let client = HttpClient::with_config(HttpClientConfig {
        base_url: "https://api.moloni.pt/".to_string(),
        rate_limit: None,
        ..HttpClientConfig::default()
    })
    .unwrap();

    assert_eq!(
        client.build_url("/v1/taxes/getAll/"),
        "https://api.moloni.pt/v1/taxes/getAll/"
    );
    assert_eq!(
        client.build_url("v1/grant/"),
        "https://api.moloni.pt/v1/grant/"
    );
}

#[tokio::test]
async fn test_post_sends_query_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/taxes/getAll/"))
        .and(query_param("json", "true"))
        .and(body_json(json!({"company_id": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"tax_id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::with_config(test_config(&server)).unwrap();
    let response = client
        .post(
            "/v1/taxes/getAll/",
            read(json!({"company_id": 5})).query("json", "true"),
        )
        .await
        .unwrap();

    let data: serde_json::Value = response.json().await.unwrap();
    assert_eq!(data[0]["tax_id"], 1);
}

#[tokio::test]
async fn test_post_attaches_access_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/companies/getAll/"))
        .and(query_param("access_token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = HttpClient::with_config(test_config(&server)).unwrap();
    client.set_authenticator(static_token("tok"));

    let response = client
        .post("/v1/companies/getAll/", read(json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_post_refreshes_token_on_401() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/taxes/insert/"))
        .and(query_param("access_token", "stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_token",
            "error_description": "The access token provided is invalid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/grant/"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "expires_in": 3600,
            "refresh_token": "r2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/taxes/insert/"))
        .and(query_param("access_token", "fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": 1, "tax_id": 9})))
        .expect(1)
        .mount(&server)
        .await;

    let auth_config = MoloniConfig {
        base_url: server.uri(),
        client_id: "id".to_string(),
        client_secret: "secret".to_string(),
        auth: AuthGrant::Password {
            username: "u".to_string(),
            password: "p".to_string(),
        },
        ..MoloniConfig::default()
    };
    let auth = Arc::new(Authenticator::new(&auth_config));
    auth.set_token(CachedToken::expires_in("stale", Some("r1".to_string()), 3600))
        .await;

    let mut client = HttpClient::with_config(test_config(&server)).unwrap();
    client.set_authenticator(auth);

    // A 401 is rejected before any work, so even writes are resent
    let response = client
        .post("/v1/taxes/insert/", write(json!({"name": "IVA"})))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_post_401_with_static_token_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_token"))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = HttpClient::with_config(test_config(&server)).unwrap();
    client.set_authenticator(static_token("revoked"));

    let err = client.post("/v1/x/y/", read(json!({}))).await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 401, .. }));
}

#[tokio::test]
async fn test_post_404_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/nothing/here/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::with_config(test_config(&server)).unwrap();
    let err = client
        .post("/v1/nothing/here/", read(json!({})))
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "Not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_read_retried_on_500() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/taxes/getAll/"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/taxes/getAll/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = HttpClient::with_config(test_config(&server)).unwrap();
    let response = client
        .post("/v1/taxes/getAll/", read(json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_write_not_resent_after_502() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/taxes/insert/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/taxes/insert/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": 1, "tax_id": 9})))
        .expect(0)
        .mount(&server)
        .await;

    let client = HttpClient::with_config(test_config(&server)).unwrap();
    let err = client
        .post("/v1/taxes/insert/", write(json!({"name": "IVA"})))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 502, .. }));
}

#[tokio::test]
async fn test_write_not_resent_after_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/invoices/insert/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"valid": 1, "document_id": 1}))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = HttpClientConfig {
        timeout: Duration::from_millis(50),
        ..test_config(&server)
    };
    let client = HttpClient::with_config(config).unwrap();
    let err = client
        .post("/v1/invoices/insert/", write(json!({})))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { timeout_ms: 50 }));
}

#[tokio::test]
async fn test_write_retried_after_429() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/customers/insert/"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/customers/insert/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"valid": 1, "customer_id": 3})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::with_config(test_config(&server)).unwrap();
    let response = client
        .post("/v1/customers/insert/", write(json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_read_gives_up_after_max_retries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/taxes/getAll/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Unavailable"))
        .expect(3)
        .mount(&server)
        .await;

    let config = HttpClientConfig {
        max_retries: 2,
        ..test_config(&server)
    };
    let client = HttpClient::with_config(config).unwrap();
    let err = client
        .post("/v1/taxes/getAll/", read(json!({})))
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "Unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_calculate_backoff() {
    let make = |backoff_type| {
        HttpClient::with_config(HttpClientConfig {
            backoff_type,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(500),
            rate_limit: None,
            ..HttpClientConfig::default()
        })
        .unwrap()
    };

    let constant = make(BackoffType::Constant);
    assert_eq!(constant.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(constant.calculate_backoff(5), Duration::from_millis(100));

    let linear = make(BackoffType::Linear);
    assert_eq!(linear.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(linear.calculate_backoff(2), Duration::from_millis(300));

    let exponential = make(BackoffType::Exponential);
    assert_eq!(exponential.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(exponential.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(exponential.calculate_backoff(10), Duration::from_millis(500));
}

#[test]
fn test_http_client_debug() {
    let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("HttpClient"));
    assert!(debug_str.contains("has_authenticator: false"));
    assert!(debug_str.contains("has_rate_limiter: true"));
}
