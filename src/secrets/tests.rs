//! Tests for the secret vault client

use super::*;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn encoded(value: &str) -> String {
    BASE64.encode(value.as_bytes())
}

#[tokio::test]
async fn test_get_secret_decodes_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/2.0/secrets/get"))
        .and(query_param("scope", "prod-warehouse"))
        .and(query_param("key", "password"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "password",
            "value": encoded("hunter2"),
        })))
        .mount(&server)
        .await;

    let client = VaultClient::new(server.uri(), "tok-123");
    let secret = client.get_secret("prod-warehouse", "password").await.unwrap();
    assert_eq!(secret, "hunter2");
}

#[tokio::test]
async fn test_get_secret_missing_key_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/2.0/secrets/get"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(r#"{"error_code": "RESOURCE_DOES_NOT_EXIST"}"#),
        )
        .mount(&server)
        .await;

    let client = VaultClient::new(server.uri(), "tok-123");
    let err = client.get_secret("prod-warehouse", "missing").await.unwrap_err();
    assert!(err.to_string().starts_with("HTTP 404"));
}

#[tokio::test]
async fn test_get_secret_rejects_bad_base64() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/2.0/secrets/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "password",
            "value": "not base64!!",
        })))
        .mount(&server)
        .await;

    let client = VaultClient::new(server.uri(), "tok-123");
    let err = client.get_secret("prod-warehouse", "password").await.unwrap_err();
    assert!(err.to_string().contains("base64"));
    assert!(err.to_string().contains("prod-warehouse"));
}

#[tokio::test]
async fn test_get_scope_credentials() {
    let server = MockServer::start().await;

    for (key, value) in [
        ("connection_string", "postgresql://db:5432/warehouse"),
        ("user_name", "svc_etl"),
        ("password", "hunter2"),
    ] {
        Mock::given(method("GET"))
            .and(path("/api/2.0/secrets/get"))
            .and(query_param("scope", "prod-warehouse"))
            .and(query_param("key", key))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "key": key,
                "value": encoded(value),
            })))
            .mount(&server)
            .await;
    }

    let client = VaultClient::new(server.uri(), "tok-123");
    let creds = client.get_scope_credentials("prod-warehouse").await.unwrap();

    assert_eq!(creds.connection_string, "postgresql://db:5432/warehouse");
    assert_eq!(creds.user_name, "svc_etl");
    assert_eq!(creds.password, "hunter2");
    assert_eq!(creds.as_json()["user_name"], "svc_etl");
}

#[tokio::test]
async fn test_base_url_trailing_slash_trimmed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/2.0/secrets/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "user_name",
            "value": encoded("svc_etl"),
        })))
        .mount(&server)
        .await;

    let client = VaultClient::new(format!("{}/", server.uri()), "tok-123");
    let secret = client.get_secret("scope", "user_name").await.unwrap();
    assert_eq!(secret, "svc_etl");
}
