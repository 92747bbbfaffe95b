//! Tests for the ancillary routes.

mod test_utils;

use bedrock_relay_server::ServerConfig;
use serde_json::{Value, json};
use test_utils::{MockBackend, spawn_server};

#[tokio::test]
async fn test_json_greeting() {
    let base = spawn_server(&test_utils::test_config(), MockBackend::messages(&[])).await;

    let body: Value = reqwest::get(format!("{}/json", base))
        .await
        .expect("request sent")
        .json()
        .await
        .expect("JSON body");

    assert_eq!(body, json!({ "Message": "Hello" }));
}

#[tokio::test]
async fn test_health_reports_backend() {
    let base = spawn_server(&test_utils::test_config(), MockBackend::messages(&[])).await;

    let body: Value = reqwest::get(format!("{}/health", base))
        .await
        .expect("request sent")
        .json()
        .await
        .expect("JSON body");

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "mock");
}

#[tokio::test]
async fn test_query_uses_default_index() {
    let base = spawn_server(&test_utils::test_config(), MockBackend::messages(&[])).await;

    let response = reqwest::Client::new()
        .post(format!("{}/query", base))
        .json(&json!({ "query": "chicken soup" }))
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("JSON body");
    assert_eq!(body["index"], "documents");
    assert_eq!(body["query"], "chicken soup");
    assert_eq!(body["total"], 0);
    assert_eq!(body["hits"], json!([]));
}

#[tokio::test]
async fn test_query_rejects_malformed_body() {
    let base = spawn_server(&test_utils::test_config(), MockBackend::messages(&[])).await;

    let response = reqwest::Client::new()
        .post(format!("{}/query", base))
        .body("{\"q\": 1}")
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_aoss_form_greeting() {
    let base = spawn_server(&test_utils::test_config(), MockBackend::messages(&[])).await;

    let response = reqwest::Client::new()
        .post(format!("{}/aoss", base))
        .form(&[("name", "World")])
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "Hello World");
}

#[tokio::test]
async fn test_aoss_rejects_non_form_body_as_json() {
    let base = spawn_server(&test_utils::test_config(), MockBackend::messages(&[])).await;

    let response = reqwest::Client::new()
        .post(format!("{}/aoss", base))
        .json(&json!({ "name": "World" }))
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 415);
    let body: Value = response.json().await.expect("JSON error body");
    assert_eq!(body["error"]["kind"], "request");
}

#[tokio::test]
async fn test_pages_are_served() {
    let base = spawn_server(&test_utils::test_config(), MockBackend::messages(&[])).await;

    for (path, marker) in [
        ("/", "/bedrock-haiku"),
        ("/haiku", "/bedrock-haiku"),
        ("/claude2", "/bedrock-stream"),
        ("/image", "/claude-haiku-image"),
        ("/aoss", "/query"),
    ] {
        let response = reqwest::get(format!("{}{}", base, path))
            .await
            .expect("request sent");
        assert_eq!(response.status(), 200, "{}", path);
        assert!(
            response
                .headers()["content-type"]
                .to_str()
                .expect("header is ASCII")
                .starts_with("text/html")
        );
        assert!(response.text().await.expect("body").contains(marker), "{}", path);
    }
}

#[tokio::test]
async fn test_missing_page_is_not_found() {
    let config = ServerConfig::from_toml("static_dir = \"/nonexistent/bedrock-relay-pages\"")
        .expect("valid configuration");
    let base = spawn_server(&config, MockBackend::messages(&[])).await;

    let response = reqwest::get(format!("{}/", base))
        .await
        .expect("request sent");

    assert_eq!(response.status(), 404);
}
