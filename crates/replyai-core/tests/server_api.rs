//! End-to-end requests against a running server.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use replyai_core::registry::ProviderRegistry;
use replyai_test_utils::config::TestConfigBuilder;
use replyai_test_utils::fixtures::{mock_provider_config, no_env};
use replyai_test_utils::server::TestServer;
use replyai_test_utils::tracing_setup::init_test_tracing;

#[tokio::test]
async fn health_and_echo_suggest_over_tcp() {
    init_test_tracing();
    let server = TestServer::echo_only().await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let resp = client
        .post(server.url("/suggest"))
        .json(&json!({"user_id": "u1", "context": "Ship it", "modes": ["formal"], "intensity": 10}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["suggestions"],
        json!([
            "Ship it. I will proceed as discussed!!! 🔥",
            "Thanks for your message!",
            "Thanks for your message!"
        ])
    );
}

#[tokio::test]
async fn default_provider_comes_from_config() {
    init_test_tracing();
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/aigc/text-generation/generation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": {"choices": [{"message": {"role": "assistant", "content": "[\"Q1 reply\", \"Q2 reply\", \"Q3 reply\"]"}}]}
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let config = TestConfigBuilder::new()
        .provider("qwen", mock_provider_config(&mock.uri()))
        .default_provider("qwen")
        .build();
    let registry = ProviderRegistry::from_config_with_env(&config, no_env);
    let server = TestServer::start(config, registry).await;

    let body: Value = reqwest::Client::new()
        .post(server.url("/suggest"))
        .json(&json!({"user_id": "u2", "context": "Quarterly numbers attached"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["suggestions"], json!(["Q1 reply", "Q2 reply", "Q3 reply"]));
    assert_eq!(body["metadata"]["provider"], "qwen");
}

#[tokio::test]
async fn backend_rate_limit_surfaces_as_429() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "20")
                .set_body_string("rate limited"),
        )
        .mount(&mock)
        .await;

    let config = TestConfigBuilder::new()
        .provider("openrouter", mock_provider_config(&mock.uri()))
        .build();
    let registry = ProviderRegistry::from_config_with_env(&config, no_env);
    let server = TestServer::start(config, registry).await;

    let resp = reqwest::Client::new()
        .post(server.url("/suggest"))
        .json(&json!({"user_id": "u3", "context": "hello", "provider": "openrouter"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 429);
    assert_eq!(resp.headers()["retry-after"], "20");

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["provider"], "openrouter");
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn providers_listing_reflects_registry() {
    let mock = MockServer::start().await;
    let config = TestConfigBuilder::new()
        .provider("gemini", mock_provider_config(&mock.uri()))
        .build();
    let registry = ProviderRegistry::from_config_with_env(&config, no_env);
    let server = TestServer::start(config, registry).await;

    let body: Value = reqwest::get(server.url("/providers"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> = body["providers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["echo", "gemini"]);
    assert_eq!(body["default_provider"], "echo");
}
