//! Model catalog, registry, and health tests

use std::time::Duration;

use modelgate::http::RetryConfig;
use modelgate::{Client, Error, HealthStatus, ModelRegistry};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn client_for(server: &MockServer) -> Client {
    // Catalog failures are retried like any other 5xx; keep backoff short so
    // the failure-path tests stay fast.
    Client::builder()
        .api_key("test-key")
        .base_url(server.uri())
        .retry_config(RetryConfig {
            max_attempts: 2,
            initial_interval: Duration::from_millis(1),
            max_interval: Duration::from_millis(5),
            multiplier: 2.0,
        })
        .build()
        .unwrap()
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::models_catalog()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_preserves_catalog_order() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;

    let client = client_for(&mock_server);
    let models = client.models().list().await.unwrap();

    assert_eq!(models.len(), 4);
    assert_eq!(models[0].id, "openai/gpt-3.5-turbo");
    assert_eq!(models[1].id, "openai/gpt-4o");
    assert!(models[1].supports_vision());
    assert!(!models[2].supports_function_calling());
}

#[tokio::test]
async fn test_get_unknown_model_is_not_found() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;

    let client = client_for(&mock_server);
    let err = client.models().get("acme/no-such-model").await.unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_validate_model_distinguishes_unknown_from_unreachable() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;

    let client = client_for(&mock_server);
    let registry = ModelRegistry::new(client);

    assert!(registry.validate_model("openai/gpt-4o").await.unwrap());
    assert!(!registry.validate_model("acme/no-such-model").await.unwrap());
}

#[tokio::test]
async fn test_validate_model_propagates_catalog_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(common::error_body("catalog down", 500)),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let registry = ModelRegistry::new(client);

    let result = registry.validate_model("openai/gpt-4o").await;
    assert!(matches!(result, Err(Error::ServerError { .. })));
}

#[tokio::test]
async fn test_capabilities_prefer_dynamic_catalog() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;

    let client = client_for(&mock_server);
    let registry = ModelRegistry::new(client);

    let caps = registry.capabilities("openai/gpt-4o").await;
    assert_eq!(caps.max_tokens, 128_000);
    assert!(caps.supports_vision);
    assert!(caps.supports_function_calling);
}

#[tokio::test]
async fn test_capabilities_fall_back_when_catalog_is_down() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let registry = ModelRegistry::new(client);

    // Known identifier lands on the static table.
    let caps = registry.capabilities("anthropic/claude-3-opus").await;
    assert_eq!(caps.max_tokens, 200_000);
    assert!(caps.supports_vision);

    // Unknown identifier gets the conservative default.
    let caps = registry.capabilities("acme/brand-new-model").await;
    assert_eq!(caps.max_tokens, 4096);
    assert!(!caps.supports_vision);
    assert!(!caps.supports_function_calling);
}

#[tokio::test]
async fn test_categorized_models_group_by_capability_and_price() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;

    let client = client_for(&mock_server);
    let registry = ModelRegistry::new(client);

    let categorized = registry.categorized_models().await.unwrap();

    assert_eq!(categorized.all.len(), 4);
    assert_eq!(categorized.vision.len(), 1);
    assert_eq!(categorized.vision[0].id, "openai/gpt-4o");
    assert_eq!(categorized.function_calling.len(), 2);
    // All priced fixtures fall in the economy band; the unpriced preview
    // model lands in no price band at all.
    assert_eq!(categorized.economy.len(), 3);
    assert!(categorized.premium.is_empty());
}

#[tokio::test]
async fn test_health_check_healthy() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;

    let client = client_for(&mock_server);
    let health = client.health_check().await;

    assert_eq!(health.status, HealthStatus::Healthy);
    assert_eq!(health.models_available, Some(4));
    assert!(health.error.is_none());
}

#[tokio::test]
async fn test_health_check_unhealthy_never_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let health = client.health_check().await;

    assert_eq!(health.status, HealthStatus::Unhealthy);
    assert!(health.models_available.is_none());
    assert!(health.error.is_some());
}
