//! Streaming chat completion tests

use std::time::Duration;

use futures::StreamExt;
use modelgate::http::RetryConfig;
use modelgate::{ChatMessage, ChatRequest, Client};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn sse_body() -> String {
    [
        r#"data: {"id":"gen-1","model":"openai/gpt-3.5-turbo","choices":[{"index":0,"delta":{"role":"assistant","content":"Hel"},"finish_reason":null}]}"#,
        r#"data: {"id":"gen-1","choices":[{"index":0,"delta":{"content":"lo, "},"finish_reason":null}]}"#,
        r#"data: {"id":"gen-1","choices":[{"index":0,"delta":{"content":"world!"},"finish_reason":null}]}"#,
        r#"data: {"id":"gen-1","choices":[{"index":0,"delta":{},"finish_reason":"stop"}],"usage":{"prompt_tokens":8,"completion_tokens":4,"total_tokens":12}}"#,
        "data: [DONE]",
        "",
    ]
    .join("\n\n")
}

fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .api_key("test-key")
        .base_url(server.uri())
        .build()
        .unwrap()
}

fn request() -> ChatRequest {
    ChatRequest::builder()
        .model("openai/gpt-3.5-turbo")
        .messages(vec![ChatMessage::user("Say hello")])
        .build()
        .unwrap()
}

async fn mount_sse(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_raw(sse_body(), "text/event-stream"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_stream_yields_deltas_and_stops_at_sentinel() {
    let mock_server = MockServer::start().await;
    mount_sse(&mock_server).await;

    let client = client_for(&mock_server);
    let mut stream = client.chat().stream(request()).await.unwrap();

    let mut deltas = Vec::new();
    let mut finish_reason = None;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.unwrap();
        if let Some(delta) = chunk.delta_content() {
            deltas.push(delta.to_string());
        }
        if let Some(reason) = chunk.finish_reason() {
            finish_reason = Some(reason.to_string());
        }
    }

    assert_eq!(deltas, vec!["Hel", "lo, ", "world!"]);
    assert_eq!(finish_reason.as_deref(), Some("stop"));
}

#[tokio::test]
async fn test_text_stream_projects_content_only() {
    let mock_server = MockServer::start().await;
    mount_sse(&mock_server).await;

    let client = client_for(&mock_server);
    let stream = client.chat().stream(request()).await.unwrap();

    let pieces: Vec<String> = stream
        .text_stream()
        .map(|r| r.unwrap())
        .collect()
        .await;

    assert_eq!(pieces.concat(), "Hello, world!");
}

#[tokio::test]
async fn test_collect_response_reassembles_the_exchange() {
    let mock_server = MockServer::start().await;
    mount_sse(&mock_server).await;

    let client = client_for(&mock_server);
    let stream = client.chat().stream(request()).await.unwrap();

    let response = stream.collect_response().await.unwrap();

    assert_eq!(response.content(), "Hello, world!");
    assert_eq!(response.finish_reason(), Some("stop"));
    assert_eq!(response.usage.total_tokens, 12);
    assert_eq!(response.model.as_deref(), Some("openai/gpt-3.5-turbo"));
}

#[tokio::test]
async fn test_stream_open_retries_transient_503() {
    let mock_server = MockServer::start().await;

    // First open attempt hits a failing upstream, the second succeeds.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(common::error_body("upstream flapping", 503)),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_raw(sse_body(), "text/event-stream"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .api_key("test-key")
        .base_url(mock_server.uri())
        .retry_config(RetryConfig {
            max_attempts: 3,
            initial_interval: Duration::from_millis(1),
            max_interval: Duration::from_millis(10),
            multiplier: 2.0,
        })
        .build()
        .unwrap();

    let stream = client.chat().stream(request()).await.unwrap();
    let response = stream.collect_response().await.unwrap();

    assert_eq!(response.content(), "Hello, world!");
    assert_eq!(response.finish_reason(), Some("stop"));
    mock_server.verify().await;
}

#[tokio::test]
async fn test_stream_error_status_surfaces_before_any_chunk() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(common::error_body("Invalid API key", 401)),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.chat().stream(request()).await;

    assert!(matches!(result, Err(modelgate::Error::Authentication(_))));
}
