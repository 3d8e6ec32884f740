//! Chat completion endpoint tests

use modelgate::{ChatMessage, ChatRequest, Client, Error};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .api_key("test-key")
        .base_url(server.uri())
        .build()
        .expect("failed to build client")
}

#[tokio::test]
async fn test_chat_create_basic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::chat_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let request = ChatRequest::builder()
        .model("openai/gpt-3.5-turbo")
        .messages(vec![ChatMessage::user("Hello")])
        .build()
        .unwrap();

    let response = client.chat().create(request).await.unwrap();

    assert_eq!(response.content(), "Hello! How can I help you today?");
    assert_eq!(response.finish_reason(), Some("stop"));
    assert_eq!(
        response.usage.total_tokens,
        response.usage.prompt_tokens + response.usage.completion_tokens
    );

    mock_server.verify().await;
}

#[tokio::test]
async fn test_chat_rejects_empty_messages_without_network_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::chat_response()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let request = ChatRequest::builder()
        .messages(Vec::<ChatMessage>::new())
        .build()
        .unwrap();

    let result = client.chat().create(request).await;
    assert!(matches!(result, Err(Error::InvalidRequest(_))));

    mock_server.verify().await;
}

#[tokio::test]
async fn test_chat_fills_default_model_when_omitted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(
            serde_json::json!({"model": "mistralai/mistral-7b-instruct"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::chat_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .api_key("test-key")
        .base_url(mock_server.uri())
        .default_model("mistralai/mistral-7b-instruct")
        .build()
        .unwrap();

    let request = ChatRequest::builder()
        .messages(vec![ChatMessage::user("Hi")])
        .build()
        .unwrap();

    client.chat().create(request).await.unwrap();
    mock_server.verify().await;
}

#[tokio::test]
async fn test_chat_generation_parameters_on_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "temperature": 0.2,
            "max_tokens": 128,
            "top_p": 0.9
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::chat_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let request = ChatRequest::builder()
        .model("openai/gpt-3.5-turbo")
        .messages(vec![ChatMessage::user("Hi")])
        .temperature(0.2f32)
        .max_tokens(128u32)
        .top_p(0.9f32)
        .build()
        .unwrap();

    client.chat().create(request).await.unwrap();
    mock_server.verify().await;
}

#[tokio::test]
async fn test_chat_authentication_failure_maps_cleanly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(common::error_body("Invalid API key", 401)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let request = ChatRequest::builder()
        .model("openai/gpt-3.5-turbo")
        .messages(vec![ChatMessage::user("Hi")])
        .build()
        .unwrap();

    let result = client.chat().create(request).await;
    match result {
        Err(Error::Authentication(message)) => assert_eq!(message, "Invalid API key"),
        other => panic!("expected Authentication error, got {other:?}"),
    }

    mock_server.verify().await;
}

#[tokio::test]
async fn test_chat_upstream_error_carries_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(402)
                .set_body_json(common::error_body("Insufficient credits", 402)),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let request = ChatRequest::builder()
        .model("openai/gpt-3.5-turbo")
        .messages(vec![ChatMessage::user("Hi")])
        .build()
        .unwrap();

    let err = client.chat().create(request).await.unwrap_err();
    assert_eq!(err.status(), Some(402));
    match err {
        Error::Api { message, code, .. } => {
            assert_eq!(message, "Insufficient credits");
            assert_eq!(code, Some(402));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
