//! Chat completions endpoint

use crate::{
    client::Client,
    error::{Error, Result},
    streaming::ChatStream,
    types::{ChatRequest, ChatResponse},
};

/// Chat completions resource.
///
/// The primary generation API: POST `/chat/completions`.
#[derive(Clone)]
pub struct Chat {
    client: Client,
}

impl Chat {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a chat completion.
    ///
    /// Rejects an empty message list before any network call. When the
    /// request omits a model the client's configured default is used.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use modelgate::{Client, ChatRequest, ChatMessage};
    /// # async fn example(client: Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let request = ChatRequest::builder()
    ///     .model("openai/gpt-3.5-turbo")
    ///     .messages(vec![ChatMessage::user("Hello!")])
    ///     .build()?;
    ///
    /// let response = client.chat().create(request).await?;
    /// println!("{}", response.content());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(&self, mut request: ChatRequest) -> Result<ChatResponse> {
        if request.messages.is_empty() {
            return Err(Error::InvalidRequest(
                "messages must be a non-empty list".to_string(),
            ));
        }

        if request.model.is_none() {
            request.model = Some(self.client.default_model().to_string());
        }
        let model = request.model.clone().unwrap_or_default();

        self.client.apply_rate_limit().await;

        let response: ChatResponse = self
            .client
            .request(http::Method::POST, "/chat/completions")?
            .body(serde_json::to_vec(&request)?)
            .send()
            .await?
            .parse_result()?;

        tracing::info!(
            model = %model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            total_tokens = response.usage.total_tokens,
            finish_reason = response.finish_reason().unwrap_or("unknown"),
            "chat completion succeeded"
        );

        Ok(response)
    }

    /// Create a streaming chat completion.
    ///
    /// Returns an incrementally-consumable [`ChatStream`]; dropping it
    /// cancels the request and releases the connection.
    pub async fn stream(&self, mut request: ChatRequest) -> Result<ChatStream> {
        if request.messages.is_empty() {
            return Err(Error::InvalidRequest(
                "messages must be a non-empty list".to_string(),
            ));
        }

        if request.model.is_none() {
            request.model = Some(self.client.default_model().to_string());
        }
        request.stream = Some(true);

        self.client.apply_rate_limit().await;

        let byte_stream = self
            .client
            .request(http::Method::POST, "/chat/completions")?
            .body(serde_json::to_vec(&request)?)
            .send_streaming()
            .await?;

        tracing::debug!(
            model = request.model.as_deref().unwrap_or("unknown"),
            "chat completion stream opened"
        );

        Ok(ChatStream::new(byte_stream))
    }
}
