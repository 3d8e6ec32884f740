//! Legacy text completions endpoint

use crate::{
    client::Client,
    error::{Error, Result},
    types::{CompletionRequest, CompletionResponse},
};

/// Text completions resource (legacy, non-chat models).
#[derive(Clone)]
pub struct Completions {
    client: Client,
}

impl Completions {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a text completion.
    ///
    /// Rejects an empty prompt before any network call.
    pub async fn create(&self, mut request: CompletionRequest) -> Result<CompletionResponse> {
        if request.prompt.is_empty() {
            return Err(Error::InvalidRequest(
                "prompt must be non-empty".to_string(),
            ));
        }

        if request.model.is_none() {
            request.model = Some(self.client.default_model().to_string());
        }
        let model = request.model.clone().unwrap_or_default();

        self.client.apply_rate_limit().await;

        let response: CompletionResponse = self
            .client
            .request(http::Method::POST, "/completions")?
            .body(serde_json::to_vec(&request)?)
            .send()
            .await?
            .parse_result()?;

        tracing::info!(
            model = %model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "text completion succeeded"
        );

        Ok(response)
    }
}
