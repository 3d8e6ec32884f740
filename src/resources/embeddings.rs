//! Embeddings endpoint

use crate::{
    client::Client,
    error::{Error, Result},
    types::{EmbeddingRequest, EmbeddingResponse},
};

/// Embeddings resource.
#[derive(Clone)]
pub struct Embeddings {
    client: Client,
}

impl Embeddings {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create embeddings for one or more input strings.
    ///
    /// Rejects empty input before any network call. The returned vectors
    /// are ordered to match the input, regardless of upstream ordering.
    pub async fn create(&self, mut request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        if request.input.is_empty() {
            return Err(Error::InvalidRequest(
                "embedding input must be non-empty".to_string(),
            ));
        }

        if request.model.is_none() {
            request.model = Some(self.client.default_model().to_string());
        }

        self.client.apply_rate_limit().await;

        let mut response: EmbeddingResponse = self
            .client
            .request(http::Method::POST, "/embeddings")?
            .body(serde_json::to_vec(&request)?)
            .send()
            .await?
            .parse_result()?;

        // Input order is part of the contract.
        response.data.sort_by_key(|e| e.index);

        tracing::info!(
            inputs = request.input.len(),
            vectors = response.data.len(),
            prompt_tokens = response.usage.prompt_tokens,
            "embedding created"
        );

        Ok(response)
    }
}
