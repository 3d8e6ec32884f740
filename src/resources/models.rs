//! Model catalog endpoint

use crate::{
    client::Client,
    error::{Error, Result},
    types::{ModelList, ModelRecord},
};

/// Model catalog resource.
#[derive(Clone)]
pub struct Models {
    client: Client,
}

impl Models {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List all available models in catalog order.
    pub async fn list(&self) -> Result<Vec<ModelRecord>> {
        let list: ModelList = self
            .client
            .request(http::Method::GET, "/models")?
            .send()
            .await?
            .parse_result()?;

        tracing::debug!(count = list.data.len(), "fetched model catalog");
        Ok(list.data)
    }

    /// Get a single model's catalog record.
    ///
    /// The aggregator has no per-model endpoint, so this scans the catalog
    /// listing. Fails with `Error::NotFound` for unknown identifiers.
    pub async fn get(&self, model_id: &str) -> Result<ModelRecord> {
        let models = self.list().await?;

        models
            .into_iter()
            .find(|m| m.id == model_id)
            .ok_or_else(|| Error::NotFound(format!("model '{model_id}' not found in catalog")))
    }
}
