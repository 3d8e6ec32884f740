//! Model registry and capability table
//!
//! Capabilities come from two tiers with one merge rule: fresh dynamic
//! catalog data wins; the static fallback table answers when the catalog is
//! unavailable; unknown identifiers get a conservative default instead of an
//! error.

use serde::{Deserialize, Serialize};

use crate::{
    client::Client,
    error::{Error, Result},
    types::{KnownModels, ModelRecord},
};

/// Declared capabilities of a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelCapabilities {
    /// Maximum context window in tokens
    pub max_tokens: u32,

    /// Accepts image input
    pub supports_vision: bool,

    /// Accepts tool/function declarations
    pub supports_function_calling: bool,
}

/// Conservative default for identifiers nothing knows about.
pub const DEFAULT_CAPABILITIES: ModelCapabilities = ModelCapabilities {
    max_tokens: 4096,
    supports_vision: false,
    supports_function_calling: false,
};

/// Static fallback capability table for well-known identifiers.
fn fallback_capabilities(model_id: &str) -> Option<ModelCapabilities> {
    let caps = match model_id {
        KnownModels::GPT_3_5_TURBO => ModelCapabilities {
            max_tokens: 16_385,
            supports_vision: false,
            supports_function_calling: true,
        },
        KnownModels::GPT_4 => ModelCapabilities {
            max_tokens: 8_192,
            supports_vision: false,
            supports_function_calling: true,
        },
        KnownModels::GPT_4_TURBO => ModelCapabilities {
            max_tokens: 128_000,
            supports_vision: true,
            supports_function_calling: true,
        },
        KnownModels::GPT_4O => ModelCapabilities {
            max_tokens: 128_000,
            supports_vision: true,
            supports_function_calling: true,
        },
        KnownModels::CLAUDE_3_OPUS | KnownModels::CLAUDE_3_SONNET | KnownModels::CLAUDE_3_HAIKU => {
            ModelCapabilities {
                max_tokens: 200_000,
                supports_vision: true,
                supports_function_calling: true,
            }
        }
        KnownModels::LLAMA_3_70B => ModelCapabilities {
            max_tokens: 8_192,
            supports_vision: false,
            supports_function_calling: false,
        },
        KnownModels::MISTRAL_7B => ModelCapabilities {
            max_tokens: 32_768,
            supports_vision: false,
            supports_function_calling: false,
        },
        _ => return None,
    };
    Some(caps)
}

/// Catalog grouped by capability and price band.
///
/// A model may appear in several groups; `all` preserves catalog order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategorizedModels {
    /// Vision-capable models
    pub vision: Vec<ModelRecord>,

    /// Models accepting tool/function declarations
    pub function_calling: Vec<ModelRecord>,

    /// Cheap models (prompt rate below 0.001 per 1K tokens)
    pub economy: Vec<ModelRecord>,

    /// Expensive models (prompt rate at or above 0.01 per 1K tokens)
    pub premium: Vec<ModelRecord>,

    /// Every catalog entry, upstream order
    pub all: Vec<ModelRecord>,
}

/// Price band thresholds, per 1K prompt tokens.
const ECONOMY_THRESHOLD: f64 = 0.001;
const PREMIUM_THRESHOLD: f64 = 0.01;

/// Model registry backed by the dynamic catalog with a static fallback.
#[derive(Clone)]
pub struct ModelRegistry {
    client: Client,
}

impl ModelRegistry {
    /// Create a registry over a client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Capabilities for a model identifier.
    ///
    /// Merge rule: dynamic catalog data when the lookup succeeds, static
    /// table when it does not, conservative default when both are silent.
    /// Never fails.
    pub async fn capabilities(&self, model_id: &str) -> ModelCapabilities {
        match self.client.models().get(model_id).await {
            Ok(record) => ModelCapabilities {
                max_tokens: if record.context_length > 0 {
                    record.context_length
                } else {
                    DEFAULT_CAPABILITIES.max_tokens
                },
                supports_vision: record.supports_vision(),
                supports_function_calling: record.supports_function_calling(),
            },
            Err(e) => {
                tracing::debug!(
                    model = model_id,
                    error = %e,
                    "dynamic capability lookup failed, using fallback table"
                );
                fallback_capabilities(model_id).unwrap_or(DEFAULT_CAPABILITIES)
            }
        }
    }

    /// Check a model identifier against the dynamic catalog.
    ///
    /// `Ok(false)` means the catalog answered and the id is unknown; callers
    /// must reject chat requests for such models before any cost is
    /// incurred. Catalog fetch failures propagate.
    pub async fn validate_model(&self, model_id: &str) -> Result<bool> {
        match self.client.models().get(model_id).await {
            Ok(_) => Ok(true),
            Err(Error::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fetch the catalog and group it by capability and price band.
    pub async fn categorized_models(&self) -> Result<CategorizedModels> {
        let models = self.client.models().list().await?;

        let mut categorized = CategorizedModels::default();
        for model in &models {
            if model.supports_vision() {
                categorized.vision.push(model.clone());
            }
            if model.supports_function_calling() {
                categorized.function_calling.push(model.clone());
            }
            if let Some(rate) = model.prompt_price_per_1k() {
                if rate < ECONOMY_THRESHOLD {
                    categorized.economy.push(model.clone());
                } else if rate >= PREMIUM_THRESHOLD {
                    categorized.premium.push(model.clone());
                }
            }
        }
        categorized.all = models;

        Ok(categorized)
    }
}
