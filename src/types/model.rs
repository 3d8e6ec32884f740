//! Model catalog types
//!
//! Wire shapes follow the aggregator's `/models` endpoint: prices arrive as
//! decimal strings per token, architecture describes modality, and the
//! `supported_parameters` list advertises tool support.

use serde::{Deserialize, Serialize};

/// A model record from the upstream catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Model identifier in `provider/name` form
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Maximum context window in tokens
    #[serde(default)]
    pub context_length: u32,

    /// Architecture metadata
    #[serde(default)]
    pub architecture: Architecture,

    /// Per-token pricing
    #[serde(default)]
    pub pricing: ModelPricing,

    /// Parameters the model accepts (e.g. "tools", "temperature")
    #[serde(default)]
    pub supported_parameters: Vec<String>,
}

impl ModelRecord {
    /// Provider prefix of the id (`openai` for `openai/gpt-3.5-turbo`).
    pub fn provider(&self) -> &str {
        self.id.split('/').next().unwrap_or(&self.id)
    }

    /// Whether the model accepts image input.
    pub fn supports_vision(&self) -> bool {
        self.architecture.modality.contains("image")
            || self.architecture.modality.contains("multimodal")
    }

    /// Whether the model accepts tool/function declarations.
    pub fn supports_function_calling(&self) -> bool {
        self.supported_parameters.iter().any(|p| p == "tools")
    }

    /// Prompt price per 1000 tokens, when pricing parses.
    pub fn prompt_price_per_1k(&self) -> Option<f64> {
        self.pricing.prompt_per_1k()
    }

    /// Completion price per 1000 tokens, when pricing parses.
    pub fn completion_price_per_1k(&self) -> Option<f64> {
        self.pricing.completion_per_1k()
    }
}

/// Architecture metadata for a model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Architecture {
    /// Input/output modality, e.g. "text" or "text+image->text"
    #[serde(default)]
    pub modality: String,

    /// Tokenizer family
    #[serde(default)]
    pub tokenizer: String,
}

/// Per-token pricing as carried on the wire (decimal strings).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Prompt cost per token, e.g. "0.0000005"
    #[serde(default)]
    pub prompt: String,

    /// Completion cost per token, e.g. "0.0000015"
    #[serde(default)]
    pub completion: String,
}

impl ModelPricing {
    fn parse_per_1k(raw: &str) -> Option<f64> {
        let per_token: f64 = raw.parse().ok()?;
        if per_token < 0.0 {
            return None;
        }
        Some(per_token * 1000.0)
    }

    /// Prompt rate per 1000 tokens; `None` when the field is missing or
    /// malformed, never a silently-wrong number.
    pub fn prompt_per_1k(&self) -> Option<f64> {
        Self::parse_per_1k(&self.prompt)
    }

    /// Completion rate per 1000 tokens.
    pub fn completion_per_1k(&self) -> Option<f64> {
        Self::parse_per_1k(&self.completion)
    }

    /// Whether both rates are present and parseable.
    pub fn is_known(&self) -> bool {
        self.prompt_per_1k().is_some() && self.completion_per_1k().is_some()
    }
}

/// Catalog listing response: `{"data": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelList {
    /// Catalog entries in upstream order
    pub data: Vec<ModelRecord>,
}

/// Well-known model identifiers.
pub struct KnownModels;

impl KnownModels {
    /// OpenAI GPT-3.5 Turbo
    pub const GPT_3_5_TURBO: &'static str = "openai/gpt-3.5-turbo";
    /// OpenAI GPT-4
    pub const GPT_4: &'static str = "openai/gpt-4";
    /// OpenAI GPT-4 Turbo
    pub const GPT_4_TURBO: &'static str = "openai/gpt-4-turbo";
    /// OpenAI GPT-4o (vision-capable)
    pub const GPT_4O: &'static str = "openai/gpt-4o";
    /// Anthropic Claude 3 Opus
    pub const CLAUDE_3_OPUS: &'static str = "anthropic/claude-3-opus";
    /// Anthropic Claude 3 Sonnet
    pub const CLAUDE_3_SONNET: &'static str = "anthropic/claude-3-sonnet";
    /// Anthropic Claude 3 Haiku
    pub const CLAUDE_3_HAIKU: &'static str = "anthropic/claude-3-haiku";
    /// Meta Llama 3 70B Instruct
    pub const LLAMA_3_70B: &'static str = "meta-llama/llama-3-70b-instruct";
    /// Mistral 7B Instruct
    pub const MISTRAL_7B: &'static str = "mistralai/mistral-7b-instruct";

    /// Default model used when a request omits one
    pub const DEFAULT: &'static str = Self::GPT_3_5_TURBO;
}
