//! Legacy text completion types

use serde::{Deserialize, Serialize};

use super::Usage;

/// Request parameters for a legacy text completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier; defaults to the client's configured model when
    /// omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Prompt text
    pub prompt: String,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

impl CompletionRequest {
    /// Create a request with just a prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: None,
            prompt: prompt.into(),
            max_tokens: None,
            temperature: None,
            top_p: None,
        }
    }
}

/// Response from a legacy text completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Response identifier
    #[serde(default)]
    pub id: Option<String>,

    /// Generated choices
    pub choices: Vec<CompletionChoice>,

    /// Token usage for the call
    #[serde(default)]
    pub usage: Usage,
}

impl CompletionResponse {
    /// Text of the first choice, empty when absent.
    pub fn text(&self) -> &str {
        self.choices.first().map(|c| c.text.as_str()).unwrap_or("")
    }
}

/// One generated choice in a [`CompletionResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionChoice {
    /// Generated text
    pub text: String,

    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}
