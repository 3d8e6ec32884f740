//! Embedding types

use serde::{Deserialize, Serialize};

use super::Usage;

/// Input for an embedding request: a single string or an ordered batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    /// One input string
    Single(String),
    /// Ordered batch of input strings
    Batch(Vec<String>),
}

impl EmbeddingInput {
    /// Number of input items.
    pub fn len(&self) -> usize {
        match self {
            EmbeddingInput::Single(_) => 1,
            EmbeddingInput::Batch(items) => items.len(),
        }
    }

    /// Whether the input carries no usable content.
    pub fn is_empty(&self) -> bool {
        match self {
            EmbeddingInput::Single(s) => s.is_empty(),
            EmbeddingInput::Batch(items) => items.is_empty() || items.iter().all(String::is_empty),
        }
    }
}

impl From<&str> for EmbeddingInput {
    fn from(value: &str) -> Self {
        EmbeddingInput::Single(value.to_string())
    }
}

impl From<String> for EmbeddingInput {
    fn from(value: String) -> Self {
        EmbeddingInput::Single(value)
    }
}

impl From<Vec<String>> for EmbeddingInput {
    fn from(value: Vec<String>) -> Self {
        EmbeddingInput::Batch(value)
    }
}

/// Request parameters for creating embeddings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// Model identifier; defaults to the client's configured embedding model
    /// when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Input text(s) to embed
    pub input: EmbeddingInput,
}

/// Response from an embedding request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// One embedding per input item
    pub data: Vec<Embedding>,

    /// Token usage for the call
    #[serde(default)]
    pub usage: Usage,
}

/// A single embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    /// Position of the corresponding input item
    pub index: usize,

    /// The embedding vector
    pub embedding: Vec<f32>,
}
