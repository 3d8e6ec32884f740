//! Usage statistics

use serde::{Deserialize, Serialize};

/// Token usage statistics for a completed call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Number of prompt (input) tokens
    pub prompt_tokens: u32,

    /// Number of completion (output) tokens
    pub completion_tokens: u32,

    /// Total tokens, as reported by the upstream
    pub total_tokens: u32,
}

impl Usage {
    /// Whether the reported total is consistent with its parts.
    pub fn is_consistent(&self) -> bool {
        self.total_tokens == self.prompt_tokens + self.completion_tokens
    }
}
