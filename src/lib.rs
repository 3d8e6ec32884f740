//! # modelgate
//!
//! A Rust client SDK for OpenRouter-compatible multi-provider LLM
//! aggregators.
//!
//! One authenticated client fronts many upstream model providers and adds
//! the cross-cutting pieces an application needs around it:
//! - Chat completions (materialized and streaming), embeddings, and legacy
//!   text completions
//! - Automatic retry with bounded exponential backoff on transient failures
//! - A model registry with a static capability fallback table
//! - A TTL-boxed pricing cache feeding cost calculation
//! - A requirement-driven model recommendation engine
//! - A conversation context assembler with token/cost accounting
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use modelgate::{ChatMessage, ChatRequest, Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("sk-or-...");
//!
//!     let response = client
//!         .chat()
//!         .create(
//!             ChatRequest::builder()
//!                 .model("openai/gpt-3.5-turbo")
//!                 .messages(vec![ChatMessage::user("Hello!")])
//!                 .build()?,
//!         )
//!         .await?;
//!
//!     println!("{}", response.content());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use client::{Client, ClientBuilder, Health, HealthStatus};
pub use config::ClientConfig;
pub use context::{ContextAssembler, ConversationStore};
pub use error::{Error, Result};
pub use pricing::PricingCache;
pub use recommend::{Recommendations, Recommender, Requirements};
pub use registry::ModelRegistry;
pub use types::*;

// Module declarations
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod pricing;
pub mod recommend;
pub mod registry;
pub mod resources;
pub mod streaming;
pub mod types;

// Re-export key dependencies for convenience
pub use async_trait::async_trait;

/// Prelude module for common imports
///
/// ```rust
/// use modelgate::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        streaming::ChatStream,
        types::{ChatMessage, ChatRequest, ChatResponse, ModelRecord, Role, Usage},
        Client, ClientConfig, Error, Result,
    };
}

/// SDK version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
