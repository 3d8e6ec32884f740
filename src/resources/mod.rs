//! API endpoint resources

pub mod chat;
pub mod completions;
pub mod embeddings;
pub mod models;

pub use chat::Chat;
pub use completions::Completions;
pub use embeddings::Embeddings;
pub use models::Models;
