//! Wire types for the aggregator API

pub mod chat;
pub mod completion;
pub mod embedding;
pub mod model;
pub mod usage;

pub use chat::{
    ChatMessage, ChatRequest, ChatRequestBuilder, ChatResponse, Choice, FunctionDeclaration,
    ResponseMessage, Role, Tool,
};
pub use completion::{CompletionChoice, CompletionRequest, CompletionResponse};
pub use embedding::{Embedding, EmbeddingInput, EmbeddingRequest, EmbeddingResponse};
pub use model::{Architecture, KnownModels, ModelList, ModelPricing, ModelRecord};
pub use usage::Usage;
