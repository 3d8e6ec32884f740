//! HTTP layer: request building, response parsing, and retry policy

pub mod request;
pub mod response;
pub mod retry;

pub use request::RequestBuilder;
pub use response::Response;
pub use retry::RetryConfig;
