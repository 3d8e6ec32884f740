//! Error types for the modelgate SDK
//!
//! One `Error` enum covers the whole surface: request validation, upstream
//! HTTP failures, transport problems, and local configuration mistakes.
//! Built on `thiserror`, with helpers for mapping raw HTTP responses and for
//! deciding retry eligibility.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail with a modelgate error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the modelgate SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration detected at client construction.
    /// A client without credentials must never start serving requests.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller-supplied input failed validation (empty message list, empty
    /// prompt, empty embedding input). No network call was attempted.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed (401).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Permission denied (403).
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Resource not found (404), most commonly an unknown model id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded (429).
    #[error("Rate limit exceeded")]
    RateLimit {
        /// Time to wait before retrying, if provided by the upstream
        retry_after: Option<Duration>,
    },

    /// Upstream server error (5xx).
    #[error("Upstream server error (status {status}): {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Error message from the upstream body
        message: String,
    },

    /// Upstream API error for statuses not covered by a dedicated variant,
    /// carrying the status and upstream error body after retries exhausted.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the upstream body
        message: String,
        /// Upstream error code, when present
        code: Option<i64>,
    },

    /// Failed to deserialize an upstream response.
    #[error("Failed to parse upstream response: {0}")]
    ResponseValidation(String),

    /// Network-level failure with no HTTP response.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timed out.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Streaming error while consuming an SSE response.
    #[error("Streaming error: {0}")]
    Streaming(String),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client construction or configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other errors not covered by specific variants.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Map an HTTP error response onto the error taxonomy.
    ///
    /// Understands the aggregator's `{"error": {"message", "code"}}` body
    /// shape and falls back to the raw body text when the JSON is absent.
    pub fn from_response(status: u16, body: &str, headers: &http::HeaderMap) -> Self {
        let (message, code) = match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(parsed) => (parsed.error.message, parsed.error.code),
            Err(_) => (body.to_string(), None),
        };

        match status {
            401 => Error::Authentication(message),
            403 => Error::PermissionDenied(message),
            404 => Error::NotFound(message),
            429 => {
                let retry_after = headers
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs);
                Error::RateLimit { retry_after }
            }
            s if s >= 500 => Error::ServerError { status, message },
            _ => Error::Api {
                status,
                message,
                code,
            },
        }
    }

    /// Check whether this error should be retried.
    ///
    /// Retryable: network-level failures, timeouts, HTTP 5xx, HTTP 429.
    /// Everything else is terminal and propagates immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::RateLimit { .. }
                | Error::ServerError { .. }
                | Error::Connection(_)
                | Error::Timeout(_)
        )
    }

    /// Retry delay mandated by the upstream, if any (429 Retry-After).
    pub fn retry_after(&self) -> Option<Duration> {
        if let Error::RateLimit { retry_after } = self {
            *retry_after
        } else {
            None
        }
    }

    /// HTTP status carried by this error, when it originated upstream.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authentication(_) => Some(401),
            Error::PermissionDenied(_) => Some(403),
            Error::NotFound(_) => Some(404),
            Error::RateLimit { .. } => Some(429),
            Error::ServerError { status, .. } | Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Upstream error body shape: {"error": {"message": "...", "code": 402}}
#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetails,
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorDetails {
    message: String,
    #[serde(default)]
    code: Option<i64>,
}
