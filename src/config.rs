//! Configuration for the modelgate client

use http::HeaderMap;
use secrecy::SecretString;
use std::time::Duration;

use crate::http::RetryConfig;

/// Configuration for the modelgate client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key for the upstream aggregator
    pub api_key: Option<SecretString>,

    /// Base URL for the API
    pub base_url: Option<String>,

    /// Model used when a request omits one
    pub default_model: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,

    /// Retry/backoff configuration
    pub retry: RetryConfig,

    /// Custom headers to include with every request
    pub default_headers: HeaderMap,

    /// Optional `HTTP-Referer` attribution header (aggregator convention)
    pub referer: Option<String>,

    /// Optional `X-Title` attribution header (aggregator convention)
    pub app_title: Option<String>,

    /// Client-side rate limiting, off by default
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            default_model: None,
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            default_headers: HeaderMap::new(),
            referer: None,
            app_title: None,
            rate_limit: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with an API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::new(api_key.into().into_boxed_str())),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Looks for:
    /// - `OPENROUTER_API_KEY` for authentication
    /// - `MODELGATE_BASE_URL` for the API base URL
    /// - `MODELGATE_DEFAULT_MODEL` for the fallback model
    /// - `MODELGATE_TIMEOUT` for the per-request timeout in seconds
    /// - `MODELGATE_MAX_ATTEMPTS` for the retry attempt budget
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` when a numeric variable is set but
    /// unparseable.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self, crate::error::Error> {
        use std::env;

        let mut config = Self::default();

        if let Ok(api_key) = env::var("OPENROUTER_API_KEY") {
            config.api_key = Some(SecretString::new(api_key.into_boxed_str()));
        }

        if let Ok(base_url) = env::var("MODELGATE_BASE_URL") {
            config.base_url = Some(base_url);
        }

        if let Ok(model) = env::var("MODELGATE_DEFAULT_MODEL") {
            config.default_model = Some(model);
        }

        if let Ok(timeout_str) = env::var("MODELGATE_TIMEOUT") {
            let secs = timeout_str.parse::<u64>().map_err(|_| {
                crate::error::Error::Configuration(format!(
                    "MODELGATE_TIMEOUT must be a number of seconds, got: '{timeout_str}'"
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Ok(attempts_str) = env::var("MODELGATE_MAX_ATTEMPTS") {
            let attempts = attempts_str.parse::<u32>().map_err(|_| {
                crate::error::Error::Configuration(format!(
                    "MODELGATE_MAX_ATTEMPTS must be a number, got: '{attempts_str}'"
                ))
            })?;
            config.retry.max_attempts = attempts;
        }

        Ok(config)
    }
}

/// Configuration for client-side rate limiting.
///
/// Token bucket: tokens accumulate at `requests_per_second`, each request
/// consumes one, bursts up to `burst_size` are allowed.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum sustained requests per second
    pub requests_per_second: f64,

    /// Burst capacity
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10.0,
            burst_size: 20,
        }
    }
}
