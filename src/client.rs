//! Main client implementation for the aggregator API

use std::sync::Arc;
use std::sync::OnceLock;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    config::ClientConfig,
    error::{Error, Result},
    http::{RequestBuilder, RetryConfig},
    resources::{Chat, Completions, Embeddings, Models},
    DEFAULT_BASE_URL,
};

/// Main client for the upstream model aggregator.
///
/// Handles authentication, retries, timeouts, and optional client-side rate
/// limiting. Cheap to clone; all state lives behind an `Arc`.
///
/// # Example
///
/// ```rust,no_run
/// use modelgate::Client;
///
/// let client = Client::new("sk-or-...");
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    /// HTTP client for making requests
    http_client: reqwest::Client,
    /// Base URL for the API
    base_url: Url,
    /// API key for authentication
    api_key: SecretString,
    /// Model used when a request omits one
    default_model: String,
    /// Per-request timeout
    timeout: Duration,
    /// Retry/backoff configuration
    retry: RetryConfig,
    /// Custom headers to include with every request
    default_headers: http::HeaderMap,
    /// Attribution headers (aggregator convention)
    referer: Option<String>,
    app_title: Option<String>,
    /// Rate limiter for controlling request throughput
    rate_limiter: Option<Arc<governor::DefaultDirectRateLimiter>>,

    // Lazy-initialized resources
    chat: OnceLock<Chat>,
    completions: OnceLock<Completions>,
    embeddings: OnceLock<Embeddings>,
    models: OnceLock<Models>,
}

impl Client {
    /// Create a new client with an API key and defaults everywhere else.
    ///
    /// # Panics
    ///
    /// Panics when the default configuration cannot produce a client, which
    /// only happens with an empty key. Use [`Client::from_config`] to handle
    /// configuration errors explicitly.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder()
            .api_key(api_key)
            .build()
            .expect("failed to build client with provided API key")
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from a configuration object.
    ///
    /// Refuses to construct without credentials: a gateway client must never
    /// start serving requests it cannot authenticate.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("modelgate/{}", crate::VERSION))
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        let base_url_string = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if base_url_string.trim().is_empty() {
            return Err(Error::InvalidUrl("base URL cannot be empty".to_string()));
        }

        // reqwest/url treat a missing trailing slash as "replace last
        // segment" during join, so normalize here.
        let normalized = if base_url_string.ends_with('/') {
            base_url_string
        } else {
            format!("{base_url_string}/")
        };

        let base_url: Url = normalized
            .parse()
            .map_err(|e| Error::InvalidUrl(format!("{e}")))?;

        match base_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(Error::InvalidUrl(format!(
                    "invalid URL scheme '{scheme}': only 'http' and 'https' are supported"
                )))
            }
        }

        let mut api_key = config.api_key;

        if api_key.is_none() {
            #[cfg(feature = "env")]
            {
                api_key = std::env::var("OPENROUTER_API_KEY")
                    .ok()
                    .map(|s| SecretString::new(s.into_boxed_str()));
            }
        }

        let api_key = api_key.ok_or_else(|| {
            Error::Configuration(
                "no API key provided; set OPENROUTER_API_KEY or pass credentials explicitly"
                    .to_string(),
            )
        })?;

        if api_key.expose_secret().is_empty() {
            return Err(Error::Configuration("API key is empty".to_string()));
        }

        let rate_limiter = config.rate_limit.map(|rate_config| {
            use governor::Quota;
            use std::num::NonZeroU32;

            let per_second = NonZeroU32::new(rate_config.requests_per_second.max(1.0) as u32)
                .unwrap_or(NonZeroU32::MIN);
            let burst = NonZeroU32::new(rate_config.burst_size.max(1)).unwrap_or(NonZeroU32::MIN);
            let quota = Quota::per_second(per_second).allow_burst(burst);

            Arc::new(governor::RateLimiter::direct(quota))
        });

        let inner = Arc::new(ClientInner {
            http_client,
            base_url,
            api_key,
            default_model: config
                .default_model
                .unwrap_or_else(|| crate::types::KnownModels::DEFAULT.to_string()),
            timeout: config.timeout,
            retry: config.retry,
            default_headers: config.default_headers,
            referer: config.referer,
            app_title: config.app_title,
            rate_limiter,
            chat: OnceLock::new(),
            completions: OnceLock::new(),
            embeddings: OnceLock::new(),
            models: OnceLock::new(),
        });

        Ok(Self { inner })
    }

    /// Access the chat completions endpoint.
    pub fn chat(&self) -> &Chat {
        self.inner.chat.get_or_init(|| Chat::new(self.clone()))
    }

    /// Access the legacy text completions endpoint.
    pub fn completions(&self) -> &Completions {
        self.inner
            .completions
            .get_or_init(|| Completions::new(self.clone()))
    }

    /// Access the embeddings endpoint.
    pub fn embeddings(&self) -> &Embeddings {
        self.inner
            .embeddings
            .get_or_init(|| Embeddings::new(self.clone()))
    }

    /// Access the model catalog endpoint.
    pub fn models(&self) -> &Models {
        self.inner.models.get_or_init(|| Models::new(self.clone()))
    }

    /// Probe the upstream catalog endpoint and report health.
    ///
    /// Never returns an error; failures are folded into the report.
    pub async fn health_check(&self) -> Health {
        match self.models().list().await {
            Ok(models) => Health {
                status: HealthStatus::Healthy,
                models_available: Some(models.len()),
                error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "health check failed");
                Health {
                    status: HealthStatus::Unhealthy,
                    models_available: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Model used when a request omits one.
    pub fn default_model(&self) -> &str {
        &self.inner.default_model
    }

    /// Apply rate limiting if configured.
    pub(crate) async fn apply_rate_limit(&self) {
        if let Some(ref limiter) = self.inner.rate_limiter {
            while limiter.check().is_err() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }
    }

    /// Create a request builder for an API path.
    pub(crate) fn request(&self, method: http::Method, path: &str) -> Result<RequestBuilder> {
        let url = self
            .inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::InvalidUrl(format!("failed to construct URL: {e}")))?;

        let mut builder = RequestBuilder::new(method, url)
            .with_client(self.inner.http_client.clone())
            .timeout(self.inner.timeout)
            .retry_config(self.inner.retry.clone())
            .header(
                "authorization",
                format!("Bearer {}", self.inner.api_key.expose_secret()),
            )?
            .header("content-type", "application/json")?;

        if let Some(referer) = &self.inner.referer {
            builder = builder.header("http-referer", referer)?;
        }
        if let Some(title) = &self.inner.app_title {
            builder = builder.header("x-title", title)?;
        }

        for (key, value) in &self.inner.default_headers {
            builder = builder.header(key.as_str(), value.to_str().unwrap_or(""))?;
        }

        Ok(builder)
    }
}

/// Health report from [`Client::health_check`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Overall status
    pub status: HealthStatus,

    /// Number of catalog models when healthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models_available: Option<usize>,

    /// Failure detail when unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health status values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Catalog reachable
    Healthy,
    /// Catalog unreachable or erroring
    Unhealthy,
}

/// Builder for creating a configured [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Set the API key for authentication.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(SecretString::new(api_key.into().into_boxed_str()));
        self
    }

    /// Set the base URL for the API.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the model used when a request omits one.
    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.config.default_model = Some(model.into());
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the retry/backoff configuration.
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Set the attribution referer header.
    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.config.referer = Some(referer.into());
        self
    }

    /// Set the attribution title header.
    pub fn app_title(mut self, title: impl Into<String>) -> Self {
        self.config.app_title = Some(title.into());
        self
    }

    /// Enable client-side rate limiting.
    pub fn rate_limit(mut self, config: crate::config::RateLimitConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Build the client with the configured options.
    pub fn build(self) -> Result<Client> {
        Client::from_config(self.config)
    }
}
