//! HTTP request builder
//!
//! Fluent construction of upstream requests with automatic retry. Transient
//! failures (network-level, timeout, 5xx, 429) are retried with exponential
//! backoff according to [`RetryConfig`]; terminal 4xx responses are returned
//! on the first attempt and mapped to errors by the caller via
//! [`Response::parse_result`].

use futures::StreamExt;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use std::time::Duration;
use url::Url;

use super::{
    retry::{retry_delay, RetryConfig},
    Response,
};
use crate::error::{Error, Result};

/// Builder for HTTP requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    timeout: Duration,
    retry_config: RetryConfig,
    http_client: Option<reqwest::Client>,
}

impl RequestBuilder {
    /// Create a new request builder with default retry configuration.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
            http_client: None,
        }
    }

    /// Set the HTTP client to use.
    pub(crate) fn with_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set a header.
    ///
    /// # Errors
    ///
    /// Returns `Error::HttpClient` if the header name or value is invalid.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key = key
            .into()
            .parse::<HeaderName>()
            .map_err(|e| Error::HttpClient(format!("invalid header name: {e}")))?;
        let value = value
            .into()
            .parse::<HeaderValue>()
            .map_err(|e| Error::HttpClient(format!("invalid header value: {e}")))?;
        self.headers.insert(key, value);
        Ok(self)
    }

    /// Set custom retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_reqwest(&self, client: &reqwest::Client) -> reqwest::RequestBuilder {
        let mut req = client
            .request(self.method.clone(), self.url.as_str())
            .timeout(self.timeout);

        for (key, value) in &self.headers {
            req = req.header(key, value);
        }

        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }

        req
    }

    /// Send the request and get a response.
    ///
    /// Retryable failures are retried up to `retry_config.max_attempts` total
    /// attempts; after the last attempt the response (or transport error) is
    /// returned unchanged.
    pub async fn send(self) -> Result<Response> {
        let client = self
            .http_client
            .clone()
            .ok_or_else(|| Error::HttpClient("no HTTP client configured".to_string()))?;

        let mut attempt: u32 = 0;
        let start_time = std::time::Instant::now();

        loop {
            let outcome = self.build_reqwest(&client).send().await;

            match outcome {
                Ok(resp) => {
                    let status = resp.status();
                    let headers = resp.headers().clone();
                    let body = resp
                        .bytes()
                        .await
                        .map_err(|e| Error::Connection(e.to_string()))?
                        .to_vec();

                    let response = Response::new(status, headers, body, attempt, start_time.elapsed());

                    if response.is_error() {
                        let error = Error::from_response(
                            status.as_u16(),
                            &String::from_utf8_lossy(response.body()),
                            response.headers(),
                        );

                        if let Some(delay) = retry_delay(&error, attempt, &self.retry_config) {
                            tracing::warn!(
                                url = %self.url,
                                status = status.as_u16(),
                                attempt,
                                delay_ms = delay.as_millis() as u64,
                                "retrying upstream request"
                            );
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                            continue;
                        }
                    }

                    tracing::debug!(
                        url = %self.url,
                        status = status.as_u16(),
                        retries = attempt,
                        elapsed_ms = start_time.elapsed().as_millis() as u64,
                        "upstream request finished"
                    );
                    return Ok(response);
                }
                Err(e) => {
                    // Timeouts and no-response network failures are both
                    // retryable; everything already classified by Error.
                    let error = if e.is_timeout() {
                        Error::Timeout(self.timeout)
                    } else {
                        Error::Connection(e.to_string())
                    };

                    if let Some(delay) = retry_delay(&error, attempt, &self.retry_config) {
                        tracing::warn!(
                            url = %self.url,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %error,
                            "retrying after transport failure"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    tracing::error!(url = %self.url, attempt, error = %error, "upstream request failed");
                    return Err(error);
                }
            }
        }
    }

    /// Send a streaming request.
    ///
    /// Opening the stream follows the same retry contract as [`send`]:
    /// transient failures on the initial exchange are retried within the
    /// attempt budget, and error statuses are mapped before any bytes are
    /// handed to the caller. Failures after the stream is open are not
    /// retried; partial output cannot be replayed. The returned stream is
    /// released when dropped.
    ///
    /// [`send`]: RequestBuilder::send
    pub async fn send_streaming(self) -> Result<impl futures::Stream<Item = Result<bytes::Bytes>>> {
        let client = self
            .http_client
            .clone()
            .ok_or_else(|| Error::HttpClient("no HTTP client configured".to_string()))?;

        let mut attempt: u32 = 0;

        loop {
            let outcome = self.build_reqwest(&client).send().await;

            let error = match outcome {
                Ok(resp) => {
                    let status = resp.status();
                    if !status.is_client_error() && !status.is_server_error() {
                        return Ok(resp
                            .bytes_stream()
                            .map(|result| result.map_err(|e| Error::Streaming(e.to_string()))));
                    }

                    let headers = resp.headers().clone();
                    let body = resp
                        .text()
                        .await
                        .map_err(|e| Error::Connection(e.to_string()))?;
                    Error::from_response(status.as_u16(), &body, &headers)
                }
                Err(e) => {
                    if e.is_timeout() {
                        Error::Timeout(self.timeout)
                    } else {
                        Error::Connection(e.to_string())
                    }
                }
            };

            if let Some(delay) = retry_delay(&error, attempt, &self.retry_config) {
                tracing::warn!(
                    url = %self.url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "retrying stream open"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            return Err(error);
        }
    }

    /// Get the URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}
