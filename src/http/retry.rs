//! Retry policy for HTTP requests
//!
//! Classification lives on [`crate::error::Error::is_retryable`]; this module
//! owns the backoff schedule. Delay computation is a pure function of the
//! attempt number and configuration, so tests can assert the exact schedule
//! without waiting on a wall clock.

use std::time::Duration;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum total attempts, including the first one
    pub max_attempts: u32,

    /// Delay before the first retry
    pub initial_interval: Duration,

    /// Upper bound on any single delay
    pub max_interval: Duration,

    /// Exponential backoff multiplier
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(60),
            multiplier: 2.0,
        }
    }
}

/// Delay before the retry following attempt number `attempt` (0-based).
///
/// `initial_interval * multiplier^attempt`, capped at `max_interval`.
pub fn backoff_delay(attempt: u32, config: &RetryConfig) -> Duration {
    let factor = config.multiplier.powi(attempt as i32);
    let delay = config.initial_interval.mul_f64(factor.max(0.0));
    delay.min(config.max_interval)
}

/// Decide whether and how long to wait before retrying.
///
/// Returns `None` when the error is terminal or the attempt budget is spent.
/// An upstream `Retry-After` overrides the computed backoff.
pub fn retry_delay(
    error: &crate::error::Error,
    attempt: u32,
    config: &RetryConfig,
) -> Option<Duration> {
    if !error.is_retryable() || attempt + 1 >= config.max_attempts {
        return None;
    }

    if let Some(delay) = error.retry_after() {
        return Some(delay);
    }

    Some(backoff_delay(attempt, config))
}
