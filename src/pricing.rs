//! Time-boxed pricing cache and cost calculation
//!
//! Pricing degrades, never blocks: a lookup that fails upstream returns
//! `None` and the corresponding cost is zero, flagged in the logs so
//! unaccounted usage can be found after the fact.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::client::Client;

/// Default freshness window for cached pricing.
pub const DEFAULT_PRICING_TTL: Duration = Duration::from_secs(60 * 60);

/// Injectable time source so TTL behavior is testable without real waiting.
type Clock = Arc<dyn Fn() -> Instant + Send + Sync>;

/// Resolved per-1K-token rates for a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPricing {
    /// Prompt cost per 1000 tokens
    pub prompt_per_1k: f64,

    /// Completion cost per 1000 tokens
    pub completion_per_1k: f64,
}

impl ResolvedPricing {
    /// Cost of a call at these rates. Never negative.
    pub fn cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        let cost = (input_tokens as f64 / 1000.0) * self.prompt_per_1k
            + (output_tokens as f64 / 1000.0) * self.completion_per_1k;
        cost.max(0.0)
    }
}

struct CacheEntry {
    /// `None` records a catalog answer with missing/malformed pricing, so
    /// we do not refetch a model that is genuinely unpriced every call.
    pricing: Option<ResolvedPricing>,
    fetched_at: Instant,
}

/// Process-lifetime cache of per-model pricing.
///
/// Entries are created on first lookup, overwritten on refresh after the TTL
/// elapses, and never explicitly deleted. Last-writer-wins under concurrent
/// refresh; staleness is bounded by the TTL, not correctness-critical.
pub struct PricingCache {
    client: Client,
    ttl: Duration,
    clock: Clock,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl PricingCache {
    /// Create a cache with the default 1-hour TTL.
    pub fn new(client: Client) -> Self {
        Self::with_ttl(client, DEFAULT_PRICING_TTL)
    }

    /// Create a cache with a custom TTL.
    pub fn with_ttl(client: Client, ttl: Duration) -> Self {
        Self {
            client,
            ttl,
            clock: Arc::new(Instant::now),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the time source. Intended for tests.
    pub fn with_clock(mut self, clock: impl Fn() -> Instant + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Pricing for a model, from cache when fresh, refetched otherwise.
    ///
    /// Returns `None` for an empty id, for a model without usable pricing,
    /// and on upstream failure. Never an error.
    pub async fn model_pricing(&self, model_id: &str) -> Option<ResolvedPricing> {
        if model_id.is_empty() {
            return None;
        }

        let now = (self.clock)();

        // Lock scope covers only the map probe; the upstream fetch below
        // must not run under the lock.
        {
            let entries = self.entries.lock().expect("pricing cache poisoned");
            if let Some(entry) = entries.get(model_id) {
                if now.duration_since(entry.fetched_at) < self.ttl {
                    return entry.pricing;
                }
            }
        }

        let pricing = match self.client.models().get(model_id).await {
            Ok(record) => {
                let resolved = record.pricing.prompt_per_1k().zip(
                    record.pricing.completion_per_1k(),
                );
                match resolved {
                    Some((prompt_per_1k, completion_per_1k)) => Some(ResolvedPricing {
                        prompt_per_1k,
                        completion_per_1k,
                    }),
                    None => {
                        tracing::warn!(
                            model = model_id,
                            "model has no usable pricing, costs will be unaccounted"
                        );
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    model = model_id,
                    error = %e,
                    "pricing lookup failed, degrading to zero cost"
                );
                // Do not cache fetch failures; the next lookup retries.
                return None;
            }
        };

        let mut entries = self.entries.lock().expect("pricing cache poisoned");
        entries.insert(
            model_id.to_string(),
            CacheEntry {
                pricing,
                fetched_at: now,
            },
        );
        pricing
    }

    /// Cost of a call against a model's cached or fetched pricing.
    ///
    /// Returns `0.0` when `model_id` is empty or pricing is unavailable.
    /// Never negative, never errors.
    pub async fn calculate_cost(
        &self,
        model_id: &str,
        input_tokens: u64,
        output_tokens: u64,
    ) -> f64 {
        match self.model_pricing(model_id).await {
            Some(pricing) => pricing.cost(input_tokens, output_tokens),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_formula() {
        let pricing = ResolvedPricing {
            prompt_per_1k: 0.0005,
            completion_per_1k: 0.0015,
        };
        // 2000 prompt + 1000 completion tokens
        let cost = pricing.cost(2000, 1000);
        assert!((cost - 0.0025).abs() < 1e-12);
    }

    #[test]
    fn test_cost_zero_tokens() {
        let pricing = ResolvedPricing {
            prompt_per_1k: 0.01,
            completion_per_1k: 0.03,
        };
        assert_eq!(pricing.cost(0, 0), 0.0);
    }

    #[test]
    fn test_cost_monotone_in_both_arguments() {
        let pricing = ResolvedPricing {
            prompt_per_1k: 0.0005,
            completion_per_1k: 0.0015,
        };
        let mut previous = 0.0;
        for tokens in [0u64, 1, 10, 100, 1000, 100_000] {
            let cost = pricing.cost(tokens, tokens / 2);
            assert!(cost >= previous);
            previous = cost;
        }
    }
}
