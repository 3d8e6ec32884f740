//! Model recommendation engine
//!
//! Filters the catalog against hard requirements, optionally narrows to
//! preferred providers, scores what remains, and returns the top candidates.
//! Scoring and filtering are pure functions over catalog records so they can
//! be tested without a network.

use serde::{Deserialize, Serialize};

use crate::{client::Client, error::Result, types::ModelRecord};

/// Caller-supplied requirements for a recommendation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Requirements {
    /// Maximum acceptable prompt price per 1000 tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,

    /// Model must accept image input
    #[serde(default)]
    pub needs_vision: bool,

    /// Model must accept tool/function declarations
    #[serde(default)]
    pub needs_function_calling: bool,

    /// Minimum context window in tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_context_tokens: Option<u32>,

    /// Providers to prefer when any of them has a matching model
    #[serde(default)]
    pub preferred_providers: Vec<String>,
}

/// A candidate model with its computed score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// The catalog record
    pub model: ModelRecord,

    /// Score; higher is better
    pub score: f64,
}

/// Result of a recommendation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    /// Top 3 candidates
    pub recommended: Vec<ScoredCandidate>,

    /// Next 5 candidates
    pub alternatives: Vec<ScoredCandidate>,

    /// Number of models that passed the hard requirements
    pub total_candidates: usize,
}

/// How many candidates land in `recommended`.
const RECOMMENDED_COUNT: usize = 3;
/// How many candidates land in `alternatives`.
const ALTERNATIVE_COUNT: usize = 5;

/// Score weight for vision support.
const VISION_BONUS: f64 = 10.0;
/// Score weight for function-calling support.
const FUNCTION_BONUS: f64 = 5.0;

/// Whether a model satisfies every hard requirement.
fn meets_requirements(model: &ModelRecord, requirements: &Requirements) -> bool {
    if requirements.needs_vision && !model.supports_vision() {
        return false;
    }
    if requirements.needs_function_calling && !model.supports_function_calling() {
        return false;
    }
    if let Some(min_context) = requirements.min_context_tokens {
        if model.context_length < min_context {
            return false;
        }
    }
    if let Some(budget) = requirements.budget {
        match model.prompt_price_per_1k() {
            Some(rate) if rate <= budget => {}
            _ => return false,
        }
    }
    true
}

/// Capability score plus budget-headroom bonus.
fn score(model: &ModelRecord, requirements: &Requirements) -> f64 {
    let mut score = model.context_length as f64 / 1000.0;

    if model.supports_vision() {
        score += VISION_BONUS;
    }
    if model.supports_function_calling() {
        score += FUNCTION_BONUS;
    }

    if let Some(budget) = requirements.budget {
        if let (Some(prompt), Some(completion)) = (
            model.prompt_price_per_1k(),
            model.completion_price_per_1k(),
        ) {
            let average_price = (prompt + completion) / 2.0;
            score += (budget - average_price) * 1000.0;
        }
    }

    score
}

/// Filter, narrow, score, and rank a catalog. Catalog order breaks ties.
fn rank(catalog: Vec<ModelRecord>, requirements: &Requirements) -> Recommendations {
    let candidates: Vec<ModelRecord> = catalog
        .into_iter()
        .filter(|m| meets_requirements(m, requirements))
        .collect();

    // Narrow to preferred providers only when the preference is satisfiable;
    // an unmatched preference is ignored rather than emptying the result.
    let candidates = if requirements.preferred_providers.is_empty() {
        candidates
    } else {
        let preferred: Vec<ModelRecord> = candidates
            .iter()
            .filter(|m| {
                requirements
                    .preferred_providers
                    .iter()
                    .any(|p| p == m.provider())
            })
            .cloned()
            .collect();
        if preferred.is_empty() {
            candidates
        } else {
            preferred
        }
    };

    let total_candidates = candidates.len();

    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|model| {
            let score = score(&model, requirements);
            ScoredCandidate { model, score }
        })
        .collect();

    // Stable sort keeps catalog order across equal scores.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let mut iter = scored.into_iter();
    let recommended: Vec<ScoredCandidate> = iter.by_ref().take(RECOMMENDED_COUNT).collect();
    let alternatives: Vec<ScoredCandidate> = iter.take(ALTERNATIVE_COUNT).collect();

    Recommendations {
        recommended,
        alternatives,
        total_candidates,
    }
}

/// Recommendation engine over the live catalog.
#[derive(Clone)]
pub struct Recommender {
    client: Client,
}

impl Recommender {
    /// Create a recommender over a client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Recommend models for the given requirements.
    ///
    /// Returns `Err` when the catalog fetch fails; never panics.
    pub async fn recommend(&self, requirements: &Requirements) -> Result<Recommendations> {
        let catalog = self.client.models().list().await?;
        let recommendations = rank(catalog, requirements);

        tracing::debug!(
            total_candidates = recommendations.total_candidates,
            recommended = recommendations.recommended.len(),
            alternatives = recommendations.alternatives.len(),
            "recommendation computed"
        );

        Ok(recommendations)
    }
}
