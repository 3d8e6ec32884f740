//! Conversation context assembly and usage accounting
//!
//! Rebuilds a bounded message window for a conversation (system prompt +
//! prior turns + the new turn), submits it through the client, and writes
//! token/cost accounting back through the injected [`ConversationStore`].
//! Upstream failures surface raw; persisting a placeholder error message for
//! the lost turn is the caller's job.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    client::Client,
    error::Result,
    pricing::PricingCache,
    types::{ChatMessage, ChatRequest, Usage},
};

/// Default bound on how many prior turns are replayed per request.
pub const DEFAULT_MAX_HISTORY: usize = 20;

/// A persisted conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Role of the turn
    pub role: crate::types::Role,

    /// Text content
    pub content: String,
}

/// Generation parameters configured on a conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,

    /// Nucleus sampling parameter
    pub top_p: Option<f32>,

    /// Frequency penalty
    pub frequency_penalty: Option<f32>,

    /// Presence penalty
    pub presence_penalty: Option<f32>,
}

/// Running totals on a conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationTotals {
    /// Total tokens across all exchanges
    pub total_tokens: u64,

    /// Total cost across all exchanges
    pub total_cost: f64,

    /// Number of persisted messages
    pub message_count: u64,

    /// Timestamp of the latest message
    pub last_message_at: Option<DateTime<Utc>>,
}

/// Persistence-facing view of a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    /// Conversation identifier
    pub id: String,

    /// Owning user identifier
    pub user_id: String,

    /// Configured model; the client default applies when absent
    pub model: Option<String>,

    /// System prompt prepended to every request, when set
    pub system_prompt: Option<String>,

    /// Generation parameters
    pub params: GenerationParams,

    /// Running totals
    pub totals: ConversationTotals,
}

/// Per-user usage counters with monthly reset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUsage {
    /// Tokens consumed this month
    pub monthly_tokens: u64,

    /// Cost accrued this month
    pub monthly_cost: f64,

    /// When the counters were last reset
    pub last_reset: Option<DateTime<Utc>>,
}

impl UserUsage {
    /// Record an exchange, resetting the counters first when the wall-clock
    /// month or year differs from the last reset.
    pub fn record(&mut self, tokens: u64, cost: f64, now: DateTime<Utc>) {
        let needs_reset = match self.last_reset {
            Some(last) => last.month() != now.month() || last.year() != now.year(),
            None => true,
        };

        if needs_reset {
            self.monthly_tokens = 0;
            self.monthly_cost = 0.0;
            self.last_reset = Some(now);
        }

        self.monthly_tokens += tokens;
        self.monthly_cost += cost.max(0.0);
    }
}

/// Persistence collaborator for conversations and user counters.
///
/// Implemented outside this crate (database, in-memory test double). Prior
/// messages are returned oldest first, already bounded by `limit`.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Load a conversation's configuration and running totals.
    async fn conversation(&self, conversation_id: &str) -> Result<ConversationState>;

    /// Load up to `limit` most recent prior turns, oldest first.
    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredMessage>>;

    /// Persist updated conversation totals.
    async fn update_totals(
        &self,
        conversation_id: &str,
        totals: &ConversationTotals,
    ) -> Result<()>;

    /// Load a user's usage counters.
    async fn user_usage(&self, user_id: &str) -> Result<UserUsage>;

    /// Persist a user's usage counters.
    async fn save_user_usage(&self, user_id: &str, usage: &UserUsage) -> Result<()>;
}

/// Outcome of a completed exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOutcome {
    /// Generated content
    pub content: String,

    /// Why generation stopped
    pub finish_reason: Option<String>,

    /// Token usage reported by the upstream
    pub usage: Usage,

    /// Cost computed from cached pricing; zero when pricing is unavailable
    pub cost: f64,

    /// Model that served the exchange
    pub model: String,
}

/// Build the bounded message window for one request.
///
/// Order is fixed: system prompt (when set), prior turns oldest first, then
/// the new user message.
fn assemble_messages(
    system_prompt: Option<&str>,
    history: &[StoredMessage],
    new_user_message: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);

    if let Some(prompt) = system_prompt {
        if !prompt.is_empty() {
            messages.push(ChatMessage::system(prompt));
        }
    }

    for turn in history {
        messages.push(ChatMessage {
            role: turn.role,
            content: turn.content.clone(),
        });
    }

    messages.push(ChatMessage::user(new_user_message));
    messages
}

/// Assembles conversation context and applies usage accounting.
pub struct ContextAssembler<S> {
    client: Client,
    pricing: PricingCache,
    store: S,
    max_history: usize,
}

impl<S: ConversationStore> ContextAssembler<S> {
    /// Create an assembler with the default history bound.
    pub fn new(client: Client, pricing: PricingCache, store: S) -> Self {
        Self {
            client,
            pricing,
            store,
            max_history: DEFAULT_MAX_HISTORY,
        }
    }

    /// Override the history bound.
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one exchange for a conversation.
    ///
    /// Loads the window, submits it, then applies token/cost accounting to
    /// the conversation totals and the user's monthly counters. Accounting
    /// uses only the usage confirmed by the upstream response; there is no
    /// pre-flight estimate to reconcile.
    pub async fn chat_completion(
        &self,
        conversation_id: &str,
        new_user_message: &str,
    ) -> Result<ChatOutcome> {
        let mut state = self.store.conversation(conversation_id).await?;
        let history = self
            .store
            .recent_messages(conversation_id, self.max_history)
            .await?;

        let messages =
            assemble_messages(state.system_prompt.as_deref(), &history, new_user_message);

        let request = ChatRequest {
            model: state.model.clone(),
            messages,
            temperature: state.params.temperature,
            max_tokens: state.params.max_tokens,
            top_p: state.params.top_p,
            frequency_penalty: state.params.frequency_penalty,
            presence_penalty: state.params.presence_penalty,
            tools: None,
            stream: None,
        };

        // Upstream failures propagate untouched; the caller decides how to
        // persist the failed turn.
        let response = self.client.chat().create(request).await?;

        let model = response
            .model
            .clone()
            .or_else(|| state.model.clone())
            .unwrap_or_else(|| self.client.default_model().to_string());

        let usage = response.usage.clone();
        let cost = self
            .pricing
            .calculate_cost(
                &model,
                usage.prompt_tokens as u64,
                usage.completion_tokens as u64,
            )
            .await;

        let now = Utc::now();
        state.totals.total_tokens += usage.total_tokens as u64;
        state.totals.total_cost += cost;
        // The user's turn and the assistant's reply both get persisted.
        state.totals.message_count += 2;
        state.totals.last_message_at = Some(now);
        self.store
            .update_totals(conversation_id, &state.totals)
            .await?;

        let mut user_usage = self.store.user_usage(&state.user_id).await?;
        user_usage.record(usage.total_tokens as u64, cost, now);
        self.store
            .save_user_usage(&state.user_id, &user_usage)
            .await?;

        tracing::info!(
            conversation = conversation_id,
            model = %model,
            total_tokens = usage.total_tokens,
            cost,
            "exchange recorded"
        );

        Ok(ChatOutcome {
            content: response.content().to_string(),
            finish_reason: response.finish_reason().map(str::to_string),
            usage,
            cost,
            model,
        })
    }
}
