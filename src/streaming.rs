//! Streaming support for chat completions
//!
//! The aggregator streams Server-Sent Events where each `data:` payload is a
//! JSON chunk carrying a content delta, and the final payload is the literal
//! sentinel `[DONE]`. Dropping a [`ChatStream`] cancels the underlying
//! request and releases the connection.

use bytes::Bytes;
use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::{
    error::{Error, Result},
    types::{ChatResponse, Choice, ResponseMessage, Usage},
};

/// A stream of chat completion chunks.
#[pin_project]
pub struct ChatStream {
    #[pin]
    inner: futures::stream::BoxStream<'static, Result<StreamChunk>>,
}

impl ChatStream {
    /// Create a new chat stream from an SSE byte stream.
    pub(crate) fn new(response: impl Stream<Item = Result<Bytes>> + Send + Unpin + 'static) -> Self {
        let event_stream = response
            .eventsource()
            .filter_map(|result| async move {
                match result {
                    Ok(event) => Self::parse_event(&event.data),
                    Err(e) => Some(Err(Error::Streaming(e.to_string()))),
                }
            })
            .boxed();

        Self {
            inner: event_stream,
        }
    }

    /// Parse one SSE data payload; `None` filters out the `[DONE]` sentinel.
    fn parse_event(data: &str) -> Option<Result<StreamChunk>> {
        let data = data.trim();
        if data.is_empty() {
            return None;
        }
        if data == "[DONE]" {
            return None;
        }

        match serde_json::from_str::<StreamChunk>(data) {
            Ok(chunk) => Some(Ok(chunk)),
            Err(e) => Some(Err(Error::ResponseValidation(format!(
                "malformed stream chunk: {e}"
            )))),
        }
    }

    /// Stream of just the text deltas.
    pub fn text_stream(self) -> impl Stream<Item = Result<String>> {
        self.filter_map(|result| async move {
            match result {
                Ok(chunk) => chunk.delta_content().map(|s| Ok(s.to_string())),
                Err(e) => Some(Err(e)),
            }
        })
    }

    /// Consume the whole stream and reassemble the final response.
    ///
    /// Content deltas are concatenated; the last reported finish reason and
    /// usage (when the upstream includes them) are carried over.
    pub async fn collect_response(mut self) -> Result<ChatResponse> {
        let mut content = String::new();
        let mut finish_reason: Option<String> = None;
        let mut usage = Usage::default();
        let mut id = None;
        let mut model = None;

        while let Some(chunk) = self.next().await {
            let chunk = chunk?;
            if let Some(delta) = chunk.delta_content() {
                content.push_str(delta);
            }
            if let Some(reason) = chunk.finish_reason() {
                finish_reason = Some(reason.to_string());
            }
            if let Some(chunk_usage) = chunk.usage {
                usage = chunk_usage;
            }
            if chunk.id.is_some() {
                id = chunk.id;
            }
            if chunk.model.is_some() {
                model = chunk.model;
            }
        }

        Ok(ChatResponse {
            id,
            model,
            choices: vec![Choice {
                index: 0,
                message: ResponseMessage {
                    role: Some("assistant".to_string()),
                    content: Some(content),
                },
                finish_reason,
            }],
            usage,
        })
    }
}

impl Stream for ChatStream {
    type Item = Result<StreamChunk>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        this.inner.poll_next(cx)
    }
}

/// One streamed chunk of a chat completion.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct StreamChunk {
    /// Response identifier
    #[serde(default)]
    pub id: Option<String>,

    /// Model serving the stream
    #[serde(default)]
    pub model: Option<String>,

    /// Delta choices
    #[serde(default)]
    pub choices: Vec<StreamChoice>,

    /// Usage totals, present on the final chunk when requested
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl StreamChunk {
    /// Content delta of the first choice.
    pub fn delta_content(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.delta.content.as_deref())
    }

    /// Finish reason of the first choice.
    pub fn finish_reason(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.finish_reason.as_deref())
    }
}

/// One choice inside a [`StreamChunk`].
#[derive(Debug, Clone, serde::Deserialize)]
pub struct StreamChoice {
    /// Index of the choice
    #[serde(default)]
    pub index: u32,

    /// Incremental delta
    #[serde(default)]
    pub delta: StreamDelta,

    /// Why generation stopped, on the terminal chunk
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Incremental delta payload.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct StreamDelta {
    /// Role, usually only on the first chunk
    #[serde(default)]
    pub role: Option<String>,

    /// Content fragment
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_chunk() {
        let data = r#"{"id":"gen-1","choices":[{"index":0,"delta":{"content":"Hel"},"finish_reason":null}]}"#;
        let chunk = ChatStream::parse_event(data).unwrap().unwrap();
        assert_eq!(chunk.delta_content(), Some("Hel"));
        assert_eq!(chunk.finish_reason(), None);
    }

    #[test]
    fn test_done_sentinel_is_filtered() {
        assert!(ChatStream::parse_event("[DONE]").is_none());
        assert!(ChatStream::parse_event("  [DONE]  ").is_none());
        assert!(ChatStream::parse_event("").is_none());
    }

    #[test]
    fn test_malformed_chunk_is_an_error() {
        let result = ChatStream::parse_event("{not json");
        assert!(matches!(result, Some(Err(Error::ResponseValidation(_)))));
    }

    #[test]
    fn test_final_chunk_carries_usage() {
        let data = r#"{"id":"gen-1","choices":[{"index":0,"delta":{},"finish_reason":"stop"}],"usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}"#;
        let chunk = ChatStream::parse_event(data).unwrap().unwrap();
        assert_eq!(chunk.finish_reason(), Some("stop"));
        assert_eq!(chunk.usage.unwrap().total_tokens, 15);
    }
}
