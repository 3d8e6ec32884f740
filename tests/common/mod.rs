//! Shared fixtures for integration tests

#![allow(dead_code)]

use serde_json::{json, Value};

/// A successful chat completion body.
pub fn chat_response() -> Value {
    json!({
        "id": "gen-abc123",
        "model": "openai/gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "Hello! How can I help you today?"},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 9, "total_tokens": 21}
    })
}

/// A chat completion body with explicit content and usage.
pub fn chat_response_with(content: &str, prompt: u32, completion: u32) -> Value {
    json!({
        "id": "gen-abc123",
        "model": "openai/gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": prompt,
            "completion_tokens": completion,
            "total_tokens": prompt + completion
        }
    })
}

/// A model catalog with a spread of capabilities and prices.
pub fn models_catalog() -> Value {
    json!({
        "data": [
            {
                "id": "openai/gpt-3.5-turbo",
                "name": "OpenAI: GPT-3.5 Turbo",
                "context_length": 16385,
                "architecture": {"modality": "text->text", "tokenizer": "GPT"},
                "pricing": {"prompt": "0.0000005", "completion": "0.0000015"},
                "supported_parameters": ["tools", "temperature", "top_p"]
            },
            {
                "id": "openai/gpt-4o",
                "name": "OpenAI: GPT-4o",
                "context_length": 128000,
                "architecture": {"modality": "text+image->text", "tokenizer": "GPT"},
                "pricing": {"prompt": "0.0000025", "completion": "0.00001"},
                "supported_parameters": ["tools", "temperature", "top_p"]
            },
            {
                "id": "mistralai/mistral-7b-instruct",
                "name": "Mistral: Mistral 7B Instruct",
                "context_length": 32768,
                "architecture": {"modality": "text->text", "tokenizer": "Mistral"},
                "pricing": {"prompt": "0.00000006", "completion": "0.00000006"},
                "supported_parameters": ["temperature"]
            },
            {
                "id": "internal/unpriced-preview",
                "name": "Unpriced Preview",
                "context_length": 8192,
                "architecture": {"modality": "text->text", "tokenizer": "GPT"},
                "pricing": {"prompt": "", "completion": ""},
                "supported_parameters": ["temperature"]
            }
        ]
    })
}

/// An upstream error body.
pub fn error_body(message: &str, code: i64) -> Value {
    json!({"error": {"message": message, "code": code}})
}
