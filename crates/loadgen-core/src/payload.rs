//! Chat-completions wire shapes (OpenAI compatible subset)

use loadgen_common::config::LoadTestConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub stream: bool,
}

impl ChatRequest {
    /// Single-turn user message, streaming off.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage { role: "user".into(), content: prompt.into() }],
            max_tokens,
            stream: false,
        }
    }

    pub fn from_config(config: &LoadTestConfig) -> Self {
        Self::new(config.model.clone(), config.prompt.clone(), config.max_tokens)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Only `usage` is required; the rest of the completion is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub usage: Usage,
}
