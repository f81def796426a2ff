//! AI gateway abstraction.
//!
//! All model inference is delegated to an external chat-completion service.
//! The service is an injected capability: consumers receive an [`AiGateway`]
//! trait object and never reach for a global. The production implementation
//! ([`HttpGateway`]) speaks an OpenAI-style `chat/completions` JSON contract
//! over blocking HTTP; tests substitute canned responses.
//!
//! Responses are returned as raw `serde_json::Value` on purpose — provider
//! response shapes vary, and interpreting them is the normalizer's job.

pub mod http;
pub mod tools;

use anyhow::Result;
use serde_json::Value;

pub use http::{GatewayConfig, HttpGateway};
pub use tools::{ToolDispatch, ToolRegistry};

use crate::models::ChatMessage;

/// One chat call: the selected model plus the full accumulated conversation.
/// The whole message list is re-sent on every follow-up turn.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self { model: model.into(), messages }
    }
}

/// External chat-completion capability.
///
/// Implementations return the provider's response object uninterpreted.
/// There is no retry, timeout extension, or cancellation here: a hung call
/// hangs that one logical operation and nothing else.
pub trait AiGateway: Send + Sync {
    fn chat(&self, request: &ChatRequest) -> Result<Value>;
}
