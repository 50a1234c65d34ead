//! Completion service contract.
//!
//! The orchestrator only knows this trait; concrete HTTP clients live in
//! `ryan-interaction` and tests substitute doubles.

use crate::project::{Message, MessageRole};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// One role-tagged entry of the request history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: MessageRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatTurn {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Ordered history plus the system instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<ChatTurn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatTurn>, system_prompt: Option<String>) -> Self {
        Self {
            messages,
            system_prompt,
        }
    }
}

/// Errors produced by a completion service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// The request never produced an HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The service envelope reported failure.
    #[error("Service reported failure: {0}")]
    Service(String),

    /// The response could not be understood.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No reply within the configured limit.
    #[error("Timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The client lacks required configuration (e.g. an API key).
    #[error("Completion service not configured: {0}")]
    NotConfigured(String),
}

/// A service that turns a conversation into one assistant reply.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns the assistant's reply text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "completion"
    }
}
