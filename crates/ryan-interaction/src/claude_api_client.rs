//! ClaudeApiClient - Direct REST API implementation for Claude.
//!
//! Sends the full conversation history to the Messages API.
//! Key priority: `secret.json` > `ANTHROPIC_API_KEY`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use ryan_core::completion::{CompletionError, CompletionRequest, CompletionService};
use ryan_core::config::{DEFAULT_CLAUDE_MODEL, DEFAULT_MAX_TOKENS, SecretConfig};
use serde::{Deserialize, Serialize};
use std::env;

const BASE_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Completion client that talks to the Claude HTTP API.
#[derive(Clone)]
pub struct ClaudeApiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeApiClient {
    /// Creates a new client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Builds a client from `secret.json` contents, falling back to the environment.
    ///
    /// The model comes from the secret entry if it names one, then `model`.
    pub fn from_secrets(secrets: &SecretConfig, model: &str) -> Result<Self, CompletionError> {
        if let Some(claude) = secrets.claude.as_ref().filter(|c| !c.api_key.trim().is_empty()) {
            let model = claude.model_name.as_deref().unwrap_or(model);
            return Ok(Self::new(claude.api_key.clone(), model));
        }

        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                CompletionError::NotConfigured(format!(
                    "{API_KEY_ENV} not found in secret.json or environment variables"
                ))
            })?;
        Ok(Self::new(api_key, model))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Points the client at a different Messages endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &CreateMessageRequest) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| CompletionError::Transport(format!("Claude API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Claude error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: MessageResponse = response.json().await.map_err(|err| {
            CompletionError::InvalidResponse(format!("Failed to parse Claude response: {err}"))
        })?;

        parsed.into_text()
    }
}

#[async_trait]
impl CompletionService for ClaudeApiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let messages = request
            .messages
            .into_iter()
            .map(|turn| Message {
                role: turn.role.as_str().to_string(),
                content: turn.content,
            })
            .collect();

        let body = CreateMessageRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            system: request.system_prompt,
        };

        tracing::debug!("Claude API request: model={} messages={}", body.model, body.messages.len());
        self.send_request(&body).await
    }

    fn name(&self) -> &str {
        "claude-api"
    }
}

#[derive(Serialize)]
struct CreateMessageRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Body of a Messages API reply. The proxy may also relay this shape verbatim.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageResponse {
    content: Vec<ContentBlockResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlockResponse {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

impl MessageResponse {
    /// First text block of the reply.
    pub(crate) fn into_text(self) -> Result<String, CompletionError> {
        self.content
            .into_iter()
            .find_map(|block| match block {
                ContentBlockResponse::Text { text } => Some(text),
                ContentBlockResponse::Other => None,
            })
            .ok_or_else(|| {
                CompletionError::InvalidResponse(
                    "Claude API returned no text in the response content".into(),
                )
            })
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn map_http_error(status: StatusCode, body: String) -> CompletionError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    CompletionError::Http {
        status: status.as_u16(),
        message,
    }
}
