//! Client for the local Claude proxy.
//!
//! The proxy accepts `{messages, systemPrompt}` on `POST {base}/chat` and
//! replies with `{success, response, error}`. `response` is either plain
//! text or a relayed Messages API body.

use crate::claude_api_client::MessageResponse;
use async_trait::async_trait;
use reqwest::Client;
use ryan_core::completion::{ChatTurn, CompletionError, CompletionRequest, CompletionService};
use serde::{Deserialize, Serialize};

const DEFAULT_FAILURE_MESSAGE: &str = "Failed to get response from Claude";

#[derive(Clone)]
pub struct ProxyCompletionClient {
    client: Client,
    base_url: String,
}

impl ProxyCompletionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    messages: &'a [ChatTurn],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_prompt: Option<&'a str>,
}

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    response: Option<ProxyResponse>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProxyResponse {
    Text(String),
    Message(MessageResponse),
}

impl Envelope {
    fn into_text(self) -> Result<String, CompletionError> {
        if !self.success {
            let message = self
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
            return Err(CompletionError::Service(message));
        }
        match self.response {
            Some(ProxyResponse::Text(text)) => Ok(text),
            Some(ProxyResponse::Message(message)) => message.into_text(),
            None => Err(CompletionError::InvalidResponse(
                "proxy reported success without a response".into(),
            )),
        }
    }
}

#[async_trait]
impl CompletionService for ProxyCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let body = ChatRequest {
            messages: &request.messages,
            system_prompt: request.system_prompt.as_deref(),
        };

        tracing::debug!("Proxy request to {} with {} messages", self.chat_url(), request.messages.len());
        let response = self
            .client
            .post(self.chat_url())
            .json(&body)
            .send()
            .await
            .map_err(|err| CompletionError::Transport(format!("Proxy request failed: {err}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| CompletionError::Transport(format!("Failed to read proxy response: {err}")))?;

        // The proxy wraps its own failures in the envelope, even on 5xx.
        match serde_json::from_str::<Envelope>(&text) {
            Ok(envelope) => envelope.into_text(),
            Err(_) if !status.is_success() => Err(CompletionError::Http {
                status: status.as_u16(),
                message: text,
            }),
            Err(err) => Err(CompletionError::InvalidResponse(format!(
                "Failed to parse proxy response: {err}"
            ))),
        }
    }

    fn name(&self) -> &str {
        "claude-proxy"
    }
}
