//! Integration tests for the completion clients against mock HTTP servers.

use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use ryan_core::completion::{ChatTurn, CompletionError, CompletionRequest, CompletionService};
use ryan_interaction::{ClaudeApiClient, ProxyCompletionClient};

fn request() -> CompletionRequest {
    CompletionRequest::new(
        vec![
            ChatTurn::user("I need a todo app"),
            ChatTurn::assistant("Who are the users?"),
            ChatTurn::user("Just me"),
        ],
        Some("You are the Project Analyzer (PAS)".to_string()),
    )
}

#[tokio::test]
async fn test_proxy_success_returns_response_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/claude/chat"))
        .and(body_partial_json(json!({
            "systemPrompt": "You are the Project Analyzer (PAS)",
            "messages": [
                {"role": "user", "content": "I need a todo app"},
                {"role": "assistant", "content": "Who are the users?"},
                {"role": "user", "content": "Just me"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "response": "Great, a single-user app."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProxyCompletionClient::new(format!("{}/api/claude", server.uri()));
    let reply = client.complete(request()).await.unwrap();

    assert_eq!(reply, "Great, a single-user app.");
}

#[tokio::test]
async fn test_proxy_relayed_anthropic_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "response": {
                "id": "msg_01",
                "type": "message",
                "role": "assistant",
                "content": [{"type": "text", "text": "```mermaid\nmindmap\n  root\n```"}]
            }
        })))
        .mount(&server)
        .await;

    let client = ProxyCompletionClient::new(server.uri());
    let reply = client.complete(request()).await.unwrap();

    assert!(reply.starts_with("```mermaid"));
}

#[tokio::test]
async fn test_proxy_failure_flag_is_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "Overloaded"
        })))
        .mount(&server)
        .await;

    let client = ProxyCompletionClient::new(server.uri());
    let err = client.complete(request()).await.unwrap_err();

    assert_eq!(err, CompletionError::Service("Overloaded".to_string()));
}

#[tokio::test]
async fn test_proxy_non_envelope_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let client = ProxyCompletionClient::new(server.uri());
    let err = client.complete(request()).await.unwrap_err();

    assert_eq!(
        err,
        CompletionError::Http {
            status: 404,
            message: "Not Found".to_string()
        }
    );
}

#[tokio::test]
async fn test_proxy_unreachable_is_transport_error() {
    // Nothing listens on the discard port.
    let client = ProxyCompletionClient::new("http://127.0.0.1:9");
    let err = client.complete(request()).await.unwrap_err();

    assert!(matches!(err, CompletionError::Transport(_)));
}

#[tokio::test]
async fn test_claude_api_sends_history_and_system() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-test",
            "system": "You are the Project Analyzer (PAS)",
            "messages": [
                {"role": "user", "content": "I need a todo app"},
                {"role": "assistant", "content": "Who are the users?"},
                {"role": "user", "content": "Just me"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "Noted."}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ClaudeApiClient::new("sk-test", "claude-test")
        .with_endpoint(format!("{}/v1/messages", server.uri()));
    let reply = client.complete(request()).await.unwrap();

    assert_eq!(reply, "Noted.");
}

#[tokio::test]
async fn test_claude_api_http_error_carries_api_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "type": "error",
            "error": {"type": "rate_limit_error", "message": "Slow down"}
        })))
        .mount(&server)
        .await;

    let client = ClaudeApiClient::new("sk-test", "claude-test")
        .with_endpoint(format!("{}/v1/messages", server.uri()));
    let err = client.complete(request()).await.unwrap_err();

    assert_eq!(
        err,
        CompletionError::Http {
            status: 429,
            message: "Slow down".to_string()
        }
    );
}
