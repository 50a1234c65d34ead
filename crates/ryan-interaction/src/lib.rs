//! HTTP completion clients for Ryan.

pub mod claude_api_client;
pub mod proxy_completion_client;

pub use claude_api_client::ClaudeApiClient;
pub use proxy_completion_client::ProxyCompletionClient;

use ryan_core::completion::{CompletionError, CompletionService};
use ryan_core::config::{CompletionBackend, CompletionConfig, SecretConfig};
use std::sync::Arc;

/// Builds the completion client selected by `config.backend`.
pub fn build_completion_service(
    config: &CompletionConfig,
    secrets: &SecretConfig,
) -> Result<Arc<dyn CompletionService>, CompletionError> {
    match config.backend {
        CompletionBackend::Proxy => {
            tracing::info!("Using Claude proxy at {}", config.base_url);
            Ok(Arc::new(ProxyCompletionClient::new(config.base_url.clone())))
        }
        CompletionBackend::Anthropic => {
            let client = ClaudeApiClient::from_secrets(secrets, &config.model)?
                .with_max_tokens(config.max_tokens);
            tracing::info!("Using Claude API with model {}", client.model());
            Ok(Arc::new(client))
        }
    }
}
