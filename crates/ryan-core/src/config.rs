//! Configuration model.
//!
//! Mirrors `config.toml` and `secret.json`. Every field has a default so a
//! missing or partial file still yields a usable configuration.

use crate::system::SystemKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub const DEFAULT_PROXY_BASE_URL: &str = "http://localhost:3001/api/claude";
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Which completion client to build.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompletionBackend {
    /// Local proxy that wraps the Claude API in a `{success, response, error}` envelope.
    #[default]
    Proxy,
    /// Direct calls to the Anthropic Messages API.
    Anthropic,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CompletionConfig {
    pub backend: CompletionBackend,
    /// Base URL of the proxy (`{base_url}/chat` is called).
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    /// Seconds before a pending completion counts as failed. `0` disables the timeout.
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            backend: CompletionBackend::default(),
            base_url: DEFAULT_PROXY_BASE_URL.to_string(),
            model: DEFAULT_CLAUDE_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding project documents. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
}

/// Per-system prompt overrides (`[prompts]` table).
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PromptOverrides {
    pub analyzer: Option<String>,
    pub planner: Option<String>,
    pub wireframe: Option<String>,
    pub developer: Option<String>,
}

impl PromptOverrides {
    pub fn into_map(self) -> HashMap<SystemKind, String> {
        [
            (SystemKind::Analyzer, self.analyzer),
            (SystemKind::Planner, self.planner),
            (SystemKind::Wireframe, self.wireframe),
            (SystemKind::Developer, self.developer),
        ]
        .into_iter()
        .filter_map(|(kind, prompt)| prompt.map(|p| (kind, p)))
        .collect()
    }
}

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: Option<String>,
    pub completion: CompletionConfig,
    pub storage: StorageConfig,
    pub prompts: PromptOverrides,
}

/// Claude API credentials.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClaudeConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Root of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    #[serde(default)]
    pub claude: Option<ClaudeConfig>,
}
