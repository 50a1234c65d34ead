//! Wires configuration, storage and the completion client into a use case.

use crate::GlobalArgs;
use crate::telemetry;
use anyhow::{Context, Result};
use async_trait::async_trait;
use ryan_application::{ConversationOrchestrator, ProjectUseCase};
use ryan_core::completion::{CompletionError, CompletionRequest, CompletionService};
use ryan_core::config::{AppConfig, SecretConfig};
use ryan_core::prompt::PromptRegistry;
use ryan_infrastructure::{
    ConfigService, DocumentProjectRepository, DocumentStore, FileDocumentStore, MemoryDocumentStore,
    RyanPaths,
};
use std::sync::Arc;
use std::time::Duration;

pub struct App {
    pub usecase: ProjectUseCase,
    /// Why completions cannot run, if the configured client failed to build.
    pub completion_problem: Option<String>,
}

/// Stands in for a client that could not be configured; every turn falls back.
struct UnconfiguredCompletion {
    reason: String,
}

#[async_trait]
impl CompletionService for UnconfiguredCompletion {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, CompletionError> {
        Err(CompletionError::NotConfigured(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "unconfigured"
    }
}

pub fn build(global: &GlobalArgs) -> Result<App> {
    let paths = RyanPaths::default();
    let config_path = match &global.config {
        Some(path) => path.clone(),
        None => paths.config_file().context("Failed to resolve config path")?,
    };
    let secret_path = paths.secret_file().context("Failed to resolve secret path")?;
    let config_service = ConfigService::new(config_path, secret_path);

    let config = config_service
        .load_config()
        .with_context(|| format!("Failed to load {}", config_service.config_path().display()))?;
    telemetry::init_telemetry(global.log_level.as_deref().or(config.log_level.as_deref()));

    let store = open_store(global, &config, &paths)?;
    let repository = Arc::new(DocumentProjectRepository::new(store));

    let secrets = config_service.load_secrets().unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable secrets: {}", e);
        SecretConfig::default()
    });
    let (completion, completion_problem) =
        match ryan_interaction::build_completion_service(&config.completion, &secrets) {
            Ok(service) => (service, None),
            Err(e) => {
                tracing::warn!("Completion client unavailable: {}", e);
                let service: Arc<dyn CompletionService> = Arc::new(UnconfiguredCompletion {
                    reason: e.to_string(),
                });
                (service, Some(e.to_string()))
            }
        };

    let timeout = match config.completion.timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let orchestrator = ConversationOrchestrator::new(repository, completion)
        .with_prompts(PromptRegistry::with_overrides(config.prompts.clone().into_map()))
        .with_timeout(timeout);

    Ok(App {
        usecase: ProjectUseCase::new(orchestrator),
        completion_problem,
    })
}

fn open_store(global: &GlobalArgs, config: &AppConfig, paths: &RyanPaths) -> Result<Arc<dyn DocumentStore>> {
    if global.ephemeral {
        tracing::info!("Ephemeral session: projects are not written to disk");
        return Ok(Arc::new(MemoryDocumentStore::new()));
    }

    let data_dir = match global.data_dir.as_ref().or(config.storage.data_dir.as_ref()) {
        Some(dir) => dir.clone(),
        None => paths.projects_dir().context("Failed to resolve data directory")?,
    };
    tracing::debug!("Project documents in {}", data_dir.display());

    let store = FileDocumentStore::new(data_dir.clone())
        .with_context(|| format!("Failed to open project store at {}", data_dir.display()))?;
    Ok(Arc::new(store))
}
