//! Project use case implementation.
//!
//! `ProjectUseCase` is the surface presentation layers talk to. It owns the
//! notion of an *active* project and routes turns and system switches for it
//! through the `ConversationOrchestrator`.

use crate::orchestrator::ConversationOrchestrator;
use crate::persisted::Persisted;
use crate::project::ProjectUpdater;
use ryan_core::error::{Result, RyanError};
use ryan_core::project::{Artifact, Project, ProjectSummary};
use ryan_core::SystemKind;
use tokio::sync::RwLock;

pub struct ProjectUseCase {
    orchestrator: ConversationOrchestrator,
    updater: ProjectUpdater,
    /// Project the user is currently working in.
    active: RwLock<Option<Project>>,
}

impl ProjectUseCase {
    pub fn new(orchestrator: ConversationOrchestrator) -> Self {
        let updater = ProjectUpdater::new(
            orchestrator.repository().clone(),
            orchestrator.clock().clone(),
        );
        Self {
            orchestrator,
            updater,
            active: RwLock::new(None),
        }
    }

    /// Creates a project in the `analyzer` system and makes it active.
    pub async fn create_project(&self, name: &str, description: &str) -> Result<Persisted<Project>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RyanError::invalid_input("project name must not be empty"));
        }

        let project = Project::new(
            self.orchestrator.ids().next_id(),
            name,
            description.trim(),
            self.orchestrator.clock().now(),
        );
        tracing::info!("Created project {} ({})", project.name, project.id);

        let persisted = self.orchestrator.persist(project).await;
        *self.active.write().await = Some(persisted.value.clone());
        Ok(persisted)
    }

    /// Loads a stored project and makes it active.
    pub async fn open_project(&self, id: &str) -> Result<Project> {
        let project = self
            .orchestrator
            .repository()
            .get(id)
            .await
            .ok_or_else(|| RyanError::not_found("Project", id))?;
        *self.active.write().await = Some(project.clone());
        Ok(project)
    }

    pub async fn active_project(&self) -> Option<Project> {
        self.active.read().await.clone()
    }

    /// Submits `text` to the active project's current system.
    pub async fn submit_turn(&self, text: &str) -> Result<Persisted<Project>> {
        let system = self.require_active().await?.current_system;
        self.submit_turn_to(system, text).await
    }

    /// Submits `text` to `system` of the active project.
    pub async fn submit_turn_to(&self, system: SystemKind, text: &str) -> Result<Persisted<Project>> {
        let project = self.require_active().await?;
        let result = self.orchestrator.submit_turn(project, system, text).await?;
        self.replace_active(&result.value).await;
        Ok(result)
    }

    pub async fn switch_system(&self, system: SystemKind) -> Result<Persisted<Project>> {
        let project = self.require_active().await?;
        let result = self.orchestrator.switch_system(project, system).await?;
        self.replace_active(&result.value).await;
        Ok(result)
    }

    /// Summaries of all readable projects, most recently updated first.
    pub async fn list_projects(&self) -> Vec<ProjectSummary> {
        let mut summaries: Vec<ProjectSummary> = self
            .orchestrator
            .repository()
            .list()
            .await
            .iter()
            .map(ProjectSummary::from)
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        summaries
    }

    /// Partially updates name and/or description of a stored project.
    ///
    /// Rejected with `TurnInProgress` while a turn for the project is running.
    pub async fn update_details(
        &self,
        id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Project> {
        let _permit = self.orchestrator.reserve(id)?;
        let updated = self
            .updater
            .update(id, |project| {
                if let Some(name) = name {
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(RyanError::invalid_input("project name must not be empty"));
                    }
                    project.name = name.to_string();
                }
                if let Some(description) = description {
                    project.description = description.trim().to_string();
                }
                Ok(())
            })
            .await?;
        self.replace_active(&updated).await;
        Ok(updated)
    }

    /// Deletes a project, clearing it as the active one if it was.
    ///
    /// Rejected with `TurnInProgress` while a turn for the project is running.
    pub async fn delete_project(&self, id: &str) -> Result<()> {
        let _permit = self.orchestrator.reserve(id)?;
        self.orchestrator.repository().delete(id).await?;

        let mut active = self.active.write().await;
        if active.as_ref().is_some_and(|p| p.id == id) {
            *active = None;
        }
        tracing::info!("Deleted project {}", id);
        Ok(())
    }

    /// Latest artifact of `system` on the active project.
    pub async fn artifact(&self, system: SystemKind) -> Option<Artifact> {
        self.active
            .read()
            .await
            .as_ref()
            .and_then(|p| p.artifact(system).cloned())
    }

    async fn require_active(&self) -> Result<Project> {
        self.active
            .read()
            .await
            .clone()
            .ok_or_else(|| RyanError::precondition("no active project"))
    }

    /// Refreshes the active copy if it is still the same project.
    async fn replace_active(&self, project: &Project) {
        let mut active = self.active.write().await;
        if active.as_ref().is_some_and(|p| p.id == project.id) {
            *active = Some(project.clone());
        }
    }
}
