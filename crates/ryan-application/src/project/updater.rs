//! Project updater helper for common update patterns.
//!
//! This module provides `ProjectUpdater` which abstracts the common
//! "find → update → save" pattern used for project metadata edits.

use ryan_core::clock::Clock;
use ryan_core::error::{Result, RyanError};
use ryan_core::project::{Project, ProjectRepository};
use std::sync::Arc;

/// Helper struct for updating projects with a common pattern.
///
/// `ProjectUpdater` encapsulates:
/// 1. Loading a project from storage
/// 2. Applying updates
/// 3. Refreshing the timestamp
/// 4. Saving back to storage
pub struct ProjectUpdater {
    repository: Arc<dyn ProjectRepository>,
    clock: Arc<dyn Clock>,
}

impl ProjectUpdater {
    pub fn new(repository: Arc<dyn ProjectRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Updates a project by applying the given updater function.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The project doesn't exist
    /// - The updater function returns an error
    /// - Saving to storage fails
    pub async fn update<F>(&self, project_id: &str, updater: F) -> Result<Project>
    where
        F: FnOnce(&mut Project) -> Result<()>,
    {
        tracing::debug!("[ProjectUpdater] update() called for project_id: {}", project_id);

        let mut project = self
            .repository
            .get(project_id)
            .await
            .ok_or_else(|| RyanError::not_found("Project", project_id))?;

        updater(&mut project)?;
        project.touch(self.clock.now());

        self.repository.save(&project).await?;
        tracing::debug!("[ProjectUpdater] Project saved: id={}", project.id);

        Ok(project)
    }
}
