//! Project repository trait.
//!
//! Defines the interface for project persistence operations.

use super::model::Project;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for managing project persistence.
///
/// Read paths are best-effort: the store is a cache of UI state, so `list`
/// and `get` degrade to "nothing stored" instead of failing. Write paths
/// report `RyanError::StorageUnavailable` so the caller can warn the user
/// that the session is not being preserved.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Upserts `project` by id.
    ///
    /// An existing entry is fully replaced and its `updated_at` is stamped by
    /// the store with the current time (never moving it backwards).
    async fn save(&self, project: &Project) -> Result<()>;

    /// Returns an owned copy of every stored project.
    async fn list(&self) -> Vec<Project>;

    /// Finds a project by its ID.
    async fn get(&self, id: &str) -> Option<Project>;

    /// Deletes a project. Deleting an absent id is not an error.
    async fn delete(&self, id: &str) -> Result<()>;
}
