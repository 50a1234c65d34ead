//! `ProjectRepository` over a key-addressed document store.
//!
//! All projects live in one JSON array under [`PROJECTS_KEY`]. Every save
//! rewrites the whole collection. Entries that fail to parse are skipped on
//! read and written back untouched, so a single bad project never hides or
//! destroys the others.

use crate::dto::ProjectDocument;
use crate::storage::DocumentStore;
use async_trait::async_trait;
use ryan_core::clock::{Clock, SystemClock};
use ryan_core::error::{Result, RyanError};
use ryan_core::project::{Project, ProjectRepository};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Key of the project collection.
pub const PROJECTS_KEY: &str = "ryan_projects";

/// Key the previous document is copied to when the collection is unreadable.
pub const CORRUPT_BACKUP_KEY: &str = "ryan_projects.corrupt";

enum Collection {
    Entries(Vec<Value>),
    /// The stored root is not a JSON array; holds the raw text.
    Corrupt(String),
}

pub struct DocumentProjectRepository {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl DocumentProjectRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    fn read_collection(&self) -> Result<Collection> {
        let Some(raw) = self.store.read(PROJECTS_KEY)? else {
            return Ok(Collection::Entries(Vec::new()));
        };
        if raw.trim().is_empty() {
            return Ok(Collection::Entries(Vec::new()));
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => Ok(Collection::Entries(entries)),
            Ok(_) | Err(_) => Ok(Collection::Corrupt(raw)),
        }
    }

    /// Readable entries; storage and corruption problems degrade to empty.
    fn load_entries(&self) -> Vec<Value> {
        match self.read_collection() {
            Ok(Collection::Entries(entries)) => entries,
            Ok(Collection::Corrupt(_)) => {
                tracing::warn!("Project collection '{}' is not a JSON array; treating as empty", PROJECTS_KEY);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Failed to read project collection: {}", e);
                Vec::new()
            }
        }
    }

    /// Loads the writable collection, backing up an unreadable root first.
    fn load_for_write(&self) -> Result<Vec<Value>> {
        match self.read_collection()? {
            Collection::Entries(entries) => Ok(entries),
            Collection::Corrupt(raw) => {
                tracing::warn!(
                    "Replacing unreadable project collection; previous content kept under '{}'",
                    CORRUPT_BACKUP_KEY
                );
                self.store.write(CORRUPT_BACKUP_KEY, &raw)?;
                Ok(Vec::new())
            }
        }
    }

    fn write_entries(&self, entries: &[Value]) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        self.store.write(PROJECTS_KEY, &json)?;
        Ok(())
    }
}

fn entry_id(entry: &Value) -> Option<&str> {
    entry.get("id").and_then(Value::as_str)
}

fn parse_entry(entry: &Value) -> Result<Project> {
    let id = entry_id(entry).unwrap_or("<unknown>").to_string();
    let document: ProjectDocument = serde_json::from_value(entry.clone())
        .map_err(|e| RyanError::malformed(id, e.to_string()))?;
    document.into_domain()
}

#[async_trait]
impl ProjectRepository for DocumentProjectRepository {
    async fn save(&self, project: &Project) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_for_write()?;

        let mut stored = project.clone();
        let existing = entries
            .iter()
            .position(|entry| entry_id(entry) == Some(project.id.as_str()));
        if existing.is_some() {
            stored.touch(self.clock.now());
        }
        let value = serde_json::to_value(ProjectDocument::from(&stored))?;

        match existing {
            Some(index) => entries[index] = value,
            None => entries.push(value),
        }

        self.write_entries(&entries)?;
        tracing::debug!("Saved project {} ({} in collection)", project.id, entries.len());
        Ok(())
    }

    async fn list(&self) -> Vec<Project> {
        self.load_entries()
            .iter()
            .filter_map(|entry| match parse_entry(entry) {
                Ok(project) => Some(project),
                Err(e) => {
                    tracing::warn!("Skipping stored project: {}", e);
                    None
                }
            })
            .collect()
    }

    async fn get(&self, id: &str) -> Option<Project> {
        let entries = self.load_entries();
        let entry = entries.iter().find(|entry| entry_id(entry) == Some(id))?;
        match parse_entry(entry) {
            Ok(project) => Some(project),
            Err(e) => {
                tracing::warn!("Stored project {} is unreadable: {}", id, e);
                None
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_for_write()?;
        let before = entries.len();
        entries.retain(|entry| entry_id(entry) != Some(id));
        if entries.len() == before {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}
