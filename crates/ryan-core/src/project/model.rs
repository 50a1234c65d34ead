//! Project domain model.
//!
//! A project holds one message log and one artifact slot per system. This is
//! the "pure" domain model that business logic operates on, independent of
//! the storage format.

use super::artifact::Artifact;
use super::message::Message;
use crate::system::SystemKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A project driven through the four conversational systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier, assigned at creation.
    pub id: String,
    pub name: String,
    pub description: String,
    /// The system the user is conversing with.
    pub current_system: SystemKind,
    /// Message log per system; every system has an entry.
    pub messages: BTreeMap<SystemKind, Vec<Message>>,
    /// Latest merged artifact per system.
    #[serde(default)]
    pub data: BTreeMap<SystemKind, Artifact>,
    pub created_at: DateTime<Utc>,
    /// Never earlier than `created_at`, never decreasing.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a fresh project on the analyzer with empty logs for every system.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            current_system: SystemKind::Analyzer,
            messages: empty_logs(),
            data: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The message log of `system`, oldest first.
    pub fn history(&self, system: SystemKind) -> &[Message] {
        self.messages
            .get(&system)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Appends a message to the log of `system`.
    pub fn append_message(&mut self, system: SystemKind, message: Message) {
        self.messages.entry(system).or_default().push(message);
    }

    /// The recorded artifact of `system`, if any.
    pub fn artifact(&self, system: SystemKind) -> Option<&Artifact> {
        self.data.get(&system)
    }

    /// Field-wise merge of `update` into the artifact slot of `system`.
    ///
    /// Returns `false` (and leaves the slot untouched) for an empty update.
    pub fn merge_artifact(&mut self, system: SystemKind, update: Artifact) -> bool {
        if update.is_empty() {
            return false;
        }
        self.data.entry(system).or_default().merge(update)
    }

    /// Refreshes `updated_at`, never moving it backwards.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let floor = self.updated_at.max(self.created_at);
        self.updated_at = now.max(floor);
    }

    /// Restores the invariant that every system has a (possibly empty) log.
    ///
    /// Returns true if anything had to be added.
    pub fn ensure_all_systems(&mut self) -> bool {
        let mut repaired = false;
        for kind in SystemKind::ALL {
            if !self.messages.contains_key(&kind) {
                self.messages.insert(kind, Vec::new());
                repaired = true;
            }
        }
        repaired
    }

    /// Total number of messages across all systems.
    pub fn message_count(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }
}

fn empty_logs() -> BTreeMap<SystemKind, Vec<Message>> {
    SystemKind::ALL
        .into_iter()
        .map(|kind| (kind, Vec::new()))
        .collect()
}

/// Lightweight listing entry for project pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub current_system: SystemKind,
    pub message_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            current_system: project.current_system,
            message_count: project.message_count(),
            updated_at: project.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::MessageRole;
    use chrono::Duration;

    #[test]
    fn test_new_project_has_all_logs_empty() {
        let project = Project::new("p1", "A", "", Utc::now());

        assert_eq!(project.current_system, SystemKind::Analyzer);
        assert_eq!(project.messages.len(), SystemKind::COUNT);
        assert!(project.messages.values().all(Vec::is_empty));
        assert!(project.data.is_empty());
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn test_touch_never_moves_backwards() {
        let start = Utc::now();
        let mut project = Project::new("p1", "A", "", start);

        project.touch(start + Duration::seconds(10));
        assert_eq!(project.updated_at, start + Duration::seconds(10));

        project.touch(start - Duration::seconds(60));
        assert_eq!(project.updated_at, start + Duration::seconds(10));
    }

    #[test]
    fn test_ensure_all_systems_repairs_partial_logs() {
        let mut project = Project::new("p1", "A", "", Utc::now());
        project.messages.remove(&SystemKind::Wireframe);

        assert!(project.ensure_all_systems());
        assert!(project.history(SystemKind::Wireframe).is_empty());
        assert!(!project.ensure_all_systems());
    }

    #[test]
    fn test_history_follows_append_order() {
        let now = Utc::now();
        let mut project = Project::new("p1", "A", "", now);
        project.append_message(
            SystemKind::Planner,
            Message::new("m1", MessageRole::User, "first", now),
        );
        project.append_message(
            SystemKind::Planner,
            Message::new("m2", MessageRole::Assistant, "second", now),
        );

        let ids: Vec<_> = project
            .history(SystemKind::Planner)
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, ["m1", "m2"]);
        assert!(project.history(SystemKind::Analyzer).is_empty());
        assert_eq!(project.message_count(), 2);
    }
}
