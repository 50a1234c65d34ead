//! Project document DTOs.

use chrono::{DateTime, Utc};
use ryan_core::error::{Result, RyanError};
use ryan_core::project::{Artifact, Message, MessageRole, Project};
use ryan_core::SystemKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current schema version for ProjectDocument.
pub const PROJECT_DOCUMENT_VERSION: &str = "1.1.0";

/// Version assumed for documents written before `schemaVersion` existed.
const LEGACY_PROJECT_DOCUMENT_VERSION: &str = "1.0.0";

fn legacy_version() -> String {
    LEGACY_PROJECT_DOCUMENT_VERSION.to_string()
}

/// One project as stored in the `ryan_projects` collection.
///
/// Keys are camelCase and timestamps are RFC 3339 strings so that documents
/// written by the browser-era client load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    #[serde(default = "legacy_version")]
    pub schema_version: String,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub current_system: SystemKind,
    /// `messages` and `data` are keyed by system name. Keys that name no
    /// known system are dropped on load.
    #[serde(default)]
    pub messages: BTreeMap<String, Vec<MessageDocument>>,
    #[serde(default)]
    pub data: BTreeMap<String, ArtifactDocument>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDocument {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Stored artifact. V1.0 documents called the diagram field `mermaid`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDocument {
    #[serde(default, alias = "mermaid", skip_serializing_if = "Option::is_none")]
    pub diagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub text: String,
}

impl ProjectDocument {
    /// Converts to the domain model, repairing missing message logs.
    pub fn into_domain(self) -> Result<Project> {
        let major = self.schema_version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(RyanError::malformed(
                self.id,
                format!("unsupported schema version {}", self.schema_version),
            ));
        }

        let mut project = Project {
            id: self.id,
            name: self.name,
            description: self.description,
            current_system: self.current_system,
            messages: self
                .messages
                .into_iter()
                .filter_map(|(key, log)| {
                    let kind = known_system(&key, "message log")?;
                    Some((kind, log.into_iter().map(Message::from).collect()))
                })
                .collect(),
            data: self
                .data
                .into_iter()
                .filter_map(|(key, artifact)| Some((known_system(&key, "artifact")?, Artifact::from(artifact))))
                .filter(|(_, artifact)| !artifact.is_empty())
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at.max(self.created_at),
        };

        if project.ensure_all_systems() {
            tracing::debug!("Repaired missing message logs for project {}", project.id);
        }
        Ok(project)
    }
}

fn known_system(key: &str, what: &str) -> Option<SystemKind> {
    match key.parse() {
        Ok(kind) => Some(kind),
        Err(_) => {
            tracing::debug!("Dropping {} under unknown key {}", what, key);
            None
        }
    }
}

impl From<&Project> for ProjectDocument {
    fn from(project: &Project) -> Self {
        Self {
            schema_version: PROJECT_DOCUMENT_VERSION.to_string(),
            id: project.id.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            current_system: project.current_system,
            messages: project
                .messages
                .iter()
                .map(|(kind, log)| (kind.as_str().to_string(), log.iter().map(MessageDocument::from).collect()))
                .collect(),
            data: project
                .data
                .iter()
                .map(|(kind, artifact)| (kind.as_str().to_string(), ArtifactDocument::from(artifact)))
                .collect(),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

impl From<MessageDocument> for Message {
    fn from(doc: MessageDocument) -> Self {
        Message::new(doc.id, doc.role, doc.content, doc.timestamp)
    }
}

impl From<&Message> for MessageDocument {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            role: message.role,
            content: message.content.clone(),
            timestamp: message.timestamp,
        }
    }
}

impl From<ArtifactDocument> for Artifact {
    fn from(doc: ArtifactDocument) -> Self {
        Artifact {
            diagram: doc.diagram,
            code: doc.code,
            text: doc.text,
        }
    }
}

impl From<&Artifact> for ArtifactDocument {
    fn from(artifact: &Artifact) -> Self {
        Self {
            diagram: artifact.diagram.clone(),
            code: artifact.code.clone(),
            text: artifact.text.clone(),
        }
    }
}
