//! Error types for the Ryan application.

use crate::completion::CompletionError;
use thiserror::Error;

/// A shared error type for the entire Ryan application.
///
/// Library crates return this type; binaries wrap it in `anyhow` at the top level.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RyanError {
    /// The orchestrator was driven without an active project.
    ///
    /// This signals a bug in the calling collaborator and is not recoverable.
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// The completion service failed (transport, HTTP, or service-reported).
    ///
    /// Absorbed inside the orchestrator; never returned from a turn.
    #[error("Completion failure: {0}")]
    CompletionFailure(String),

    /// The persistence layer could not read or write.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A stored document could not be parsed into a project.
    #[error("Malformed document '{id}': {message}")]
    MalformedDocument { id: String, message: String },

    /// Another turn for the same project is still in flight.
    #[error("A turn is already in progress for project '{project_id}'")]
    TurnInProgress { project_id: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Caller-supplied value rejected before any state changed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },
}

impl RyanError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a PreconditionViolation error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionViolation(message.into())
    }

    /// Creates a StorageUnavailable error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageUnavailable(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a MalformedDocument error
    pub fn malformed(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a StorageUnavailable error
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }

    /// Check if this is a PreconditionViolation error
    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, Self::PreconditionViolation(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for RyanError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageUnavailable(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for RyanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for RyanError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<CompletionError> for RyanError {
    fn from(err: CompletionError) -> Self {
        Self::CompletionFailure(err.to_string())
    }
}

/// A type alias for `Result<T, RyanError>`.
pub type Result<T> = std::result::Result<T, RyanError>;
