//! Opaque key-value document store.
//!
//! The project repository only needs to read, write and remove whole string
//! documents by key; it never sees how they are kept.

use ryan_core::RyanError;
use thiserror::Error;

/// Errors that can occur during document store operations.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    /// File I/O error.
    #[error("I/O error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    /// File locking error.
    #[error("Lock error on '{key}': {message}")]
    Lock { key: String, message: String },
    /// Key contains characters that cannot be stored.
    #[error("Invalid document key '{0}'")]
    InvalidKey(String),
    /// The backing medium refused the operation.
    #[error("Document store unavailable: {0}")]
    Unavailable(String),
}

impl From<DocumentStoreError> for RyanError {
    fn from(err: DocumentStoreError) -> Self {
        RyanError::StorageUnavailable(err.to_string())
    }
}

/// A durable mapping from keys to string documents.
///
/// Writes replace the whole document and must be atomic: a reader sees
/// either the previous or the new document, never a mix.
pub trait DocumentStore: Send + Sync {
    /// Returns the document under `key`, or `None` if absent.
    fn read(&self, key: &str) -> Result<Option<String>, DocumentStoreError>;

    /// Replaces the document under `key`.
    fn write(&self, key: &str, document: &str) -> Result<(), DocumentStoreError>;

    /// Removes the document under `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), DocumentStoreError>;
}

/// Keys map to file names, so only a conservative character set is allowed.
pub(crate) fn validate_key(key: &str) -> Result<(), DocumentStoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(DocumentStoreError::InvalidKey(key.to_string()))
    }
}
