//! Process-local document store.

use super::document_store::{validate_key, DocumentStore, DocumentStoreError};
use std::collections::HashMap;
use std::sync::Mutex;

/// Keeps documents in memory; nothing survives the process.
///
/// Used for ephemeral sessions (`--ephemeral`) and tests.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<String, String>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one document.
    pub fn with_document(key: impl Into<String>, document: impl Into<String>) -> Self {
        let store = Self::default();
        if let Ok(mut documents) = store.documents.lock() {
            documents.insert(key.into(), document.into());
        }
        store
    }

    fn documents(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, DocumentStoreError> {
        self.documents
            .lock()
            .map_err(|e| DocumentStoreError::Unavailable(format!("poisoned lock: {e}")))
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn read(&self, key: &str) -> Result<Option<String>, DocumentStoreError> {
        validate_key(key)?;
        Ok(self.documents()?.get(key).cloned())
    }

    fn write(&self, key: &str, document: &str) -> Result<(), DocumentStoreError> {
        validate_key(key)?;
        self.documents()?.insert(key.to_string(), document.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DocumentStoreError> {
        validate_key(key)?;
        self.documents()?.remove(key);
        Ok(())
    }
}
