//! Storage layer for atomic document operations.

mod document_store;
mod file_document_store;
mod memory_document_store;

pub use document_store::{DocumentStore, DocumentStoreError};
pub use file_document_store::FileDocumentStore;
pub use memory_document_store::MemoryDocumentStore;
