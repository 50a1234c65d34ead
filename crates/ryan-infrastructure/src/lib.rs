//! Persistence and configuration adapters for Ryan.

pub mod config_service;
pub mod document_project_repository;
pub mod dto;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use document_project_repository::{CORRUPT_BACKUP_KEY, DocumentProjectRepository, PROJECTS_KEY};
pub use paths::RyanPaths;
pub use storage::{DocumentStore, DocumentStoreError, FileDocumentStore, MemoryDocumentStore};
