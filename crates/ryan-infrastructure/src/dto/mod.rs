//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema for persisting data.
//! They are private to the infrastructure layer and handle the evolution
//! of the storage format over time.
//!
//! ### ProjectDocument Version History
//! - **1.0.0**: Browser-era documents (no `schemaVersion`, diagram stored as `mermaid`)
//! - **1.1.0**: Explicit `schemaVersion`, diagram stored as `diagram`

mod project;

pub use project::{ArtifactDocument, MessageDocument, PROJECT_DOCUMENT_VERSION, ProjectDocument};
