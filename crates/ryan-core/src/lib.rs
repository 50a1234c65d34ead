//! Domain layer of Ryan.
//!
//! Holds the project state model, the prompt registry, the artifact
//! extractor and the contracts (`ProjectRepository`, `CompletionService`)
//! that the outer crates implement.

pub mod clock;
pub mod completion;
pub mod config;
pub mod error;
pub mod extractor;
pub mod ids;
pub mod project;
pub mod prompt;
pub mod system;

// Re-export common types
pub use error::{Result, RyanError};
pub use system::SystemKind;
