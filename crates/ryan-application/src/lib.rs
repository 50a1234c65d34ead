//! Application layer for Ryan.
//!
//! This crate provides the use cases that coordinate the domain model,
//! the project store and the completion service.

pub mod orchestrator;
pub mod persisted;
pub mod project;
pub mod project_usecase;

#[cfg(test)]
mod testing;

pub use orchestrator::{ConversationOrchestrator, FALLBACK_REPLY};
pub use persisted::Persisted;
pub use project_usecase::ProjectUseCase;
