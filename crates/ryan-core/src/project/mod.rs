//! Project domain module.
//!
//! - `model`: the `Project` entity and its listing summary
//! - `message`: conversation messages and roles
//! - `artifact`: diagram/code artifacts and their field-wise merge
//! - `repository`: persistence trait

mod artifact;
mod message;
mod model;
mod repository;

pub use artifact::Artifact;
pub use message::{Message, MessageRole};
pub use model::{Project, ProjectSummary};
pub use repository::ProjectRepository;
