//! Error types for the roster migrator repository.
//! Consolidates and re-exports the errors raised by every collaborator.
mod cache;
mod run_registry;
mod source;
mod target;

pub use cache::CacheError;
pub use run_registry::{RunConflictError, RunRegistryError};
pub use source::SourceRepositoryError;
pub use target::TargetRepositoryError;
