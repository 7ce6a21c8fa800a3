//! Error types for the orchestrator module of the Roster Migrator Pipeline.
use roster_migrator_repository::{RunConflictError, RunRegistryError};
use thiserror::Error;

use crate::errors::{ExtractionError, LookupError, WriteError};

/// Represents the reason a started run ended in `FAILED`.
///
/// Never returned to callers directly: it is flattened into the run result's
/// failure detail.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("Unexpected error")]
    Unexpected(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Represents a launch that was refused before any work started.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Run rejected: {0}")]
    RunConflict(#[from] RunConflictError),
    #[error("Run registry error: {0}")]
    RunRegistry(RunRegistryError),
}

impl From<RunRegistryError> for OrchestratorError {
    fn from(error: RunRegistryError) -> Self {
        match error {
            RunRegistryError::Conflict(conflict) => OrchestratorError::RunConflict(conflict),
            other => OrchestratorError::RunRegistry(other),
        }
    }
}
