//! Error types for the run registry.
use roster_migrator_shared::types::RunId;
use thiserror::Error;

/// A launch rejected because of the state of a run with the same identity.
///
/// Raised before any work starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RunConflictError {
    #[error("Run {0} is already running")]
    AlreadyRunning(RunId),

    #[error("Run {0} already completed; launch with a fresh identity")]
    AlreadyComplete(RunId),

    #[error("Run {0} failed and the restart policy does not allow relaunching it")]
    RestartNotAllowed(RunId),
}

/// Represents errors that can occur within the run registry.
#[derive(Debug, Error)]
pub enum RunRegistryError {
    #[error("Run conflict: {0}")]
    Conflict(#[from] RunConflictError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Invalid stored run status: {0}")]
    InvalidStatus(String),

    #[error("Run {0} is not running")]
    NotRunning(RunId),
}
