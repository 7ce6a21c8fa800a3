//! This module defines the `RunRegistry` trait, which tracks the lifecycle of
//! migration runs by identity.
use roster_migrator_shared::types::{RunId, RunStatus};

use crate::errors::{RunConflictError, RunRegistryError};

/// Whether a run identity that ended in `FAILED` may be launched again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RestartPolicy {
    /// A failed run may be relaunched under the same identity.
    #[default]
    AllowAfterFailure,
    /// Every identity is single-use, whatever its outcome.
    Never,
}

impl RestartPolicy {
    /// Decides whether a run currently in `current` may move to `RUNNING`.
    pub fn admit(&self, run_id: RunId, current: RunStatus) -> Result<(), RunConflictError> {
        match (current, self) {
            (RunStatus::NotStarted, _) => Ok(()),
            (RunStatus::Running, _) => Err(RunConflictError::AlreadyRunning(run_id)),
            (RunStatus::Completed, _) => Err(RunConflictError::AlreadyComplete(run_id)),
            (RunStatus::Failed, RestartPolicy::AllowAfterFailure) => Ok(()),
            (RunStatus::Failed, RestartPolicy::Never) => {
                Err(RunConflictError::RestartNotAllowed(run_id))
            }
        }
    }
}

/// Registry of run identities and their states.
///
/// Implementations must make `begin` atomic: of two concurrent calls with the
/// same identity, at most one succeeds.
#[async_trait::async_trait]
pub trait RunRegistry: Send + Sync {
    /// Moves `run_id` to `RUNNING`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The caller owns the run and must eventually call `finish`
    /// * `Err(RunRegistryError::Conflict)` - The identity is running, complete,
    ///   or failed with restarts disallowed
    async fn begin(&self, run_id: RunId, policy: RestartPolicy) -> Result<(), RunRegistryError>;

    /// Records the terminal state of a running run.
    async fn finish(&self, run_id: RunId, status: RunStatus) -> Result<(), RunRegistryError>;

    /// Current state of `run_id`; `NotStarted` for unknown identities.
    async fn status(&self, run_id: RunId) -> Result<RunStatus, RunRegistryError>;
}
