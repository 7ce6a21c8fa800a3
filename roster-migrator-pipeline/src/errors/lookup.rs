//! Error types for the processor module of the Roster Migrator Pipeline.
use roster_migrator_repository::TargetRepositoryError;
use roster_migrator_shared::types::EntityKind;
use thiserror::Error;

/// A target store read issued during reconciliation failed. Fatal to the run.
#[derive(Debug, Error)]
#[error("Failed to look up {kind} {id} in the target store")]
pub struct LookupError {
    pub kind: EntityKind,
    pub id: String,
    #[source]
    pub source: TargetRepositoryError,
}
