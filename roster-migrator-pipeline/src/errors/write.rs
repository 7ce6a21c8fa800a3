//! Error types for the writer module of the Roster Migrator Pipeline.
use roster_migrator_repository::TargetRepositoryError;
use roster_migrator_shared::types::EntityKind;
use thiserror::Error;

/// A chunk could not be committed. The chunk is rolled back; earlier chunks
/// stay committed.
#[derive(Debug, Error)]
#[error("Failed to write {kind} chunk {chunk} ({records} records)")]
pub struct WriteError {
    pub kind: EntityKind,
    pub chunk: usize,
    pub records: usize,
    #[source]
    pub source: TargetRepositoryError,
}
