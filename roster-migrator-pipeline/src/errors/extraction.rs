//! Error types for the extractor module of the Roster Migrator Pipeline.
use roster_migrator_repository::SourceRepositoryError;
use roster_migrator_shared::types::EntityKind;
use thiserror::Error;

/// A source page could not be read. Fatal to the run.
#[derive(Debug, Error)]
#[error("Failed to read {kind} page at offset {offset}")]
pub struct ExtractionError {
    pub kind: EntityKind,
    pub offset: u64,
    #[source]
    pub source: SourceRepositoryError,
}
