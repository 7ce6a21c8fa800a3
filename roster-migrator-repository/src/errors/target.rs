//! Error types for the target store.
use roster_migrator_shared::types::UnknownMemberState;
use thiserror::Error;

/// Represents errors that can occur while reading or writing the target store.
#[derive(Debug, Error)]
pub enum TargetRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Corrupt member row: {0}")]
    CorruptMemberState(#[from] UnknownMemberState),
}
