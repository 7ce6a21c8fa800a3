//! Error types for the source extractor.
use thiserror::Error;

/// Represents errors that can occur while reading the source store.
///
/// Every variant is fatal to the run that triggered the read.
#[derive(Debug, Error)]
pub enum SourceRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Source store unavailable: {0}")]
    Unavailable(String),
}
