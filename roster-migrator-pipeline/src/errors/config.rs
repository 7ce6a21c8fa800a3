//! Error types for the migration configuration.
use thiserror::Error;

/// Represents an invalid migration configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Chunk size must be greater than zero")]
    ZeroChunkSize,
    #[error("Page size must be greater than zero")]
    ZeroPageSize,
    #[error("Unknown restart policy: {0}")]
    UnknownRestartPolicy(String),
}
