//! Error types for cache invalidation.
use thiserror::Error;

/// Represents errors raised by a cache invalidation collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),
}
