//! This module defines and re-exports the collaborator interfaces consumed by
//! the migration engine.
mod cache_invalidator;
mod run_registry;
mod source_extractor;
mod target_store;

pub use cache_invalidator::{CacheInvalidator, CacheName};
pub use run_registry::{RestartPolicy, RunRegistry};
pub use source_extractor::SourceExtractor;
pub use target_store::{TargetStore, TargetTransaction};
