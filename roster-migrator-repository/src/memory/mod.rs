//! In-memory implementations of the collaborator interfaces.
//!
//! They honour the same contracts as the PostgreSQL implementations
//! (ordering, transactional visibility, referential and uniqueness
//! constraints, atomic run admission) and back the engine's test suites.
mod read_cache;
mod run_registry;
mod source;
mod target;

pub use read_cache::{CachedEntity, InMemoryReadCache};
pub use run_registry::InMemoryRunRegistry;
pub use source::InMemorySourceExtractor;
pub use target::{InMemoryTargetStore, InMemoryTargetTransaction};
