//! # Roster Migrator Repository
//! This crate provides the collaborator traits the migration engine is built
//! against (source extractor, target store, run registry, cache invalidator)
//! together with concrete implementations for PostgreSQL and in-memory
//! implementations used for tests and single-process deployments.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::{
    CacheError, RunConflictError, RunRegistryError, SourceRepositoryError, TargetRepositoryError,
};
pub use interfaces::{
    CacheInvalidator, CacheName, RestartPolicy, RunRegistry, SourceExtractor, TargetStore,
    TargetTransaction,
};
pub use memory::{
    CachedEntity, InMemoryReadCache, InMemoryRunRegistry, InMemorySourceExtractor,
    InMemoryTargetStore,
};
pub use postgres::{
    PostgresRunRegistry, PostgresSourceExtractor, PostgresSourceSeeder, PostgresTargetStore,
};
