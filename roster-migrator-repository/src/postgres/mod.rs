//! PostgreSQL implementations of the repository collaborators.
//!
//! The source and target stores are separate databases with their own
//! migration sets, exposed through [`SOURCE_MIGRATOR`] and [`TARGET_MIGRATOR`].
mod run_registry;
mod source_extractor;
mod source_seeder;
mod target_store;

pub use run_registry::PostgresRunRegistry;
pub use source_extractor::PostgresSourceExtractor;
pub use source_seeder::PostgresSourceSeeder;
pub use target_store::{PostgresTargetStore, PostgresTargetTransaction};

/// Schema of the source store (`source_units`, `source_members`).
pub static SOURCE_MIGRATOR: sqlx::migrate::Migrator =
    sqlx::migrate!("src/postgres/migrations/source");

/// Schema of the target store (`units`, `members`, `migration_runs`).
pub static TARGET_MIGRATOR: sqlx::migrate::Migrator =
    sqlx::migrate!("src/postgres/migrations/target");
