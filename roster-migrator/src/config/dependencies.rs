//! Dependency initialization and wiring for the roster migrator.
use std::sync::Arc;

use roster_migrator_pipeline::notifier::CompletionNotifier;
use roster_migrator_pipeline::orchestrator::Orchestrator;
use roster_migrator_repository::postgres::{SOURCE_MIGRATOR, TARGET_MIGRATOR};
use roster_migrator_repository::{
    InMemoryReadCache, PostgresRunRegistry, PostgresSourceExtractor, PostgresSourceSeeder,
    PostgresTargetStore,
};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::Settings;
use crate::{MigratorError, seed};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Arc<Orchestrator>,
    /// Read caches invalidated after a completed run.
    pub read_cache: Arc<InMemoryReadCache>,
}

impl Dependencies {
    /// Connects to both databases, applies their schemas, optionally seeds
    /// the source store and builds the orchestrator.
    ///
    /// # Arguments
    ///
    /// * `settings` - Settings read from the environment
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(MigratorError)` - A connection, schema migration or seed failed
    pub async fn new(settings: &Settings) -> Result<Self, MigratorError> {
        info!(
            chunk_size = settings.migration.chunk_size,
            page_size = settings.migration.page_size,
            restart_policy = ?settings.migration.restart_policy,
            max_connections = settings.max_connections,
            seed_source = settings.seed_source,
            "Initializing dependencies"
        );

        let source_pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&settings.source_database_url)
            .await?;
        let target_pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&settings.target_database_url)
            .await?;

        SOURCE_MIGRATOR.run(&source_pool).await?;
        TARGET_MIGRATOR.run(&target_pool).await?;
        info!("Database schemas are up to date");

        if settings.seed_source {
            seed::seed_source(&PostgresSourceSeeder::new(source_pool.clone())).await?;
        }

        let read_cache = Arc::new(InMemoryReadCache::new());
        let orchestrator = Orchestrator::with_stores(
            Arc::new(PostgresSourceExtractor::new(source_pool)),
            Arc::new(PostgresTargetStore::new(target_pool.clone())),
            Arc::new(PostgresRunRegistry::new(target_pool)),
            CompletionNotifier::with_tracing(read_cache.clone()),
            &settings.migration,
        );

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            read_cache,
        })
    }
}
