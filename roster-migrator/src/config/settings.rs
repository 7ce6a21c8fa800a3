//! Settings read from environment variables.
use std::env;

use roster_migrator_pipeline::orchestrator::{
    DEFAULT_CHUNK_SIZE, MigrationConfig, parse_restart_policy,
};
use roster_migrator_repository::RestartPolicy;

use crate::MigratorError;

/// Default pool size per database.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Reads `LOG_FORMAT`; anything other than `json` means pretty output.
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Everything the binary needs to start a run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source_database_url: String,
    pub target_database_url: String,
    pub migration: MigrationConfig,
    pub max_connections: u32,
    pub seed_source: bool,
}

fn required(name: &str) -> Result<String, MigratorError> {
    env::var(name).map_err(|_| MigratorError::config(format!("{} must be set", name)))
}

fn parsed<T: std::str::FromStr>(name: &str) -> Result<Option<T>, MigratorError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| MigratorError::config(format!("{} has an invalid value: {}", name, value))),
        Err(_) => Ok(None),
    }
}

impl Settings {
    /// Reads settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SOURCE_DATABASE_URL`: PostgreSQL URL of the source store (required)
    /// - `TARGET_DATABASE_URL`: PostgreSQL URL of the target store (required)
    /// - `MIGRATION_CHUNK_SIZE`: Records per write transaction (default: 100)
    /// - `MIGRATION_PAGE_SIZE`: Records per source page (default: the chunk size)
    /// - `MIGRATION_RESTART_POLICY`: `allow-after-failure` or `never` (default: allow-after-failure)
    /// - `PG_MAX_CONNECTIONS`: Pool size per database (default: 5)
    /// - `SEED_SOURCE_DB`: Seed an empty source store first (default: false)
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - Validated settings
    /// * `Err(MigratorError)` - A variable is missing, unparsable or zero
    pub fn from_env() -> Result<Self, MigratorError> {
        let source_database_url = required("SOURCE_DATABASE_URL")?;
        let target_database_url = required("TARGET_DATABASE_URL")?;

        let chunk_size = parsed::<usize>("MIGRATION_CHUNK_SIZE")?.unwrap_or(DEFAULT_CHUNK_SIZE);
        let page_size = parsed::<u64>("MIGRATION_PAGE_SIZE")?;
        let restart_policy = match env::var("MIGRATION_RESTART_POLICY") {
            Ok(value) => parse_restart_policy(&value)?,
            Err(_) => RestartPolicy::default(),
        };
        let migration = MigrationConfig::new(chunk_size, page_size, restart_policy)?;

        let max_connections =
            parsed::<u32>("PG_MAX_CONNECTIONS")?.unwrap_or(DEFAULT_MAX_CONNECTIONS);
        if max_connections == 0 {
            return Err(MigratorError::config("PG_MAX_CONNECTIONS must be greater than zero"));
        }
        let seed_source = parsed::<bool>("SEED_SOURCE_DB")?.unwrap_or(false);

        Ok(Self {
            source_database_url,
            target_database_url,
            migration,
            max_connections,
            seed_source,
        })
    }
}
