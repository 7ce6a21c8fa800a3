//! Error types for the Roster Migrator application.
//! Consolidates the errors that can stop the binary, from configuration to
//! a failed run.
use roster_migrator_pipeline::errors::{ConfigError, OrchestratorError};
use roster_migrator_repository::SourceRepositoryError;
use roster_migrator_shared::types::RunId;

#[derive(Debug, thiserror::Error)]
pub enum MigratorError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid migration settings: {0}")]
    InvalidMigrationConfig(#[from] ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Schema migration error: {0}")]
    Schema(#[from] sqlx::migrate::MigrateError),
    #[error("Source seeding error: {0}")]
    Seed(#[from] SourceRepositoryError),
    #[error("Orchestrator error: {0}")]
    Orchestrator(#[from] OrchestratorError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Migration run {0} failed")]
    RunFailed(RunId),
}

impl MigratorError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
