//! PostgreSQL implementation of the run registry.
//!
//! Runs are rows of the `migration_runs` table. `begin` locks the row with
//! `SELECT ... FOR UPDATE` (or races on `ON CONFLICT DO NOTHING` for a fresh
//! identity), so concurrent launches of one identity serialize on the row.

use async_trait::async_trait;
use roster_migrator_shared::types::{RunId, RunStatus};
use sqlx::{PgPool, Row};
use tracing::debug;

use crate::{RestartPolicy, RunRegistry, RunRegistryError};

/// PostgreSQL-backed run registry.
pub struct PostgresRunRegistry {
    pool: PgPool,
}

impl PostgresRunRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_status(value: &str) -> Result<RunStatus, RunRegistryError> {
    RunStatus::parse(value).ok_or_else(|| RunRegistryError::InvalidStatus(value.to_string()))
}

#[async_trait]
impl RunRegistry for PostgresRunRegistry {
    async fn begin(&self, run_id: RunId, policy: RestartPolicy) -> Result<(), RunRegistryError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO migration_runs (run_id, status) VALUES ($1, $2) ON CONFLICT (run_id) DO NOTHING",
        )
        .bind(run_id.value())
        .bind(RunStatus::Running.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 1 {
            tx.commit().await?;
            debug!(run_id = %run_id, "Registered new run");
            return Ok(());
        }

        let row = sqlx::query("SELECT status FROM migration_runs WHERE run_id = $1 FOR UPDATE")
            .bind(run_id.value())
            .fetch_one(&mut *tx)
            .await?;
        let current = parse_status(row.try_get::<&str, _>("status")?)?;

        if let Err(conflict) = policy.admit(run_id, current) {
            tx.rollback().await?;
            return Err(conflict.into());
        }

        sqlx::query(
            r#"
                UPDATE migration_runs
                SET status = $2, attempts = attempts + 1, started_at = now(), finished_at = NULL
                WHERE run_id = $1
            "#,
        )
        .bind(run_id.value())
        .bind(RunStatus::Running.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(run_id = %run_id, "Restarted failed run");
        Ok(())
    }

    async fn finish(&self, run_id: RunId, status: RunStatus) -> Result<(), RunRegistryError> {
        if !status.is_terminal() {
            return Err(RunRegistryError::InvalidStatus(status.to_string()));
        }

        let updated = sqlx::query(
            "UPDATE migration_runs SET status = $2, finished_at = now() WHERE run_id = $1 AND status = $3",
        )
        .bind(run_id.value())
        .bind(status.as_str())
        .bind(RunStatus::Running.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(RunRegistryError::NotRunning(run_id));
        }
        Ok(())
    }

    async fn status(&self, run_id: RunId) -> Result<RunStatus, RunRegistryError> {
        let row = sqlx::query("SELECT status FROM migration_runs WHERE run_id = $1")
            .bind(run_id.value())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => parse_status(row.try_get::<&str, _>("status")?),
            None => Ok(RunStatus::NotStarted),
        }
    }
}
