//! PostgreSQL implementation of the source extractor.
//!
//! Every page is read inside its own read-only transaction, ordered by id.

use async_trait::async_trait;
use roster_migrator_shared::types::{SourceMemberRecord, SourceUnitRecord};
use sqlx::PgPool;

use crate::{SourceExtractor, SourceRepositoryError};

#[derive(sqlx::FromRow)]
struct SourceUnitRow {
    id: String,
    name: String,
    address: Option<String>,
    city: Option<String>,
}

impl From<SourceUnitRow> for SourceUnitRecord {
    fn from(row: SourceUnitRow) -> Self {
        SourceUnitRecord {
            id: row.id,
            name: row.name,
            address: row.address,
            city: row.city,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SourceMemberRow {
    id: String,
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone: Option<String>,
    external_key: String,
    state: String,
    unit_id: Option<String>,
}

impl From<SourceMemberRow> for SourceMemberRecord {
    fn from(row: SourceMemberRow) -> Self {
        SourceMemberRecord {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            external_key: row.external_key,
            state: row.state,
            unit_id: row.unit_id,
        }
    }
}

/// PostgreSQL-backed source extractor.
pub struct PostgresSourceExtractor {
    pool: PgPool,
}

impl PostgresSourceExtractor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl SourceExtractor for PostgresSourceExtractor {
    async fn read_units_page(
        &self,
        offset: u64,
        size: u64,
    ) -> Result<Vec<SourceUnitRecord>, SourceRepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await?;

        let rows: Vec<SourceUnitRow> = sqlx::query_as(
            "SELECT id, name, address, city FROM source_units ORDER BY id ASC LIMIT $1 OFFSET $2",
        )
        .bind(to_i64(size))
        .bind(to_i64(offset))
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(rows.into_iter().map(SourceUnitRecord::from).collect())
    }

    async fn read_members_page(
        &self,
        offset: u64,
        size: u64,
    ) -> Result<Vec<SourceMemberRecord>, SourceRepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await?;

        let rows: Vec<SourceMemberRow> = sqlx::query_as(
            r#"
                SELECT id, first_name, last_name, email, phone, external_key, state, unit_id
                FROM source_members
                ORDER BY id ASC
                LIMIT $1 OFFSET $2
            "#,
        )
        .bind(to_i64(size))
        .bind(to_i64(offset))
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(rows.into_iter().map(SourceMemberRecord::from).collect())
    }
}
