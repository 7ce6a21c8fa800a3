//! PostgreSQL implementation of the target store.
//!
//! Upserts use `ON CONFLICT (id) DO UPDATE`, so replaying a chunk converges to
//! the same rows. Foreign key and uniqueness failures surface as
//! [`TargetRepositoryError::ConstraintViolation`].

use async_trait::async_trait;
use roster_migrator_shared::types::{Member, MemberState, Unit};
use sqlx::{PgPool, Postgres, Transaction};

use crate::{TargetRepositoryError, TargetStore, TargetTransaction};

#[derive(sqlx::FromRow)]
struct UnitRow {
    id: String,
    name: String,
    address: Option<String>,
    city: Option<String>,
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: String,
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone: Option<String>,
    external_key: String,
    state: String,
    unit_id: Option<String>,
}

impl TryFrom<MemberRow> for Member {
    type Error = TargetRepositoryError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(Member {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            external_key: row.external_key,
            state: row.state.parse::<MemberState>()?,
            unit_ref: row.unit_id,
        })
    }
}

/// Maps integrity violations to `ConstraintViolation`, keeping everything else
/// as a plain database error.
fn classify(error: sqlx::Error) -> TargetRepositoryError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_foreign_key_violation()
            || db_error.is_unique_violation()
            || db_error.is_check_violation()
        {
            return TargetRepositoryError::ConstraintViolation(db_error.message().to_string());
        }
    }
    TargetRepositoryError::DatabaseError(error)
}

/// PostgreSQL-backed target store.
pub struct PostgresTargetStore {
    pool: PgPool,
}

impl PostgresTargetStore {
    /// Creates a target store over a pool whose database already carries the
    /// target schema (see [`crate::postgres::TARGET_MIGRATOR`]).
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TargetStore for PostgresTargetStore {
    async fn find_unit_by_id(&self, id: &str) -> Result<Option<Unit>, TargetRepositoryError> {
        let row: Option<UnitRow> =
            sqlx::query_as("SELECT id, name, address, city FROM units WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|row| Unit {
            id: row.id,
            name: row.name,
            address: row.address,
            city: row.city,
        }))
    }

    async fn find_member_by_id(&self, id: &str) -> Result<Option<Member>, TargetRepositoryError> {
        let row: Option<MemberRow> = sqlx::query_as(
            r#"
                SELECT id, first_name, last_name, email, phone, external_key, state, unit_id
                FROM members
                WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Member::try_from).transpose()
    }

    async fn begin(&self) -> Result<Box<dyn TargetTransaction>, TargetRepositoryError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresTargetTransaction { tx }))
    }
}

/// A write transaction on the target database.
pub struct PostgresTargetTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl TargetTransaction for PostgresTargetTransaction {
    async fn upsert_unit(&mut self, unit: &Unit) -> Result<(), TargetRepositoryError> {
        sqlx::query(
            r#"
                INSERT INTO units (id, name, address, city)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO UPDATE SET
                    name = EXCLUDED.name,
                    address = EXCLUDED.address,
                    city = EXCLUDED.city
            "#,
        )
        .bind(&unit.id)
        .bind(&unit.name)
        .bind(&unit.address)
        .bind(&unit.city)
        .execute(&mut *self.tx)
        .await
        .map_err(classify)?;

        Ok(())
    }

    async fn upsert_member(&mut self, member: &Member) -> Result<(), TargetRepositoryError> {
        sqlx::query(
            r#"
                INSERT INTO members (
                    id, first_name, last_name, email, phone, external_key, state, unit_id
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (id) DO UPDATE SET
                    first_name = EXCLUDED.first_name,
                    last_name = EXCLUDED.last_name,
                    email = EXCLUDED.email,
                    phone = EXCLUDED.phone,
                    external_key = EXCLUDED.external_key,
                    state = EXCLUDED.state,
                    unit_id = EXCLUDED.unit_id
            "#,
        )
        .bind(&member.id)
        .bind(&member.first_name)
        .bind(&member.last_name)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(&member.external_key)
        .bind(member.state.as_str())
        .bind(&member.unit_ref)
        .execute(&mut *self.tx)
        .await
        .map_err(classify)?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), TargetRepositoryError> {
        self.tx.commit().await.map_err(classify)
    }

    async fn rollback(self: Box<Self>) -> Result<(), TargetRepositoryError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
