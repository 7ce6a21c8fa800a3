//! Bulk loader for the source store, used to provision demo and test data.
//!
//! This is the only component that writes to the source database; the
//! migration itself only ever reads it.

use roster_migrator_shared::types::{SourceMemberRecord, SourceUnitRecord};
use sqlx::{PgPool, Row};

use crate::SourceRepositoryError;

pub struct PostgresSourceSeeder {
    pool: PgPool,
}

impl PostgresSourceSeeder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn count_units(&self) -> Result<i64, SourceRepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM source_units")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    /// Inserts units and members in one transaction. Rows whose id already
    /// exists are left untouched.
    ///
    /// # Arguments
    ///
    /// * `units` - Units to insert, written before the members
    /// * `members` - Members to insert
    pub async fn seed(
        &self,
        units: &[SourceUnitRecord],
        members: &[SourceMemberRecord],
    ) -> Result<(), SourceRepositoryError> {
        let mut tx = self.pool.begin().await?;

        if !units.is_empty() {
            let mut ids = Vec::with_capacity(units.len());
            let mut names = Vec::with_capacity(units.len());
            let mut addresses = Vec::with_capacity(units.len());
            let mut cities = Vec::with_capacity(units.len());
            for unit in units {
                ids.push(unit.id.as_str());
                names.push(unit.name.as_str());
                addresses.push(unit.address.as_deref());
                cities.push(unit.city.as_deref());
            }

            sqlx::query(
                r#"
                    INSERT INTO source_units (id, name, address, city)
                    SELECT * FROM UNNEST($1::text[], $2::text[], $3::text[], $4::text[])
                    ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(&ids)
            .bind(&names)
            .bind(&addresses)
            .bind(&cities)
            .execute(&mut *tx)
            .await?;
        }

        if !members.is_empty() {
            let mut ids = Vec::with_capacity(members.len());
            let mut first_names = Vec::with_capacity(members.len());
            let mut last_names = Vec::with_capacity(members.len());
            let mut emails = Vec::with_capacity(members.len());
            let mut phones = Vec::with_capacity(members.len());
            let mut external_keys = Vec::with_capacity(members.len());
            let mut states = Vec::with_capacity(members.len());
            let mut unit_ids = Vec::with_capacity(members.len());
            for member in members {
                ids.push(member.id.as_str());
                first_names.push(member.first_name.as_str());
                last_names.push(member.last_name.as_str());
                emails.push(member.email.as_deref());
                phones.push(member.phone.as_deref());
                external_keys.push(member.external_key.as_str());
                states.push(member.state.as_str());
                unit_ids.push(member.unit_id.as_deref());
            }

            sqlx::query(
                r#"
                    INSERT INTO source_members (
                        id, first_name, last_name, email, phone, external_key, state, unit_id
                    )
                    SELECT * FROM UNNEST(
                        $1::text[], $2::text[], $3::text[], $4::text[],
                        $5::text[], $6::text[], $7::text[], $8::text[]
                    )
                    ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(&ids)
            .bind(&first_names)
            .bind(&last_names)
            .bind(&emails)
            .bind(&phones)
            .bind(&external_keys)
            .bind(&states)
            .bind(&unit_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
