//! Demo data for an empty source store.
//!
//! Units are `SB001`..`SB100`, members `SU0001`..`SU0100` linked to the
//! units round-robin. Every fifth member is `DENIED`.
use roster_migrator_repository::PostgresSourceSeeder;
use roster_migrator_shared::types::{MemberState, SourceMemberRecord, SourceUnitRecord};
use tracing::info;

use crate::MigratorError;

pub const SEED_UNIT_COUNT: usize = 100;
pub const SEED_MEMBER_COUNT: usize = 100;

pub fn demo_units(count: usize) -> Vec<SourceUnitRecord> {
    (1..=count)
        .map(|i| SourceUnitRecord {
            id: format!("SB{:03}", i),
            name: format!("Source Branch {}", i),
            address: Some(format!("{} Source St.", i)),
            city: Some(format!("City {}", i % 10)),
        })
        .collect()
}

pub fn demo_members(count: usize, units: &[SourceUnitRecord]) -> Vec<SourceMemberRecord> {
    (1..=count)
        .map(|i| {
            let state = if i % 5 == 0 {
                MemberState::Denied
            } else {
                MemberState::Authorized
            };
            SourceMemberRecord {
                id: format!("SU{:04}", i),
                first_name: format!("SourceFName {}", i),
                last_name: format!("SourceLName {}", i),
                email: Some(format!("su.{}@example.com", i)),
                phone: Some(format!("{}", 555_000_000 + i)),
                external_key: format!("{}", 20_000_000 + i),
                state: state.as_str().to_string(),
                unit_id: units
                    .get((i - 1) % units.len().max(1))
                    .map(|unit| unit.id.clone()),
            }
        })
        .collect()
}

/// Seeds the source store unless it already holds units.
///
/// # Returns
///
/// * `Ok(true)` - Demo data was inserted
/// * `Ok(false)` - The store was not empty and was left alone
pub async fn seed_source(seeder: &PostgresSourceSeeder) -> Result<bool, MigratorError> {
    let existing = seeder.count_units().await?;
    if existing > 0 {
        info!(existing, "Source store already populated, skipping seed");
        return Ok(false);
    }

    let units = demo_units(SEED_UNIT_COUNT);
    let members = demo_members(SEED_MEMBER_COUNT, &units);
    seeder.seed(&units, &members).await?;
    info!(units = units.len(), members = members.len(), "Seeded source store");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_units() {
        let units = demo_units(SEED_UNIT_COUNT);

        assert_eq!(units.len(), 100);
        assert_eq!(units[0].id, "SB001");
        assert_eq!(units[99].id, "SB100");
        assert_eq!(units[99].city.as_deref(), Some("City 0"));
    }

    #[test]
    fn test_demo_members_round_robin() {
        let units = demo_units(3);
        let members = demo_members(7, &units);

        let links: Vec<&str> = members
            .iter()
            .map(|m| m.unit_id.as_deref().unwrap())
            .collect();
        assert_eq!(links, vec!["SB001", "SB002", "SB003", "SB001", "SB002", "SB003", "SB001"]);
        assert_eq!(members[0].external_key, "20000001");
        assert_eq!(members[0].phone.as_deref(), Some("555000001"));
        assert_eq!(members[0].email.as_deref(), Some("su.1@example.com"));
    }

    #[test]
    fn test_every_fifth_member_is_denied() {
        let members = demo_members(SEED_MEMBER_COUNT, &demo_units(SEED_UNIT_COUNT));

        let denied = members.iter().filter(|m| m.state == "DENIED").count();
        assert_eq!(denied, 20);
        assert_eq!(members[4].state, "DENIED");
        assert_eq!(members[0].state, "AUTHORIZED");
    }

    #[test]
    fn test_members_without_units_are_unlinked() {
        let members = demo_members(2, &[]);
        assert!(members.iter().all(|m| m.unit_id.is_none()));
    }
}
