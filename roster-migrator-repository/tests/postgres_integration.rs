//! Integration tests for the PostgreSQL collaborators.
//!
//! These tests require a real PostgreSQL database (`DATABASE_URL`) and use
//! SQLx test macros for isolation and cleanup. They are ignored by default.
//!
//! Run with: `cargo test --test postgres_integration -- --ignored`

use roster_migrator_repository::{
    PostgresRunRegistry, PostgresSourceExtractor, PostgresSourceSeeder, PostgresTargetStore,
    RestartPolicy, RunConflictError, RunRegistry, RunRegistryError, SourceExtractor,
    TargetRepositoryError, TargetStore, TargetTransaction,
};
use roster_migrator_shared::types::{
    Member, MemberState, RunId, RunStatus, SourceMemberRecord, SourceUnitRecord, Unit,
};

fn make_unit(id: &str, name: &str) -> Unit {
    Unit {
        id: id.to_string(),
        name: name.to_string(),
        address: Some("1 Main St.".to_string()),
        city: None,
    }
}

fn make_member(id: &str, external_key: &str, unit_ref: Option<&str>) -> Member {
    Member {
        id: id.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: Some(format!("{}@example.com", id.to_lowercase())),
        phone: None,
        external_key: external_key.to_string(),
        state: MemberState::Authorized,
        unit_ref: unit_ref.map(str::to_string),
    }
}

fn make_source_unit(id: &str) -> SourceUnitRecord {
    SourceUnitRecord {
        id: id.to_string(),
        name: format!("Unit {}", id),
        address: None,
        city: Some("City 1".to_string()),
    }
}

fn make_source_member(id: &str, unit_id: Option<&str>) -> SourceMemberRecord {
    SourceMemberRecord {
        id: id.to_string(),
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: None,
        phone: Some("555000001".to_string()),
        external_key: format!("K-{}", id),
        state: "DENIED".to_string(),
        unit_id: unit_id.map(str::to_string),
    }
}

// ============================================================================
// Target store
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations/target")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_upsert_is_invisible_until_commit(pool: sqlx::PgPool) {
    let store = PostgresTargetStore::new(pool.clone());

    let mut tx = store.begin().await.unwrap();
    tx.upsert_unit(&make_unit("U1", "North")).await.unwrap();
    assert!(store.find_unit_by_id("U1").await.unwrap().is_none());
    tx.commit().await.unwrap();

    assert_eq!(
        store.find_unit_by_id("U1").await.unwrap(),
        Some(make_unit("U1", "North"))
    );
}

#[sqlx::test(migrations = "src/postgres/migrations/target")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_upsert_replaces_existing_row(pool: sqlx::PgPool) {
    let store = PostgresTargetStore::new(pool.clone());

    let mut tx = store.begin().await.unwrap();
    tx.upsert_unit(&make_unit("U1", "North")).await.unwrap();
    tx.upsert_member(&make_member("M1", "K1", Some("U1"))).await.unwrap();
    tx.commit().await.unwrap();

    let mut changed = make_member("M1", "K2", Some("U1"));
    changed.state = MemberState::Denied;
    let mut tx = store.begin().await.unwrap();
    tx.upsert_member(&changed).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(store.find_member_by_id("M1").await.unwrap(), Some(changed));
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "src/postgres/migrations/target")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_missing_unit_is_a_constraint_violation(pool: sqlx::PgPool) {
    let store = PostgresTargetStore::new(pool.clone());

    let mut tx = store.begin().await.unwrap();
    let result = tx.upsert_member(&make_member("M1", "K1", Some("U404"))).await;

    assert!(matches!(
        result,
        Err(TargetRepositoryError::ConstraintViolation(_))
    ));
}

#[sqlx::test(migrations = "src/postgres/migrations/target")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_rollback_discards_writes(pool: sqlx::PgPool) {
    let store = PostgresTargetStore::new(pool.clone());

    let mut tx = store.begin().await.unwrap();
    tx.upsert_unit(&make_unit("U1", "North")).await.unwrap();
    tx.rollback().await.unwrap();

    assert!(store.find_unit_by_id("U1").await.unwrap().is_none());
}

// ============================================================================
// Run registry
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations/target")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_run_lifecycle(pool: sqlx::PgPool) {
    let registry = PostgresRunRegistry::new(pool.clone());
    let run_id = RunId(1_700_000_000_000);

    assert_eq!(registry.status(run_id).await.unwrap(), RunStatus::NotStarted);

    registry.begin(run_id, RestartPolicy::default()).await.unwrap();
    assert_eq!(registry.status(run_id).await.unwrap(), RunStatus::Running);

    let second = registry.begin(run_id, RestartPolicy::default()).await;
    assert!(matches!(
        second,
        Err(RunRegistryError::Conflict(RunConflictError::AlreadyRunning(_)))
    ));

    registry.finish(run_id, RunStatus::Failed).await.unwrap();
    registry.begin(run_id, RestartPolicy::AllowAfterFailure).await.unwrap();
    registry.finish(run_id, RunStatus::Completed).await.unwrap();

    let again = registry.begin(run_id, RestartPolicy::default()).await;
    assert!(matches!(
        again,
        Err(RunRegistryError::Conflict(RunConflictError::AlreadyComplete(_)))
    ));

    let attempts: i32 = sqlx::query_scalar("SELECT attempts FROM migration_runs WHERE run_id = $1")
        .bind(run_id.value())
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(attempts, 2);
}

// ============================================================================
// Source extractor and seeder
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations/source")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_seeded_rows_are_paged_in_id_order(pool: sqlx::PgPool) {
    let seeder = PostgresSourceSeeder::new(pool.clone());
    let units = vec![
        make_source_unit("SB003"),
        make_source_unit("SB001"),
        make_source_unit("SB002"),
    ];
    let members = vec![make_source_member("SU0001", Some("SB001")), make_source_member("SU0002", None)];
    seeder.seed(&units, &members).await.unwrap();
    assert_eq!(seeder.count_units().await.unwrap(), 3);

    let extractor = PostgresSourceExtractor::new(pool.clone());
    let first = extractor.read_units_page(0, 2).await.unwrap();
    let second = extractor.read_units_page(2, 2).await.unwrap();

    let ids: Vec<&str> = first.iter().chain(second.iter()).map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["SB001", "SB002", "SB003"]);

    let members = extractor.read_members_page(0, 10).await.unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].state, "DENIED");
    assert_eq!(members[1].unit_id, None);
}
