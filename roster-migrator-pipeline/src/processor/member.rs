use std::sync::Arc;

use async_trait::async_trait;
use roster_migrator_repository::TargetStore;
use roster_migrator_shared::types::{EntityKind, Member, SkipReason, SourceMemberRecord};
use tracing::{debug, trace, warn};

use crate::errors::LookupError;
use crate::processor::{Reconciler, Reconciliation, diff};

/// Reconciles source members against the target `members` table.
///
/// Checks run cheapest first: the state is validated before the unit
/// linkage is resolved, and the linkage is resolved against the target store
/// (never the source) before the member itself is looked up.
pub struct MemberReconciler {
    target: Arc<dyn TargetStore>,
}

impl MemberReconciler {
    pub fn new(target: Arc<dyn TargetStore>) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Reconciler for MemberReconciler {
    type Source = SourceMemberRecord;
    type Target = Member;

    async fn reconcile(
        &self,
        record: SourceMemberRecord,
    ) -> Result<Reconciliation<Member>, LookupError> {
        let unit_link = record.unit_link().map(str::to_string);
        let (id, external_key) = (record.id.clone(), record.external_key.clone());

        let mapped = match Member::try_from(record) {
            Ok(member) => member,
            Err(error) => {
                warn!(member_id = %id, external_key = %external_key, state = %error.0, "Skipping member with unrecognized state");
                return Ok(Reconciliation::SkipInvalid(
                    SkipReason::UnrecognizedMemberState { value: error.0 },
                ));
            }
        };

        let Some(unit_id) = unit_link else {
            warn!(member_id = %id, external_key = %external_key, "Skipping member without source unit reference");
            return Ok(Reconciliation::SkipInvalid(SkipReason::NoSourceUnitReference));
        };

        let unit = self
            .target
            .find_unit_by_id(&unit_id)
            .await
            .map_err(|source| LookupError {
                kind: EntityKind::Unit,
                id: unit_id.clone(),
                source,
            })?;
        let Some(unit) = unit else {
            warn!(member_id = %id, external_key = %external_key, unit_id = %unit_id, "Skipping member whose unit is missing in target");
            return Ok(Reconciliation::SkipInvalid(SkipReason::TargetUnitMissing { unit_id }));
        };

        let mapped = mapped.with_unit(unit.id);
        let existing = self
            .target
            .find_member_by_id(&mapped.id)
            .await
            .map_err(|source| LookupError {
                kind: EntityKind::Member,
                id: mapped.id.clone(),
                source,
            })?;

        let outcome = diff(existing, mapped);
        match &outcome {
            Reconciliation::Create(member) => {
                debug!(member_id = %member.id, external_key = %member.external_key, "Creating member")
            }
            Reconciliation::Update(member) => {
                debug!(member_id = %member.id, external_key = %member.external_key, "Updating member")
            }
            Reconciliation::SkipIdentical => trace!(member_id = %id, "Member unchanged"),
            Reconciliation::SkipInvalid(_) => {}
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_migrator_repository::InMemoryTargetStore;
    use roster_migrator_shared::types::{MemberState, Unit};

    fn record(id: &str, state: &str, unit_id: Option<&str>) -> SourceMemberRecord {
        SourceMemberRecord {
            id: id.to_string(),
            first_name: "SourceFName".to_string(),
            last_name: "SourceLName".to_string(),
            email: Some(format!("{}@example.com", id)),
            phone: None,
            external_key: format!("DNI-{}", id),
            state: state.to_string(),
            unit_id: unit_id.map(str::to_string),
        }
    }

    async fn store_with_unit(unit_id: &str) -> InMemoryTargetStore {
        let store = InMemoryTargetStore::new();
        store
            .insert_unit(Unit {
                id: unit_id.to_string(),
                name: "Target".to_string(),
                address: None,
                city: None,
            })
            .await;
        store
    }

    #[tokio::test]
    async fn test_member_with_resolved_unit_is_created() {
        let reconciler = MemberReconciler::new(Arc::new(store_with_unit("U1").await));

        let outcome = reconciler
            .reconcile(record("M1", "AUTHORIZED", Some("U1")))
            .await
            .unwrap();

        match outcome {
            Reconciliation::Create(member) => {
                assert_eq!(member.unit_ref.as_deref(), Some("U1"));
                assert_eq!(member.state, MemberState::Authorized);
            }
            other => panic!("expected create, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_orphans_are_rejected() {
        let reconciler = MemberReconciler::new(Arc::new(store_with_unit("U1").await));

        let no_link = reconciler.reconcile(record("M1", "DENIED", None)).await.unwrap();
        let blank_link = reconciler.reconcile(record("M2", "DENIED", Some("  "))).await.unwrap();
        let missing = reconciler.reconcile(record("M3", "DENIED", Some("U9"))).await.unwrap();

        assert_eq!(no_link, Reconciliation::SkipInvalid(SkipReason::NoSourceUnitReference));
        assert_eq!(blank_link, Reconciliation::SkipInvalid(SkipReason::NoSourceUnitReference));
        assert_eq!(
            missing,
            Reconciliation::SkipInvalid(SkipReason::TargetUnitMissing {
                unit_id: "U9".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_padded_unit_link_is_looked_up_verbatim() {
        let reconciler = MemberReconciler::new(Arc::new(store_with_unit("U1").await));

        let outcome = reconciler
            .reconcile(record("M1", "AUTHORIZED", Some(" U1 ")))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Reconciliation::SkipInvalid(SkipReason::TargetUnitMissing {
                unit_id: " U1 ".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_state_is_rejected_before_unit_resolution() {
        let reconciler = MemberReconciler::new(Arc::new(InMemoryTargetStore::new()));

        let outcome = reconciler
            .reconcile(record("M1", "SUSPENDED", Some("U404")))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Reconciliation::SkipInvalid(SkipReason::UnrecognizedMemberState {
                value: "SUSPENDED".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_existing_member_is_diffed_including_unit_link() {
        let store = store_with_unit("U1").await;
        store
            .insert_unit(Unit {
                id: "U2".to_string(),
                name: "Other".to_string(),
                address: None,
                city: None,
            })
            .await;
        let existing = Member::try_from(record("M1", "AUTHORIZED", Some("U1"))).unwrap();
        store.insert_member(existing.clone()).await;
        let reconciler = MemberReconciler::new(Arc::new(store));

        let same = reconciler
            .reconcile(record("M1", "AUTHORIZED", Some("U1")))
            .await
            .unwrap();
        let moved = reconciler
            .reconcile(record("M1", "AUTHORIZED", Some("U2")))
            .await
            .unwrap();

        assert_eq!(same, Reconciliation::SkipIdentical);
        assert_eq!(moved, Reconciliation::Update(existing.with_unit("U2")));
    }
}
