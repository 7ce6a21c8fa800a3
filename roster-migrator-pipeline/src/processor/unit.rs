use std::sync::Arc;

use async_trait::async_trait;
use roster_migrator_repository::TargetStore;
use roster_migrator_shared::types::{EntityKind, SourceUnitRecord, Unit};
use tracing::{debug, trace};

use crate::errors::LookupError;
use crate::processor::{Reconciler, Reconciliation, diff};

/// Reconciles source units against the target `units` table.
pub struct UnitReconciler {
    target: Arc<dyn TargetStore>,
}

impl UnitReconciler {
    pub fn new(target: Arc<dyn TargetStore>) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Reconciler for UnitReconciler {
    type Source = SourceUnitRecord;
    type Target = Unit;

    async fn reconcile(&self, record: SourceUnitRecord) -> Result<Reconciliation<Unit>, LookupError> {
        let mapped = Unit::from(record);
        let existing = self
            .target
            .find_unit_by_id(&mapped.id)
            .await
            .map_err(|source| LookupError {
                kind: EntityKind::Unit,
                id: mapped.id.clone(),
                source,
            })?;

        let outcome = diff(existing, mapped);
        match &outcome {
            Reconciliation::Create(unit) => debug!(unit_id = %unit.id, "Creating unit"),
            Reconciliation::Update(unit) => debug!(unit_id = %unit.id, "Updating unit"),
            Reconciliation::SkipIdentical => trace!("Unit unchanged"),
            Reconciliation::SkipInvalid(_) => {}
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_migrator_repository::InMemoryTargetStore;

    fn record(id: &str, name: &str) -> SourceUnitRecord {
        SourceUnitRecord {
            id: id.to_string(),
            name: name.to_string(),
            address: Some("1 Source St.".to_string()),
            city: Some("City 1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_unit_actions_follow_target_state() {
        let store = InMemoryTargetStore::new();
        store.insert_unit(Unit::from(record("U1", "A"))).await;
        store.insert_unit(Unit::from(record("U2", "A"))).await;
        let reconciler = UnitReconciler::new(Arc::new(store));

        let changed = reconciler.reconcile(record("U1", "B")).await.unwrap();
        let same = reconciler.reconcile(record("U2", "A")).await.unwrap();
        let fresh = reconciler.reconcile(record("U3", "C")).await.unwrap();

        assert_eq!(
            changed,
            Reconciliation::Update(Unit::from(record("U1", "B")))
        );
        assert_eq!(same, Reconciliation::SkipIdentical);
        assert_eq!(fresh, Reconciliation::Create(Unit::from(record("U3", "C"))));
    }
}
