use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use roster_migrator_shared::types::{Member, Unit};
use tokio::sync::RwLock;

use crate::{TargetRepositoryError, TargetStore, TargetTransaction};

#[derive(Debug, Default)]
struct TargetState {
    units: BTreeMap<String, Unit>,
    members: BTreeMap<String, Member>,
    committed_writes: u64,
}

/// Target store held in memory.
///
/// Mirrors the PostgreSQL schema's guarantees: members must reference an
/// existing unit, external keys and emails are unique, and staged writes only
/// become visible on commit. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTargetStore {
    state: Arc<RwLock<TargetState>>,
}

impl InMemoryTargetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a unit directly, bypassing transactions. Used to seed fixtures.
    pub async fn insert_unit(&self, unit: Unit) {
        self.state.write().await.units.insert(unit.id.clone(), unit);
    }

    /// Writes a member directly, bypassing transactions and constraints.
    pub async fn insert_member(&self, member: Member) {
        self.state.write().await.members.insert(member.id.clone(), member);
    }

    /// Committed units, ordered by id.
    pub async fn units(&self) -> Vec<Unit> {
        self.state.read().await.units.values().cloned().collect()
    }

    /// Committed members, ordered by id.
    pub async fn members(&self) -> Vec<Member> {
        self.state.read().await.members.values().cloned().collect()
    }

    /// Number of upserts applied by committed transactions so far.
    pub async fn committed_writes(&self) -> u64 {
        self.state.read().await.committed_writes
    }
}

#[async_trait]
impl TargetStore for InMemoryTargetStore {
    async fn find_unit_by_id(&self, id: &str) -> Result<Option<Unit>, TargetRepositoryError> {
        Ok(self.state.read().await.units.get(id).cloned())
    }

    async fn find_member_by_id(&self, id: &str) -> Result<Option<Member>, TargetRepositoryError> {
        Ok(self.state.read().await.members.get(id).cloned())
    }

    async fn begin(&self) -> Result<Box<dyn TargetTransaction>, TargetRepositoryError> {
        Ok(Box::new(InMemoryTargetTransaction {
            state: Arc::clone(&self.state),
            staged: Vec::new(),
        }))
    }
}

#[derive(Debug)]
enum StagedWrite {
    Unit(Unit),
    Member(Member),
}

/// Writes staged against an [`InMemoryTargetStore`], applied on commit.
#[derive(Debug)]
pub struct InMemoryTargetTransaction {
    state: Arc<RwLock<TargetState>>,
    staged: Vec<StagedWrite>,
}

impl InMemoryTargetTransaction {
    fn staged_units(&self) -> impl Iterator<Item = &Unit> {
        self.staged.iter().filter_map(|write| match write {
            StagedWrite::Unit(unit) => Some(unit),
            StagedWrite::Member(_) => None,
        })
    }

    fn staged_members(&self) -> impl Iterator<Item = &Member> {
        self.staged.iter().filter_map(|write| match write {
            StagedWrite::Member(member) => Some(member),
            StagedWrite::Unit(_) => None,
        })
    }

    fn check_member(&self, state: &TargetState, member: &Member) -> Result<(), TargetRepositoryError> {
        if let Some(unit_id) = &member.unit_ref {
            let unit_exists = state.units.contains_key(unit_id)
                || self.staged_units().any(|unit| &unit.id == unit_id);
            if !unit_exists {
                return Err(TargetRepositoryError::ConstraintViolation(format!(
                    "member {} references missing unit {}",
                    member.id, unit_id
                )));
            }
        }

        if self.clashes(state, member, |other| other.external_key == member.external_key) {
            return Err(TargetRepositoryError::ConstraintViolation(format!(
                "duplicate external key {} for member {}",
                member.external_key, member.id
            )));
        }
        if let Some(email) = &member.email {
            if self.clashes(state, member, |other| other.email.as_ref() == Some(email)) {
                return Err(TargetRepositoryError::ConstraintViolation(format!(
                    "duplicate email {} for member {}",
                    email, member.id
                )));
            }
        }
        Ok(())
    }

    /// Whether another member, committed or staged, matches `same_value`.
    fn clashes(
        &self,
        state: &TargetState,
        member: &Member,
        same_value: impl Fn(&Member) -> bool,
    ) -> bool {
        // Staged rows shadow committed rows with the same id.
        let staged_ids: HashSet<&str> = self.staged_members().map(|m| m.id.as_str()).collect();
        let committed = state.members.values().any(|other| {
            other.id != member.id && !staged_ids.contains(other.id.as_str()) && same_value(other)
        });
        committed
            || self
                .staged_members()
                .any(|other| other.id != member.id && same_value(other))
    }
}

#[async_trait]
impl TargetTransaction for InMemoryTargetTransaction {
    async fn upsert_unit(&mut self, unit: &Unit) -> Result<(), TargetRepositoryError> {
        self.staged.push(StagedWrite::Unit(unit.clone()));
        Ok(())
    }

    async fn upsert_member(&mut self, member: &Member) -> Result<(), TargetRepositoryError> {
        let state = Arc::clone(&self.state);
        let guard = state.read().await;
        self.check_member(&guard, member)?;
        drop(guard);
        self.staged.push(StagedWrite::Member(member.clone()));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), TargetRepositoryError> {
        let mut state = self.state.write().await;
        for write in self.staged {
            match write {
                StagedWrite::Unit(unit) => {
                    state.units.insert(unit.id.clone(), unit);
                }
                StagedWrite::Member(member) => {
                    state.members.insert(member.id.clone(), member);
                }
            }
            state.committed_writes += 1;
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), TargetRepositoryError> {
        Ok(())
    }
}
