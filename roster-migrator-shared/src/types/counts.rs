use serde::{Deserialize, Serialize};

use crate::types::{Action, EntityKind};

/// Tally of reconciliation outcomes for one entity kind.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityCounts {
    pub created: u64,
    pub updated: u64,
    pub skipped_identical: u64,
    pub skipped_invalid: u64,
}

impl EntityCounts {
    pub fn record(&mut self, action: Action) {
        match action {
            Action::Create => self.created += 1,
            Action::Update => self.updated += 1,
            Action::SkipIdentical => self.skipped_identical += 1,
            Action::SkipInvalid => self.skipped_invalid += 1,
        }
    }

    pub fn merge(&mut self, other: &EntityCounts) {
        self.created += other.created;
        self.updated += other.updated;
        self.skipped_identical += other.skipped_identical;
        self.skipped_invalid += other.skipped_invalid;
    }

    /// Both kinds of skip together.
    pub fn skipped(&self) -> u64 {
        self.skipped_identical + self.skipped_invalid
    }

    pub fn total(&self) -> u64 {
        self.created + self.updated + self.skipped()
    }
}

/// Counters for both phases of a run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseCounts {
    pub units: EntityCounts,
    pub members: EntityCounts,
}

impl PhaseCounts {
    pub fn for_kind_mut(&mut self, kind: EntityKind) -> &mut EntityCounts {
        match kind {
            EntityKind::Unit => &mut self.units,
            EntityKind::Member => &mut self.members,
        }
    }

    pub fn units_created(&self) -> u64 {
        self.units.created
    }

    pub fn units_updated(&self) -> u64 {
        self.units.updated
    }

    pub fn units_skipped(&self) -> u64 {
        self.units.skipped()
    }

    pub fn members_created(&self) -> u64 {
        self.members.created
    }

    pub fn members_updated(&self) -> u64 {
        self.members.updated
    }

    pub fn members_skipped(&self) -> u64 {
        self.members.skipped()
    }
}
