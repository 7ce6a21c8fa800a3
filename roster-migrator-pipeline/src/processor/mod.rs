//! This module defines the reconciliation step: each source record is mapped
//! to its canonical shape and diffed against the target store.
//!
//! Reconcilers only read the target store. The outcome is a tagged
//! [`Reconciliation`], so a rejected record is a value rather than an error.
mod member;
mod unit;

pub use member::MemberReconciler;
pub use unit::UnitReconciler;

use async_trait::async_trait;
use roster_migrator_shared::types::{Action, SkipReason};

use crate::errors::LookupError;

/// Outcome of reconciling one source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation<T> {
    /// No target record with this id exists.
    Create(T),
    /// A target record exists and differs.
    Update(T),
    /// A target record exists and is structurally equal.
    SkipIdentical,
    /// The record cannot be written in this run.
    SkipInvalid(SkipReason),
}

impl<T> Reconciliation<T> {
    pub fn action(&self) -> Action {
        match self {
            Reconciliation::Create(_) => Action::Create,
            Reconciliation::Update(_) => Action::Update,
            Reconciliation::SkipIdentical => Action::SkipIdentical,
            Reconciliation::SkipInvalid(_) => Action::SkipInvalid,
        }
    }

    /// The record to hand to the writer, if any.
    pub fn into_payload(self) -> Option<T> {
        match self {
            Reconciliation::Create(record) | Reconciliation::Update(record) => Some(record),
            Reconciliation::SkipIdentical | Reconciliation::SkipInvalid(_) => None,
        }
    }
}

/// Diffs a mapped record against the current target record.
pub(crate) fn diff<T: PartialEq>(existing: Option<T>, mapped: T) -> Reconciliation<T> {
    match existing {
        None => Reconciliation::Create(mapped),
        Some(current) if current == mapped => Reconciliation::SkipIdentical,
        Some(_) => Reconciliation::Update(mapped),
    }
}

/// Entity-specific reconciliation strategy.
#[async_trait]
pub trait Reconciler: Send + Sync {
    /// Raw record read from the source store.
    type Source: Send + 'static;
    /// Canonical record written to the target store.
    type Target: Send + Sync + 'static;

    /// Decides what to do with one source record.
    ///
    /// # Returns
    ///
    /// * `Ok(Reconciliation)` - The decision, including rejections
    /// * `Err(LookupError)` - The target store could not be read
    async fn reconcile(
        &self,
        record: Self::Source,
    ) -> Result<Reconciliation<Self::Target>, LookupError>;
}
