//! This module defines the `TargetStore` and `TargetTransaction` traits.
//!
//! Lookups run directly against the store. Writes only happen through a
//! transaction obtained from [`TargetStore::begin`], whose scope belongs to
//! the caller: nothing is visible to other readers until `commit`.
use roster_migrator_shared::types::{Member, Unit};

use crate::errors::TargetRepositoryError;

/// Read access and transaction factory for the target store.
#[async_trait::async_trait]
pub trait TargetStore: Send + Sync {
    /// Looks up a committed unit by id.
    async fn find_unit_by_id(&self, id: &str) -> Result<Option<Unit>, TargetRepositoryError>;

    /// Looks up a committed member by id.
    async fn find_member_by_id(&self, id: &str) -> Result<Option<Member>, TargetRepositoryError>;

    /// Opens a new write transaction.
    async fn begin(&self) -> Result<Box<dyn TargetTransaction>, TargetRepositoryError>;
}

/// A unit of work against the target store.
///
/// Upserts are keyed by id: an existing row is replaced field by field, a
/// missing one is inserted. Dropping a transaction without committing
/// discards its writes.
#[async_trait::async_trait]
pub trait TargetTransaction: Send {
    async fn upsert_unit(&mut self, unit: &Unit) -> Result<(), TargetRepositoryError>;

    async fn upsert_member(&mut self, member: &Member) -> Result<(), TargetRepositoryError>;

    /// Makes every write of the transaction visible at once.
    async fn commit(self: Box<Self>) -> Result<(), TargetRepositoryError>;

    /// Discards every write of the transaction.
    async fn rollback(self: Box<Self>) -> Result<(), TargetRepositoryError>;
}
