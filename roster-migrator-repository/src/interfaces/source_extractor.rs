//! This module defines the `SourceExtractor` trait, the read-only view of the
//! source store the migration pulls from.
use roster_migrator_shared::types::{SourceMemberRecord, SourceUnitRecord};

use crate::errors::SourceRepositoryError;

/// Paged, read-only access to the source store.
///
/// Implementations must return records ordered by id ascending, so that
/// consecutive pages over a quiescent store never repeat or skip a record.
/// They never mutate the store.
#[async_trait::async_trait]
pub trait SourceExtractor: Send + Sync {
    /// Reads at most `size` units starting at position `offset`.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SourceUnitRecord>)` - The page; shorter than `size` only at the end
    /// * `Err(SourceRepositoryError)` - The read failed
    async fn read_units_page(
        &self,
        offset: u64,
        size: u64,
    ) -> Result<Vec<SourceUnitRecord>, SourceRepositoryError>;

    /// Reads at most `size` members starting at position `offset`.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SourceMemberRecord>)` - The page; shorter than `size` only at the end
    /// * `Err(SourceRepositoryError)` - The read failed
    async fn read_members_page(
        &self,
        offset: u64,
        size: u64,
    ) -> Result<Vec<SourceMemberRecord>, SourceRepositoryError>;
}
