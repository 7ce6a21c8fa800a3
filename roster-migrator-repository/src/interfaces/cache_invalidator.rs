//! This module defines the `CacheInvalidator` trait and the fixed set of read
//! caches the migration knows about.
use std::fmt;

use crate::errors::CacheError;

/// Read caches populated by the query side from the target store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheName {
    /// Members keyed by id.
    MembersById,
    /// Members keyed by their external key.
    MembersByExternalKey,
    /// Units keyed by id.
    UnitsById,
}

impl CacheName {
    /// Every cache a successful run invalidates, in invalidation order.
    pub const ALL: [CacheName; 3] = [
        CacheName::MembersByExternalKey,
        CacheName::MembersById,
        CacheName::UnitsById,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheName::MembersById => "membersById",
            CacheName::MembersByExternalKey => "membersByExternalKey",
            CacheName::UnitsById => "unitsById",
        }
    }
}

impl fmt::Display for CacheName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evicts entries from downstream read caches. Invalidation always covers
/// the whole key set of a cache.
#[async_trait::async_trait]
pub trait CacheInvalidator: Send + Sync {
    /// Evicts every entry of `cache`. Clearing an empty cache is a no-op.
    async fn invalidate_all(&self, cache: CacheName) -> Result<(), CacheError>;
}
