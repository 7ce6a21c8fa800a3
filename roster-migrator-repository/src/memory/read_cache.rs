use std::collections::HashMap;

use async_trait::async_trait;
use roster_migrator_shared::types::{Member, Unit};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{CacheError, CacheInvalidator, CacheName};

/// A cached read-side value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedEntity {
    Unit(Unit),
    Member(Member),
}

/// Process-local read caches, one map per [`CacheName`].
#[derive(Debug, Default)]
pub struct InMemoryReadCache {
    caches: RwLock<HashMap<CacheName, HashMap<String, CachedEntity>>>,
}

impl InMemoryReadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, cache: CacheName, key: impl Into<String>, entity: CachedEntity) {
        self.caches
            .write()
            .await
            .entry(cache)
            .or_default()
            .insert(key.into(), entity);
    }

    pub async fn get(&self, cache: CacheName, key: &str) -> Option<CachedEntity> {
        self.caches
            .read()
            .await
            .get(&cache)
            .and_then(|entries| entries.get(key).cloned())
    }
}

#[async_trait]
impl CacheInvalidator for InMemoryReadCache {
    async fn invalidate_all(&self, cache: CacheName) -> Result<(), CacheError> {
        let evicted = self
            .caches
            .write()
            .await
            .remove(&cache)
            .map_or(0, |entries| entries.len());
        debug!(cache = %cache, evicted, "Cleared cache");
        Ok(())
    }
}
