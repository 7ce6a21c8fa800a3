use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use roster_migrator_shared::types::{SourceMemberRecord, SourceUnitRecord};
use tokio::sync::RwLock;

use crate::{SourceExtractor, SourceRepositoryError};

#[derive(Debug, Default)]
struct SourceState {
    units: BTreeMap<String, SourceUnitRecord>,
    members: BTreeMap<String, SourceMemberRecord>,
}

/// Source store held in memory, keyed (and therefore ordered) by id.
///
/// Clones share the same data, so a test can keep a handle and edit the
/// source between runs.
#[derive(Debug, Clone, Default)]
pub struct InMemorySourceExtractor {
    state: Arc<RwLock<SourceState>>,
}

impl InMemorySourceExtractor {
    pub fn new(units: Vec<SourceUnitRecord>, members: Vec<SourceMemberRecord>) -> Self {
        let state = SourceState {
            units: units.into_iter().map(|u| (u.id.clone(), u)).collect(),
            members: members.into_iter().map(|m| (m.id.clone(), m)).collect(),
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Inserts or replaces a member record.
    pub async fn put_member(&self, record: SourceMemberRecord) {
        self.state.write().await.members.insert(record.id.clone(), record);
    }
}

fn page<T: Clone>(records: &BTreeMap<String, T>, offset: u64, size: u64) -> Vec<T> {
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    let size = usize::try_from(size).unwrap_or(usize::MAX);
    records.values().skip(offset).take(size).cloned().collect()
}

#[async_trait]
impl SourceExtractor for InMemorySourceExtractor {
    async fn read_units_page(
        &self,
        offset: u64,
        size: u64,
    ) -> Result<Vec<SourceUnitRecord>, SourceRepositoryError> {
        Ok(page(&self.state.read().await.units, offset, size))
    }

    async fn read_members_page(
        &self,
        offset: u64,
        size: u64,
    ) -> Result<Vec<SourceMemberRecord>, SourceRepositoryError> {
        Ok(page(&self.state.read().await.members, offset, size))
    }
}
