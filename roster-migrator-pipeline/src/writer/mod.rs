//! This module defines the `ChunkWriter`, which applies one chunk of accepted
//! records to the target store inside a single transaction.
//!
//! A chunk is all-or-nothing: the first failed upsert rolls the whole chunk
//! back and the error propagates. Nothing is retried.
use std::sync::Arc;

use async_trait::async_trait;
use roster_migrator_repository::{TargetRepositoryError, TargetStore, TargetTransaction};
use roster_migrator_shared::types::{EntityKind, Member, Unit};
use tracing::{debug, warn};

use crate::errors::WriteError;

/// A record that knows how to upsert itself into a target transaction.
#[async_trait]
pub trait Upsert: Send + Sync {
    const KIND: EntityKind;

    async fn upsert_into(&self, tx: &mut dyn TargetTransaction) -> Result<(), TargetRepositoryError>;
}

#[async_trait]
impl Upsert for Unit {
    const KIND: EntityKind = EntityKind::Unit;

    async fn upsert_into(&self, tx: &mut dyn TargetTransaction) -> Result<(), TargetRepositoryError> {
        tx.upsert_unit(self).await
    }
}

#[async_trait]
impl Upsert for Member {
    const KIND: EntityKind = EntityKind::Member;

    async fn upsert_into(&self, tx: &mut dyn TargetTransaction) -> Result<(), TargetRepositoryError> {
        tx.upsert_member(self).await
    }
}

/// `ChunkWriter` persists chunks of reconciled records.
pub struct ChunkWriter {
    target: Arc<dyn TargetStore>,
}

impl ChunkWriter {
    /// Creates a new `ChunkWriter` instance.
    ///
    /// # Arguments
    ///
    /// * `target` - The target store transactions are opened against
    pub fn new(target: Arc<dyn TargetStore>) -> Self {
        Self { target }
    }

    /// Writes `records` as upserts keyed by id in one transaction.
    ///
    /// An empty chunk opens no transaction.
    ///
    /// # Arguments
    ///
    /// * `chunk` - Index of the chunk within its phase, for diagnostics
    /// * `records` - The accepted records of the chunk
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of records committed
    /// * `Err(WriteError)` - The chunk was rolled back
    pub async fn write_chunk<T: Upsert>(&self, chunk: usize, records: &[T]) -> Result<usize, WriteError> {
        if records.is_empty() {
            return Ok(0);
        }
        let to_write_error = |source| WriteError {
            kind: T::KIND,
            chunk,
            records: records.len(),
            source,
        };

        let mut tx = self.target.begin().await.map_err(to_write_error)?;
        for record in records {
            if let Err(error) = record.upsert_into(tx.as_mut()).await {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(entity = %T::KIND, chunk, error = %rollback_error, "Rollback failed");
                }
                return Err(to_write_error(error));
            }
        }
        tx.commit().await.map_err(to_write_error)?;

        debug!(entity = %T::KIND, chunk, count = records.len(), "Committed chunk");
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_migrator_repository::InMemoryTargetStore;
    use roster_migrator_shared::types::MemberState;

    fn unit(id: &str) -> Unit {
        Unit {
            id: id.to_string(),
            name: format!("Unit {}", id),
            address: None,
            city: None,
        }
    }

    fn member(id: &str, unit_ref: &str) -> Member {
        Member {
            id: id.to_string(),
            first_name: "F".to_string(),
            last_name: "L".to_string(),
            email: None,
            phone: None,
            external_key: format!("K-{}", id),
            state: MemberState::Authorized,
            unit_ref: Some(unit_ref.to_string()),
        }
    }

    #[tokio::test]
    async fn test_empty_chunk_opens_no_transaction() {
        let store = InMemoryTargetStore::new();
        let writer = ChunkWriter::new(Arc::new(store.clone()));

        assert_eq!(writer.write_chunk::<Unit>(0, &[]).await.unwrap(), 0);
        assert_eq!(store.committed_writes().await, 0);
    }

    #[tokio::test]
    async fn test_chunk_is_committed_atomically() {
        let store = InMemoryTargetStore::new();
        let writer = ChunkWriter::new(Arc::new(store.clone()));

        let written = writer.write_chunk(0, &[unit("U1"), unit("U2")]).await.unwrap();

        assert_eq!(written, 2);
        assert_eq!(store.units().await.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_upsert_rolls_back_the_whole_chunk() {
        let store = InMemoryTargetStore::new();
        store.insert_unit(unit("U1")).await;
        let writer = ChunkWriter::new(Arc::new(store.clone()));

        let result = writer
            .write_chunk(3, &[member("M1", "U1"), member("M2", "U404")])
            .await;

        let error = result.unwrap_err();
        assert_eq!(error.kind, EntityKind::Member);
        assert_eq!(error.chunk, 3);
        assert_eq!(error.records, 2);
        assert!(matches!(error.source, TargetRepositoryError::ConstraintViolation(_)));
        assert!(store.members().await.is_empty());
    }
}
