//! A phase drains one entity kind from the source into the target.
//!
//! [`PhaseRunner`] is the only phase implementation; what differs between
//! units and members lives in its [`PageSource`] and [`Reconciler`].
use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, pin_mut};
use roster_migrator_repository::{SourceExtractor, TargetStore};
use roster_migrator_shared::types::{EntityCounts, EntityKind, RunId};
use tracing::{debug, info, instrument};

use crate::errors::MigrationError;
use crate::extractor::{MemberPages, PageSource, UnitPages, extract_pages};
use crate::orchestrator::MigrationConfig;
use crate::processor::{MemberReconciler, Reconciler, Reconciliation, UnitReconciler};
use crate::writer::{ChunkWriter, Upsert};

/// One step of a run.
#[async_trait]
pub trait MigrationPhase: Send + Sync {
    fn kind(&self) -> EntityKind;

    /// Runs the phase to completion.
    ///
    /// `counts` is only updated once a chunk is committed, so after a failure
    /// it describes exactly what reached the target store.
    async fn run(&self, run_id: RunId, counts: &mut EntityCounts) -> Result<(), MigrationError>;
}

/// Records of a chunk that has been reconciled but not yet committed.
struct PendingChunk<T> {
    records: Vec<T>,
    read: usize,
    counts: EntityCounts,
}

impl<T> PendingChunk<T> {
    fn new(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            read: 0,
            counts: EntityCounts::default(),
        }
    }

    fn push(&mut self, outcome: Reconciliation<T>) {
        self.read += 1;
        self.counts.record(outcome.action());
        if let Some(record) = outcome.into_payload() {
            self.records.push(record);
        }
    }
}

/// Generic phase: extract pages, reconcile each record, write in chunks.
///
/// A chunk holds `chunk_size` source records, skipped ones included; only the
/// accepted ones are written.
pub struct PhaseRunner<S, R> {
    source: S,
    reconciler: R,
    writer: ChunkWriter,
    chunk_size: usize,
    page_size: u64,
}

impl<S, R> PhaseRunner<S, R>
where
    S: PageSource + 'static,
    R: Reconciler<Source = S::Record> + 'static,
    R::Target: Upsert,
{
    pub fn new(source: S, reconciler: R, writer: ChunkWriter, config: &MigrationConfig) -> Self {
        Self {
            source,
            reconciler,
            writer,
            chunk_size: config.chunk_size.max(1),
            page_size: config.page_size.max(1),
        }
    }

    async fn flush(
        &self,
        run_id: RunId,
        index: usize,
        pending: &mut PendingChunk<R::Target>,
        counts: &mut EntityCounts,
    ) -> Result<(), MigrationError> {
        let chunk = std::mem::replace(pending, PendingChunk::new(self.chunk_size));
        let written = self.writer.write_chunk(index, &chunk.records).await?;
        counts.merge(&chunk.counts);
        debug!(
            run_id = %run_id,
            entity = %self.source.kind(),
            chunk = index,
            read = chunk.read,
            written,
            "Chunk complete"
        );
        Ok(())
    }
}

#[async_trait]
impl<S, R> MigrationPhase for PhaseRunner<S, R>
where
    S: PageSource + 'static,
    R: Reconciler<Source = S::Record> + 'static,
    R::Target: Upsert,
{
    fn kind(&self) -> EntityKind {
        self.source.kind()
    }

    #[instrument(skip_all, fields(entity = %self.source.kind()))]
    async fn run(&self, run_id: RunId, counts: &mut EntityCounts) -> Result<(), MigrationError> {
        let kind = self.source.kind();
        info!(run_id = %run_id, entity = %kind, "Phase started");

        let pages = extract_pages(&self.source, self.page_size, 0);
        pin_mut!(pages);

        let mut pending = PendingChunk::new(self.chunk_size);
        let mut index = 0;
        while let Some(page) = pages.next().await {
            for record in page? {
                let outcome = self.reconciler.reconcile(record).await?;
                pending.push(outcome);
                if pending.read == self.chunk_size {
                    self.flush(run_id, index, &mut pending, counts).await?;
                    index += 1;
                }
            }
        }
        if pending.read > 0 {
            self.flush(run_id, index, &mut pending, counts).await?;
        }

        info!(
            run_id = %run_id,
            entity = %kind,
            created = counts.created,
            updated = counts.updated,
            skipped_identical = counts.skipped_identical,
            skipped_invalid = counts.skipped_invalid,
            total = counts.total(),
            "Phase complete"
        );
        Ok(())
    }
}

/// Units first, then members: the order the referential constraint needs.
pub fn standard_phases(
    source: Arc<dyn SourceExtractor>,
    target: Arc<dyn TargetStore>,
    config: &MigrationConfig,
) -> Vec<Box<dyn MigrationPhase>> {
    vec![
        Box::new(PhaseRunner::new(
            UnitPages::new(source.clone()),
            UnitReconciler::new(target.clone()),
            ChunkWriter::new(target.clone()),
            config,
        )),
        Box::new(PhaseRunner::new(
            MemberPages::new(source),
            MemberReconciler::new(target.clone()),
            ChunkWriter::new(target),
            config,
        )),
    ]
}
