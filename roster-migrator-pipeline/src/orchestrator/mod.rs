//! This module defines the `Orchestrator` responsible for running a migration
//! end to end.
//!
//! It admits the run through the [`RunRegistry`], drives the phases strictly
//! in order, records the terminal state and hands the result to the
//! [`CompletionNotifier`]. The orchestrator holds no per-run state, so it can
//! be shared as `Arc<Orchestrator>` between tasks.
mod config;
mod phase;
mod run_id;

pub use config::{DEFAULT_CHUNK_SIZE, MigrationConfig, parse_restart_policy};
pub use phase::{MigrationPhase, PhaseRunner, standard_phases};
pub use run_id::RunIdGenerator;

use std::sync::Arc;

use roster_migrator_repository::{RestartPolicy, RunRegistry, SourceExtractor, TargetStore};
use roster_migrator_shared::types::{ErrorChain, MigrationResult, PhaseCounts, RunId, RunStatus};
use tracing::{error, info, instrument, warn};

use crate::errors::{MigrationError, OrchestratorError};
use crate::notifier::CompletionNotifier;

/// `Orchestrator` coordinates the phases of a migration run.
pub struct Orchestrator {
    phases: Vec<Box<dyn MigrationPhase>>,
    registry: Arc<dyn RunRegistry>,
    notifier: CompletionNotifier,
    restart_policy: RestartPolicy,
    run_ids: RunIdGenerator,
}

impl Orchestrator {
    /// Creates a new `Orchestrator` instance.
    ///
    /// # Arguments
    ///
    /// * `phases` - Phases in execution order; each starts only after the
    ///   previous one committed all of its chunks
    /// * `registry` - Tracks run identities and their states
    /// * `notifier` - Invoked once per started run after its terminal state
    /// * `restart_policy` - Whether a failed identity may be launched again
    ///
    /// # Returns
    ///
    /// A new `Orchestrator` instance.
    pub fn new(
        phases: Vec<Box<dyn MigrationPhase>>,
        registry: Arc<dyn RunRegistry>,
        notifier: CompletionNotifier,
        restart_policy: RestartPolicy,
    ) -> Self {
        Self {
            phases,
            registry,
            notifier,
            restart_policy,
            run_ids: RunIdGenerator::new(),
        }
    }

    /// Creates an orchestrator running the unit phase, then the member phase.
    pub fn with_stores(
        source: Arc<dyn SourceExtractor>,
        target: Arc<dyn TargetStore>,
        registry: Arc<dyn RunRegistry>,
        notifier: CompletionNotifier,
        config: &MigrationConfig,
    ) -> Self {
        Self::new(
            standard_phases(source, target, config),
            registry,
            notifier,
            config.restart_policy,
        )
    }

    /// Runs a migration under a freshly generated identity.
    pub async fn run_migration(&self) -> Result<MigrationResult, OrchestratorError> {
        let run_id = self.run_ids.next();
        self.run_migration_with_id(run_id).await
    }

    /// Runs a migration under the given identity.
    ///
    /// # Returns
    ///
    /// * `Ok(MigrationResult)` - The run started; its status is `COMPLETED`
    ///   or `FAILED`
    /// * `Err(OrchestratorError)` - The launch was refused and no work was done
    #[instrument(skip_all, fields(run_id = %run_id))]
    pub async fn run_migration_with_id(
        &self,
        run_id: RunId,
    ) -> Result<MigrationResult, OrchestratorError> {
        self.registry.begin(run_id, self.restart_policy).await?;
        info!("Migration run started");

        let mut counts = PhaseCounts::default();
        let outcome = self.run_phases(run_id, &mut counts).await;

        let result = match outcome {
            Ok(()) => match self.registry.finish(run_id, RunStatus::Completed).await {
                Ok(()) => MigrationResult::completed(run_id, counts),
                Err(registry_error) => {
                    let failure = MigrationError::Unexpected(Box::new(registry_error));
                    self.record_failure(run_id).await;
                    MigrationResult::failed(run_id, counts, ErrorChain::from_error(&failure))
                }
            },
            Err(failure) => {
                self.record_failure(run_id).await;
                MigrationResult::failed(run_id, counts, ErrorChain::from_error(&failure))
            }
        };

        match &result.failure_detail {
            None => info!(
                units_created = counts.units_created(),
                units_updated = counts.units_updated(),
                units_skipped = counts.units_skipped(),
                members_created = counts.members_created(),
                members_updated = counts.members_updated(),
                members_skipped = counts.members_skipped(),
                "Migration run completed"
            ),
            Some(detail) => error!(
                error = %detail,
                root_cause = detail.root_cause(),
                "Migration run failed"
            ),
        }

        let report = self.notifier.notify(&result).await;
        if !report.is_clean() {
            warn!(failed = report.failed.len(), "Some read caches could not be invalidated");
        }
        Ok(result)
    }

    /// Current registry state of `run_id`.
    pub async fn status(&self, run_id: RunId) -> Result<RunStatus, OrchestratorError> {
        Ok(self.registry.status(run_id).await?)
    }

    async fn run_phases(&self, run_id: RunId, counts: &mut PhaseCounts) -> Result<(), MigrationError> {
        for phase in &self.phases {
            phase.run(run_id, counts.for_kind_mut(phase.kind())).await?;
        }
        Ok(())
    }

    async fn record_failure(&self, run_id: RunId) {
        if let Err(registry_error) = self.registry.finish(run_id, RunStatus::Failed).await {
            error!(run_id = %run_id, error = %registry_error, "Failed to record run failure");
        }
    }
}
