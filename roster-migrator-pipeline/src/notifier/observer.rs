use roster_migrator_repository::{CacheError, CacheName};
use roster_migrator_shared::types::{ErrorChain, RunId};
use tracing::error;

/// Receives the failures a run surfaces after reaching its terminal state.
pub trait RunObserver: Send + Sync {
    /// Called once for a run that ended in `FAILED`.
    fn run_failed(&self, run_id: RunId, detail: &ErrorChain);

    /// Called for every cache whose invalidation failed after a completed run.
    fn cache_invalidation_failed(&self, run_id: RunId, cache: CacheName, error: &CacheError);
}

/// Reports failures as `tracing` error events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn run_failed(&self, run_id: RunId, detail: &ErrorChain) {
        for (depth, message) in detail.messages.iter().enumerate() {
            error!(run_id = %run_id, depth, cause = %message, "Migration run failed");
        }
    }

    fn cache_invalidation_failed(&self, run_id: RunId, cache: CacheName, error: &CacheError) {
        error!(run_id = %run_id, cache = %cache, error = %error, "Failed to clear cache");
    }
}
