//! This module defines the `CompletionNotifier`, which reacts to the terminal
//! state of a run.
//!
//! A completed run clears every read cache, including entries for chunks an
//! earlier failed run committed. A failed run leaves the caches untouched and
//! reports its cause chain. Nothing done here can change the run's status.
mod observer;

pub use observer::{RunObserver, TracingObserver};

use std::sync::Arc;

use roster_migrator_repository::{CacheInvalidator, CacheName};
use roster_migrator_shared::types::{MigrationResult, RunStatus};
use tracing::{info, warn};

/// Per-cache outcome of a completion notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionReport {
    pub invalidated: Vec<CacheName>,
    pub failed: Vec<(CacheName, String)>,
}

impl CompletionReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct CompletionNotifier {
    invalidator: Arc<dyn CacheInvalidator>,
    observer: Arc<dyn RunObserver>,
}

impl CompletionNotifier {
    pub fn new(invalidator: Arc<dyn CacheInvalidator>, observer: Arc<dyn RunObserver>) -> Self {
        Self {
            invalidator,
            observer,
        }
    }

    /// A notifier reporting to [`TracingObserver`].
    pub fn with_tracing(invalidator: Arc<dyn CacheInvalidator>) -> Self {
        Self::new(invalidator, Arc::new(TracingObserver))
    }

    /// Handles the terminal state of a run.
    ///
    /// # Arguments
    ///
    /// * `result` - The terminal result of the run
    ///
    /// # Returns
    ///
    /// One entry per cache for a completed run; an empty report otherwise.
    pub async fn notify(&self, result: &MigrationResult) -> CompletionReport {
        let mut report = CompletionReport::default();
        match result.status {
            RunStatus::Completed => {
                for cache in CacheName::ALL {
                    match self.invalidator.invalidate_all(cache).await {
                        Ok(()) => report.invalidated.push(cache),
                        Err(error) => {
                            warn!(run_id = %result.run_id, cache = %cache, error = %error, "Cache invalidation failed");
                            self.observer.cache_invalidation_failed(result.run_id, cache, &error);
                            report.failed.push((cache, error.to_string()));
                        }
                    }
                }
                info!(
                    run_id = %result.run_id,
                    invalidated = report.invalidated.len(),
                    failed = report.failed.len(),
                    "Read caches invalidated"
                );
            }
            RunStatus::Failed => {
                if let Some(detail) = &result.failure_detail {
                    self.observer.run_failed(result.run_id, detail);
                }
            }
            RunStatus::NotStarted | RunStatus::Running => {}
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use roster_migrator_repository::{CacheError, CachedEntity, InMemoryReadCache};
    use roster_migrator_shared::types::{ErrorChain, PhaseCounts, RunId, Unit};
    use std::sync::Mutex;

    struct FailingOn(CacheName);

    #[async_trait]
    impl CacheInvalidator for FailingOn {
        async fn invalidate_all(&self, cache: CacheName) -> Result<(), CacheError> {
            if cache == self.0 {
                return Err(CacheError::Unavailable("connection refused".to_string()));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        failures: Mutex<Vec<String>>,
        cache_failures: Mutex<Vec<CacheName>>,
    }

    impl RunObserver for RecordingObserver {
        fn run_failed(&self, _run_id: RunId, detail: &ErrorChain) {
            self.failures.lock().unwrap().push(detail.to_string());
        }

        fn cache_invalidation_failed(&self, _run_id: RunId, cache: CacheName, _error: &CacheError) {
            self.cache_failures.lock().unwrap().push(cache);
        }
    }

    #[tokio::test]
    async fn test_completed_run_clears_every_cache() {
        let cache = Arc::new(InMemoryReadCache::new());
        let unit = Unit {
            id: "U1".to_string(),
            name: "North".to_string(),
            address: None,
            city: None,
        };
        cache.put(CacheName::UnitsById, "U1", CachedEntity::Unit(unit.clone())).await;
        cache.put(CacheName::UnitsById, "U2", CachedEntity::Unit(unit.clone())).await;
        cache.put(CacheName::MembersById, "M1", CachedEntity::Unit(unit)).await;
        let notifier = CompletionNotifier::with_tracing(cache.clone());

        let result = MigrationResult::completed(RunId(1), PhaseCounts::default());
        let report = notifier.notify(&result).await;

        assert_eq!(report.invalidated, CacheName::ALL.to_vec());
        assert!(report.is_clean());
        assert!(cache.get(CacheName::UnitsById, "U1").await.is_none());
        assert!(cache.get(CacheName::UnitsById, "U2").await.is_none());
        assert!(cache.get(CacheName::MembersById, "M1").await.is_none());
    }

    #[tokio::test]
    async fn test_one_failing_cache_does_not_stop_the_others() {
        let observer = Arc::new(RecordingObserver::default());
        let notifier = CompletionNotifier::new(Arc::new(FailingOn(CacheName::MembersById)), observer.clone());

        let result = MigrationResult::completed(RunId(2), PhaseCounts::default());
        let report = notifier.notify(&result).await;

        assert_eq!(
            report.invalidated,
            vec![CacheName::MembersByExternalKey, CacheName::UnitsById]
        );
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, CacheName::MembersById);
        assert_eq!(*observer.cache_failures.lock().unwrap(), vec![CacheName::MembersById]);
    }

    #[tokio::test]
    async fn test_failed_run_leaves_caches_untouched() {
        let observer = Arc::new(RecordingObserver::default());
        let notifier = CompletionNotifier::new(Arc::new(FailingOn(CacheName::UnitsById)), observer.clone());
        let detail = ErrorChain {
            messages: vec!["chunk failed".to_string(), "disk full".to_string()],
        };

        let result = MigrationResult::failed(RunId(3), PhaseCounts::default(), detail);
        let report = notifier.notify(&result).await;

        assert_eq!(report, CompletionReport::default());
        assert_eq!(
            *observer.failures.lock().unwrap(),
            vec!["chunk failed: caused by: disk full".to_string()]
        );
        assert!(observer.cache_failures.lock().unwrap().is_empty());
    }
}
