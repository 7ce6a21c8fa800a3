use std::collections::HashMap;

use async_trait::async_trait;
use roster_migrator_shared::types::{RunId, RunStatus};
use tokio::sync::Mutex;

use crate::{RestartPolicy, RunRegistry, RunRegistryError};

/// Run registry held in process memory.
///
/// Admission and the state transition happen under one lock, so concurrent
/// launches of the same identity cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryRunRegistry {
    runs: Mutex<HashMap<RunId, RunStatus>>,
}

impl InMemoryRunRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RunRegistry for InMemoryRunRegistry {
    async fn begin(&self, run_id: RunId, policy: RestartPolicy) -> Result<(), RunRegistryError> {
        let mut runs = self.runs.lock().await;
        let current = runs.get(&run_id).copied().unwrap_or(RunStatus::NotStarted);
        policy.admit(run_id, current)?;
        runs.insert(run_id, RunStatus::Running);
        Ok(())
    }

    async fn finish(&self, run_id: RunId, status: RunStatus) -> Result<(), RunRegistryError> {
        if !status.is_terminal() {
            return Err(RunRegistryError::InvalidStatus(status.to_string()));
        }
        let mut runs = self.runs.lock().await;
        match runs.get(&run_id) {
            Some(RunStatus::Running) => {
                runs.insert(run_id, status);
                Ok(())
            }
            _ => Err(RunRegistryError::NotRunning(run_id)),
        }
    }

    async fn status(&self, run_id: RunId) -> Result<RunStatus, RunRegistryError> {
        Ok(self
            .runs
            .lock()
            .await
            .get(&run_id)
            .copied()
            .unwrap_or(RunStatus::NotStarted))
    }
}
