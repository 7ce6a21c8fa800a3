use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{ErrorChain, PhaseCounts};

/// Identity of one migration run.
///
/// Ordered, so a later run always carries a greater id than an earlier one.
/// It is never used to deduplicate entity records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct RunId(pub i64);

impl RunId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a run: `NotStarted -> Running -> {Completed, Failed}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    NotStarted,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::NotStarted => "NOT_STARTED",
            RunStatus::Running => "RUNNING",
            RunStatus::Completed => "COMPLETED",
            RunStatus::Failed => "FAILED",
        }
    }

    /// Parses the storage representation produced by [`RunStatus::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NOT_STARTED" => Some(RunStatus::NotStarted),
            "RUNNING" => Some(RunStatus::Running),
            "COMPLETED" => Some(RunStatus::Completed),
            "FAILED" => Some(RunStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a run that got past the launch checks.
///
/// `status` is always terminal. `failure_detail` is present exactly when the
/// run failed. Counts only cover chunks that were committed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrationResult {
    pub status: RunStatus,
    pub run_id: RunId,
    pub phase_counts: PhaseCounts,
    pub failure_detail: Option<ErrorChain>,
}

impl MigrationResult {
    pub fn completed(run_id: RunId, phase_counts: PhaseCounts) -> Self {
        Self {
            status: RunStatus::Completed,
            run_id,
            phase_counts,
            failure_detail: None,
        }
    }

    pub fn failed(run_id: RunId, phase_counts: PhaseCounts, failure_detail: ErrorChain) -> Self {
        Self {
            status: RunStatus::Failed,
            run_id,
            phase_counts,
            failure_detail: Some(failure_detail),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_storage_string() {
        for status in [
            RunStatus::NotStarted,
            RunStatus::Running,
            RunStatus::Completed,
            RunStatus::Failed,
        ] {
            assert_eq!(RunStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RunStatus::parse("ABANDONED"), None);
    }

    #[test]
    fn test_only_completed_and_failed_are_terminal() {
        assert!(!RunStatus::NotStarted.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
    }

    #[test]
    fn test_result_serializes_with_status_and_counts() {
        let result = MigrationResult::completed(RunId(42), PhaseCounts::default());
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["status"], "COMPLETED");
        assert_eq!(json["run_id"], 42);
        assert_eq!(json["phase_counts"]["units"]["created"], 0);
        assert!(json["failure_detail"].is_null());
    }
}
