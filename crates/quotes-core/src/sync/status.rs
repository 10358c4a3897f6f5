//! Sync state shared with presentation layers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counts from one completed sync cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub added: usize,
    pub updated: usize,
    /// Conflicts detected by this cycle
    pub conflicts: usize,
    /// Conflicts still open after this cycle
    pub open_conflicts: usize,
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Sync complete: {} added, {} updated, {} conflict(s) detected, {} open",
            self.added, self.updated, self.conflicts, self.open_conflicts
        )
    }
}

/// Result of one sync cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed(SyncReport),
    /// The cycle left replica and ledger untouched
    Failed(String),
}

impl SyncOutcome {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    #[must_use]
    pub const fn report(&self) -> Option<&SyncReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Failed(_) => None,
        }
    }
}

/// Orchestrator state as seen by observers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Succeeded(SyncReport),
    Failed(String),
}

impl SyncStatus {
    #[must_use]
    pub const fn is_syncing(&self) -> bool {
        matches!(self, Self::Syncing)
    }
}

impl From<SyncOutcome> for SyncStatus {
    fn from(outcome: SyncOutcome) -> Self {
        match outcome {
            SyncOutcome::Completed(report) => Self::Succeeded(report),
            SyncOutcome::Failed(message) => Self::Failed(message),
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Syncing => write!(f, "Syncing..."),
            Self::Succeeded(report) => write!(f, "{}", report.summary()),
            Self::Failed(message) => write!(f, "Sync failed: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SyncReport {
        SyncReport {
            added: 1,
            updated: 2,
            conflicts: 2,
            open_conflicts: 3,
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn outcome_maps_to_terminal_status() {
        let report = report();
        assert_eq!(
            SyncStatus::from(SyncOutcome::Completed(report.clone())),
            SyncStatus::Succeeded(report)
        );
        assert_eq!(
            SyncStatus::from(SyncOutcome::Failed("offline".to_string())),
            SyncStatus::Failed("offline".to_string())
        );
    }

    #[test]
    fn status_display_reads_like_a_status_line() {
        assert_eq!(SyncStatus::default().to_string(), "Idle");
        assert_eq!(
            SyncStatus::Succeeded(report()).to_string(),
            "Sync complete: 1 added, 2 updated, 2 conflict(s) detected, 3 open"
        );
        assert_eq!(
            SyncStatus::Failed("timeout".to_string()).to_string(),
            "Sync failed: timeout"
        );
    }

    #[test]
    fn report_serializes_camel_case() {
        let value = serde_json::to_value(report()).unwrap();
        assert_eq!(value["openConflicts"], 3);
        assert!(value.get("finishedAt").is_some());
    }
}
