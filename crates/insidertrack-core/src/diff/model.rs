//! Change report types.

use crate::model::{CompanyMetrics, Transaction};
use serde::{Deserialize, Serialize};

/// Whether a report describes a first capture or a comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// No previous snapshot existed; no diff was computed
    InitialLoad,
    #[default]
    Diff,
}

/// The diff engine's output for one (previous, current) pair.
///
/// `changed` is true iff something appeared, disappeared, or a tracked
/// metric changed, except for an initial load where it is always true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeReport {
    pub kind: ChangeKind,
    pub changed: bool,
    pub new_count: usize,
    pub removed_count: usize,
    pub metrics_changed: bool,
    /// Names of the tracked metrics that differ
    #[serde(default)]
    pub changed_metrics: Vec<String>,
    /// Appeared transactions in current-snapshot order. Empty on initial load.
    pub new_transactions: Vec<Transaction>,
    /// Disappeared transactions in previous-snapshot order
    pub removed_transactions: Vec<Transaction>,
    pub old_metrics: Option<CompanyMetrics>,
    pub new_metrics: CompanyMetrics,
}

impl ChangeReport {
    pub fn is_initial_load(&self) -> bool {
        self.kind == ChangeKind::InitialLoad
    }

    /// One-line description for logs and terminal output
    pub fn summary_line(&self) -> String {
        if self.is_initial_load() {
            return format!("initial load: {} transactions", self.new_count);
        }
        if !self.changed {
            return "no changes".to_string();
        }

        let mut parts = Vec::new();
        if self.new_count > 0 {
            parts.push(format!("{} new", self.new_count));
        }
        if self.removed_count > 0 {
            parts.push(format!("{} removed", self.removed_count));
        }
        if self.metrics_changed {
            parts.push(format!("metrics changed ({})", self.changed_metrics.join(", ")));
        }
        parts.join(", ")
    }
}
