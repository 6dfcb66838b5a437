use crate::diff::model::{ChangeKind, ChangeReport};
use crate::model::metrics::CompanyMetrics;
use crate::model::transaction::Transaction;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Persisted summary of one change report.
///
/// Serialized field names match the change-log documents written by earlier
/// versions of the tracker so existing logs stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    /// Commit time (RFC 3339, UTC)
    pub timestamp: String,
    /// Capture time of the snapshot this entry derives from
    pub scraped_at: String,
    /// History record written in the same commit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_id: Option<String>,
    pub new_transactions: usize,
    pub removed_transactions: usize,
    #[serde(default)]
    pub metrics_changed: bool,
    pub details: ChangeDetails,
}

/// Transaction and metric detail embedded in a [`ChangeLogEntry`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeDetails {
    /// Older logs only tag initial loads; an untagged entry is a diff
    #[serde(rename = "type", default)]
    pub kind: ChangeKind,
    /// Free-text note carried by older initial-load entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub new_transactions_list: Vec<Transaction>,
    #[serde(default)]
    pub removed_transactions_list: Vec<Transaction>,
    #[serde(default)]
    pub old_metrics: Option<CompanyMetrics>,
    #[serde(default)]
    pub new_metrics: CompanyMetrics,
}

impl ChangeLogEntry {
    pub fn from_report(
        report: &ChangeReport,
        scraped_at: &str,
        committed_at: DateTime<Utc>,
        history_id: Option<String>,
    ) -> Self {
        Self {
            timestamp: committed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            scraped_at: scraped_at.to_string(),
            history_id,
            new_transactions: report.new_count,
            removed_transactions: report.removed_count,
            metrics_changed: report.metrics_changed,
            details: ChangeDetails {
                kind: report.kind,
                message: None,
                new_transactions_list: report.new_transactions.clone(),
                removed_transactions_list: report.removed_transactions.clone(),
                old_metrics: report.old_metrics.clone(),
                new_metrics: report.new_metrics.clone(),
            },
        }
    }

    /// True if this entry records the same change of the same capture.
    ///
    /// Used to skip re-appending an entry when a partial commit is resumed.
    pub fn records_same_change(&self, other: &ChangeLogEntry) -> bool {
        self.scraped_at == other.scraped_at
            && self.new_transactions == other.new_transactions
            && self.removed_transactions == other.removed_transactions
            && self.metrics_changed == other.metrics_changed
            && self.details == other.details
    }
}
