use crate::errors::{malformed, ExError, ExErrorKind, Result};
use crate::model::metrics::CompanyMetrics;
use crate::model::transaction::Transaction;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// One full capture of a tracked entity at one point in time.
///
/// Field names follow the fetcher's output document (`scraped_at`, `url`,
/// `company_info`, `transactions`, `total_transactions`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// ISO-8601 capture timestamp
    #[serde(rename = "scraped_at")]
    pub captured_at: String,
    #[serde(rename = "url")]
    pub source: String,
    #[serde(rename = "company_info", default)]
    pub metrics: CompanyMetrics,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub total_transactions: usize,
}

impl Snapshot {
    /// Build a snapshot, deriving `total_transactions`
    pub fn new(
        captured_at: impl Into<String>,
        source: impl Into<String>,
        metrics: CompanyMetrics,
        transactions: Vec<Transaction>,
    ) -> Self {
        let total_transactions = transactions.len();
        Self {
            captured_at: captured_at.into(),
            source: source.into(),
            metrics,
            transactions,
            total_transactions,
        }
    }

    /// Parse a fetcher-produced JSON document.
    ///
    /// A missing `total_transactions` is derived from the sequence.
    ///
    /// # Errors
    ///
    /// `MalformedInput` if the bytes are not JSON or a required field
    /// (including any transaction identity field) is absent.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| malformed("parse_snapshot", format!("snapshot is not valid JSON: {}", e)))?;
        let has_total = raw.get("total_transactions").is_some();

        let mut snapshot: Snapshot = serde_json::from_value(raw)
            .map_err(|e| malformed("parse_snapshot", format!("invalid snapshot document: {}", e)))?;
        if !has_total {
            snapshot.total_transactions = snapshot.transactions.len();
        }
        Ok(snapshot)
    }

    /// Check that the snapshot can be fingerprinted and stored.
    ///
    /// # Errors
    ///
    /// `MalformedInput` when a transaction has a blank identity field, when
    /// `total_transactions` disagrees with the sequence length, or when the
    /// capture timestamp cannot be parsed.
    pub fn validate(&self) -> Result<()> {
        for (index, txn) in self.transactions.iter().enumerate() {
            let blank = txn.blank_identity_fields();
            if !blank.is_empty() {
                return Err(malformed(
                    "validate_snapshot",
                    format!(
                        "transaction #{} is missing identity field(s): {}",
                        index,
                        blank.join(", ")
                    ),
                ));
            }
        }

        if self.total_transactions != self.transactions.len() {
            return Err(malformed(
                "validate_snapshot",
                format!(
                    "total_transactions is {} but {} transactions were captured",
                    self.total_transactions,
                    self.transactions.len()
                ),
            ));
        }

        self.captured_at_utc()?;
        Ok(())
    }

    /// Capture time as UTC.
    ///
    /// Accepts RFC 3339 and naive ISO-8601 (`2025-03-01T08:15:00.123456`),
    /// the latter read as UTC.
    pub fn captured_at_utc(&self) -> Result<DateTime<Utc>> {
        let raw = self.captured_at.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .map(|naive| naive.and_utc())
            .map_err(|e| {
                ExError::new(ExErrorKind::MalformedInput)
                    .with_op("captured_at_utc")
                    .with_message(format!("invalid capture timestamp {:?}: {}", raw, e))
            })
    }
}
