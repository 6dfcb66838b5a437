//! Commit orchestration for one entity.
//!
//! ## Sequence
//! 1. Validate the incoming snapshot (MalformedInput is a hard stop, no writes)
//! 2. Load the previous snapshot
//! 3. Diff previous against incoming
//! 4. Save the incoming snapshot as current, unconditionally
//! 5. If changed: append to history under the capture time
//! 6. If changed: append a change-log entry
//!
//! A failure in step 4 or earlier is an `Err` and leaves every store as it
//! was. A failure in step 5 or 6 is a [`CommitOutcome::Partial`] carrying
//! the report and a `PartialCommit` error; the previous snapshot is already
//! gone at that point, so the report is the only record of what changed.
//! [`Coordinator::resume_commit`] takes it and finishes the job without
//! duplicating anything already written.

use chrono::{DateTime, Duration, Utc};
use insidertrack_core::errors::{ExError, ExErrorKind};
use insidertrack_core::{
    diff_with, log_op_end, log_op_error, log_op_start, ChangeLogEntry, ChangeReport, DiffOptions,
    EngineConfig, EntityKey, Snapshot,
};
use insidertrack_core_types::RunId;
use insidertrack_store::fs::{FsChangeLogStore, FsHistoryStore, FsSnapshotStore};
use insidertrack_store::{ChangeLogStore, FsStores, HistoryStore, Result, SnapshotStore};
use std::cell::Cell;

/// How far a commit got once the current snapshot was saved
#[derive(Debug, Clone)]
pub enum CommitOutcome {
    /// Every write for the snapshot landed
    Complete(ChangeReport),
    /// The current snapshot was saved but the history or change-log write
    /// failed. `error` is a `PartialCommit` with the store error as source.
    Partial { report: ChangeReport, error: ExError },
}

impl CommitOutcome {
    pub fn report(&self) -> &ChangeReport {
        match self {
            CommitOutcome::Complete(report) | CommitOutcome::Partial { report, .. } => report,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, CommitOutcome::Complete(_))
    }

    pub fn partial_error(&self) -> Option<&ExError> {
        match self {
            CommitOutcome::Complete(_) => None,
            CommitOutcome::Partial { error, .. } => Some(error),
        }
    }

    /// The report if the commit completed, the `PartialCommit` error otherwise
    pub fn into_result(self) -> Result<ChangeReport> {
        match self {
            CommitOutcome::Complete(report) => Ok(report),
            CommitOutcome::Partial { error, .. } => Err(error),
        }
    }
}

/// Source of commit timestamps
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock returning a settable instant, for deterministic tests
#[derive(Debug, Clone)]
pub struct FixedClock {
    at: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at: Cell::new(at) }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.at.set(at);
    }

    pub fn advance(&self, by: Duration) {
        self.at.set(self.at.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at.get()
    }
}

impl<K: Clock + ?Sized> Clock for &K {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Sequences the diff engine and the three stores.
///
/// Entities are committed one at a time; concurrent commits for the same
/// key must be serialized by the caller.
pub struct Coordinator<S, H, C, K = SystemClock> {
    snapshots: S,
    history: H,
    changes: C,
    clock: K,
    options: DiffOptions,
    run_id: RunId,
}

impl Coordinator<FsSnapshotStore, FsHistoryStore, FsChangeLogStore, SystemClock> {
    /// Open filesystem stores under `config.data_dir`
    ///
    /// # Errors
    ///
    /// `Config` if the configuration is invalid, `Io` if the data directory
    /// cannot be created.
    pub fn open(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let stores = FsStores::open(config)?;
        Ok(Self::new(stores.current, stores.history, stores.changes, config))
    }
}

impl<S, H, C> Coordinator<S, H, C, SystemClock>
where
    S: SnapshotStore,
    H: HistoryStore,
    C: ChangeLogStore,
{
    pub fn new(snapshots: S, history: H, changes: C, config: &EngineConfig) -> Self {
        Self::with_clock(snapshots, history, changes, SystemClock, config)
    }
}

impl<S, H, C, K> Coordinator<S, H, C, K>
where
    S: SnapshotStore,
    H: HistoryStore,
    C: ChangeLogStore,
    K: Clock,
{
    pub fn with_clock(snapshots: S, history: H, changes: C, clock: K, config: &EngineConfig) -> Self {
        Self {
            snapshots,
            history,
            changes,
            clock,
            options: DiffOptions::with_metrics_policy(config.metrics_policy),
            run_id: RunId::new(),
        }
    }

    /// Use an existing run id instead of a fresh one
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub(crate) fn snapshots(&self) -> &S {
        &self.snapshots
    }

    pub(crate) fn history(&self) -> &H {
        &self.history
    }

    pub(crate) fn changes(&self) -> &C {
        &self.changes
    }

    /// Commit a freshly captured snapshot for `key` and return what changed.
    ///
    /// # Errors
    ///
    /// - `MalformedInput`: the snapshot cannot be fingerprinted (nothing written)
    /// - `Io` / `Serialization`: loading or saving the current snapshot failed
    ///   (nothing written)
    ///
    /// A failed history or change-log write is not an `Err`: it comes back as
    /// [`CommitOutcome::Partial`] so the report survives for notification and
    /// for [`Coordinator::resume_commit`].
    pub fn commit(&self, key: &EntityKey, snapshot: &Snapshot) -> Result<CommitOutcome> {
        log_op_start!(
            "commit",
            entity_key = key.as_str(),
            run_id = self.run_id.as_str()
        );
        let start = std::time::Instant::now();

        let outcome = self.commit_impl(key, snapshot).map_err(|e| {
            log_op_error!(
                "commit",
                e,
                duration_ms = start.elapsed().as_millis() as u64,
                entity_key = key.as_str(),
                run_id = self.run_id.as_str()
            );
            e
        })?;

        let report = outcome.report();
        match outcome.partial_error() {
            Some(error) => {
                log_op_error!(
                    "commit",
                    error,
                    duration_ms = start.elapsed().as_millis() as u64,
                    entity_key = key.as_str(),
                    run_id = self.run_id.as_str(),
                    changed = report.changed,
                    new_count = report.new_count,
                    removed_count = report.removed_count
                );
            }
            None => {
                log_op_end!(
                    "commit",
                    duration_ms = start.elapsed().as_millis() as u64,
                    entity_key = key.as_str(),
                    run_id = self.run_id.as_str(),
                    changed = report.changed,
                    new_count = report.new_count,
                    removed_count = report.removed_count,
                    metrics_changed = report.metrics_changed
                );
            }
        }

        Ok(outcome)
    }

    fn commit_impl(&self, key: &EntityKey, snapshot: &Snapshot) -> Result<CommitOutcome> {
        snapshot
            .validate()
            .map_err(|e| e.with_entity_key(key.as_str()))?;
        let captured_at = snapshot
            .captured_at_utc()
            .map_err(|e| e.with_entity_key(key.as_str()))?;

        let previous = self.snapshots.load(key)?;
        let report = diff_with(previous.as_ref(), snapshot, &self.options);
        tracing::debug!(entity_key = %key, summary = %report.summary_line(), "Computed change report");

        self.snapshots.save(key, snapshot)?;

        if report.changed {
            if let Err(error) = self.record_change(key, snapshot, &report, captured_at) {
                return Ok(CommitOutcome::Partial { report, error });
            }
        }

        Ok(CommitOutcome::Complete(report))
    }

    /// Write the history record and change-log entry for a changed snapshot.
    /// Called only after the current snapshot is saved.
    fn record_change(
        &self,
        key: &EntityKey,
        snapshot: &Snapshot,
        report: &ChangeReport,
        captured_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut completed = vec!["current snapshot saved".to_string()];

        let history_id = self
            .history
            .append(key, snapshot, captured_at)
            .map_err(|e| partial_commit(key, &completed, "history append", e))?;
        completed.push(format!("history record {} written", history_id));

        let entry = ChangeLogEntry::from_report(
            report,
            &snapshot.captured_at,
            self.clock.now(),
            Some(history_id),
        );
        self.changes
            .append(key, &entry)
            .map_err(|e| partial_commit(key, &completed, "change-log append", e))?;

        Ok(())
    }

    /// Re-apply the conditional writes of a partially committed snapshot.
    ///
    /// `report` is the one carried by [`CommitOutcome::Partial`]. History append is idempotent by content
    /// and the change-log entry is skipped when the last stored entry
    /// already records the same change, so calling this after a complete
    /// commit writes nothing.
    ///
    /// # Errors
    ///
    /// Store errors from the history or change-log write.
    pub fn resume_commit(
        &self,
        key: &EntityKey,
        snapshot: &Snapshot,
        report: &ChangeReport,
    ) -> Result<()> {
        log_op_start!(
            "resume_commit",
            entity_key = key.as_str(),
            run_id = self.run_id.as_str()
        );
        let start = std::time::Instant::now();

        let appended = self.resume_impl(key, snapshot, report).map_err(|e| {
            log_op_error!(
                "resume_commit",
                e,
                duration_ms = start.elapsed().as_millis() as u64,
                entity_key = key.as_str(),
                run_id = self.run_id.as_str()
            );
            e
        })?;

        log_op_end!(
            "resume_commit",
            duration_ms = start.elapsed().as_millis() as u64,
            entity_key = key.as_str(),
            run_id = self.run_id.as_str(),
            appended_change = appended
        );
        Ok(())
    }

    /// Returns whether a change-log entry was appended
    fn resume_impl(&self, key: &EntityKey, snapshot: &Snapshot, report: &ChangeReport) -> Result<bool> {
        if !report.changed {
            return Ok(false);
        }
        snapshot
            .validate()
            .map_err(|e| e.with_entity_key(key.as_str()))?;
        let captured_at = snapshot
            .captured_at_utc()
            .map_err(|e| e.with_entity_key(key.as_str()))?;

        let history_id = self.history.append(key, snapshot, captured_at)?;

        let entry = ChangeLogEntry::from_report(
            report,
            &snapshot.captured_at,
            self.clock.now(),
            Some(history_id),
        );
        let already_logged = self
            .changes
            .load(key)?
            .last()
            .is_some_and(|last| last.records_same_change(&entry));
        if already_logged {
            tracing::debug!(entity_key = %key, "Change-log entry already present");
            return Ok(false);
        }

        self.changes.append(key, &entry)?;
        Ok(true)
    }
}

fn partial_commit(key: &EntityKey, completed: &[String], failed: &str, source: ExError) -> ExError {
    ExError::new(ExErrorKind::PartialCommit)
        .with_op("commit")
        .with_entity_key(key.as_str())
        .with_message(format!(
            "{} failed after: {}",
            failed,
            completed.join(", ")
        ))
        .with_source(source)
}
