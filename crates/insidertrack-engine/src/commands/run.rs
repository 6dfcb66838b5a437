//! Per-run aggregation.
//!
//! A run commits many entities one after another. A failure is recorded
//! against its entity and the run moves on; whether the run as a whole
//! failed is the caller's decision via [`RunSummary::has_failures`].
//! A partial commit is resumed once before moving on.

use crate::commands::commit::{Clock, CommitOutcome, Coordinator};
use insidertrack_core::errors::ExError;
use insidertrack_core::{log_op_end, log_op_start, ChangeReport, EntityKey, Snapshot};
use insidertrack_core_types::RunId;
use insidertrack_store::{ChangeLogStore, HistoryStore, SnapshotStore};
use std::fmt;

/// What happened to one entity during a run
#[derive(Debug, Clone)]
pub enum EntityOutcome {
    Committed { key: EntityKey, report: ChangeReport },
    /// The change was detected and the current snapshot saved, but history
    /// or change-log writes are still missing after one resume attempt
    Partial {
        key: EntityKey,
        report: ChangeReport,
        error: ExError,
    },
    Failed { key: EntityKey, error: ExError },
}

impl EntityOutcome {
    pub fn key(&self) -> &EntityKey {
        match self {
            EntityOutcome::Committed { key, .. }
            | EntityOutcome::Partial { key, .. }
            | EntityOutcome::Failed { key, .. } => key,
        }
    }

    pub fn report(&self) -> Option<&ChangeReport> {
        match self {
            EntityOutcome::Committed { report, .. } | EntityOutcome::Partial { report, .. } => {
                Some(report)
            }
            EntityOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ExError> {
        match self {
            EntityOutcome::Committed { .. } => None,
            EntityOutcome::Partial { error, .. } | EntityOutcome::Failed { error, .. } => {
                Some(error)
            }
        }
    }
}

/// Outcomes of one run, in processing order
#[derive(Debug, Clone)]
pub struct RunSummary {
    run_id: RunId,
    outcomes: Vec<EntityOutcome>,
}

impl RunSummary {
    pub fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: EntityOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn outcomes(&self) -> &[EntityOutcome] {
        &self.outcomes
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EntityOutcome::Committed { .. }))
            .count()
    }

    /// Failures whose change was detected but not fully recorded
    pub fn partial(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EntityOutcome::Partial { .. }))
            .count()
    }

    /// Everything not fully committed, partial commits included
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Entities whose commit reported a change (initial loads and partial
    /// commits included)
    pub fn changed(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(EntityOutcome::report)
            .filter(|r| r.changed)
            .count()
    }

    pub fn total_new_transactions(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(EntityOutcome::report)
            .map(|r| r.new_count)
            .sum()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {} entities: {} succeeded, {} failed, {} changed, {} new transactions",
            self.outcomes.len(),
            self.succeeded(),
            self.failed(),
            self.changed(),
            self.total_new_transactions()
        )?;
        if self.partial() > 0 {
            write!(f, ", {} partially committed", self.partial())?;
        }
        Ok(())
    }
}

impl<S, H, C, K> Coordinator<S, H, C, K>
where
    S: SnapshotStore,
    H: HistoryStore,
    C: ChangeLogStore,
    K: Clock,
{
    /// Commit each fetched snapshot in order, continuing past failures.
    ///
    /// A fetch that already failed is recorded as that entity's failure
    /// without touching the stores.
    pub fn run<I>(&self, fetched: I) -> RunSummary
    where
        I: IntoIterator<Item = (EntityKey, Result<Snapshot, ExError>)>,
    {
        log_op_start!("run", run_id = self.run_id().as_str());
        let start = std::time::Instant::now();
        let mut summary = RunSummary::new(self.run_id().clone());

        for (key, fetched) in fetched {
            let committed = fetched.and_then(|snapshot| {
                self.commit(&key, &snapshot)
                    .map(|outcome| self.resume_partial(&key, &snapshot, outcome))
            });
            let outcome = match committed {
                Ok(CommitOutcome::Complete(report)) => EntityOutcome::Committed { key, report },
                Ok(CommitOutcome::Partial { report, error }) => {
                    EntityOutcome::Partial { key, report, error }
                }
                Err(error) => {
                    tracing::warn!(
                        entity_key = %key,
                        run_id = %self.run_id(),
                        err_code = error.code(),
                        "Entity failed, continuing with the next one"
                    );
                    EntityOutcome::Failed { key, error }
                }
            };
            summary.record(outcome);
        }

        log_op_end!(
            "run",
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = self.run_id().as_str(),
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            changed = summary.changed()
        );
        summary
    }

    /// Resume a partial commit once; a successful resume makes it complete
    fn resume_partial(
        &self,
        key: &EntityKey,
        snapshot: &Snapshot,
        outcome: CommitOutcome,
    ) -> CommitOutcome {
        let CommitOutcome::Partial { report, error } = outcome else {
            return outcome;
        };
        match self.resume_commit(key, snapshot, &report) {
            Ok(()) => CommitOutcome::Complete(report),
            Err(_) => CommitOutcome::Partial { report, error },
        }
    }
}
