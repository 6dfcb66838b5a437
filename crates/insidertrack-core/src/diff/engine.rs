//! Diff computation.

use crate::config::MetricsPolicy;
use crate::diff::model::{ChangeKind, ChangeReport};
use crate::fingerprint::{Fingerprint, Fingerprinter, Sha256Fingerprinter};
use crate::model::{CompanyMetrics, Snapshot, Transaction};
use std::collections::BTreeSet;

/// Knobs for [`diff_with`]
#[derive(Debug, Clone, Default)]
pub struct DiffOptions<F = Sha256Fingerprinter> {
    pub fingerprinter: F,
    pub metrics_policy: MetricsPolicy,
}

impl DiffOptions {
    pub fn with_metrics_policy(metrics_policy: MetricsPolicy) -> Self {
        Self {
            fingerprinter: Sha256Fingerprinter,
            metrics_policy,
        }
    }
}

/// Diff with the default fingerprinter and strict metrics comparison.
pub fn diff(previous: Option<&Snapshot>, current: &Snapshot) -> ChangeReport {
    diff_with(previous, current, &DiffOptions::<Sha256Fingerprinter>::default())
}

/// Compute the change report for `current` against `previous`.
///
/// With no previous snapshot the result is an initial-load report counting
/// every current transaction as new.
pub fn diff_with<F: Fingerprinter>(
    previous: Option<&Snapshot>,
    current: &Snapshot,
    options: &DiffOptions<F>,
) -> ChangeReport {
    let Some(previous) = previous else {
        return ChangeReport {
            kind: ChangeKind::InitialLoad,
            changed: true,
            new_count: current.transactions.len(),
            removed_count: 0,
            metrics_changed: false,
            changed_metrics: Vec::new(),
            new_transactions: Vec::new(),
            removed_transactions: Vec::new(),
            old_metrics: None,
            new_metrics: current.metrics.clone(),
        };
    };

    let (previous_order, previous_ids) =
        index_transactions(&previous.transactions, &options.fingerprinter);
    let (current_order, current_ids) =
        index_transactions(&current.transactions, &options.fingerprinter);

    let new_transactions: Vec<Transaction> = current_order
        .iter()
        .filter(|(fp, _)| !previous_ids.contains(fp))
        .map(|(_, t)| (*t).clone())
        .collect();
    let removed_transactions: Vec<Transaction> = previous_order
        .iter()
        .filter(|(fp, _)| !current_ids.contains(fp))
        .map(|(_, t)| (*t).clone())
        .collect();

    let changed_metrics = changed_metric_names(
        &previous.metrics,
        &current.metrics,
        options.metrics_policy,
    );
    let metrics_changed = !changed_metrics.is_empty();

    ChangeReport {
        kind: ChangeKind::Diff,
        changed: !new_transactions.is_empty() || !removed_transactions.is_empty() || metrics_changed,
        new_count: new_transactions.len(),
        removed_count: removed_transactions.len(),
        metrics_changed,
        changed_metrics,
        new_transactions,
        removed_transactions,
        old_metrics: Some(previous.metrics.clone()),
        new_metrics: current.metrics.clone(),
    }
}

/// Fingerprint every transaction, keeping the first occurrence of each
/// identity in sequence order.
fn index_transactions<'a, F: Fingerprinter>(
    transactions: &'a [Transaction],
    fingerprinter: &F,
) -> (Vec<(Fingerprint, &'a Transaction)>, BTreeSet<Fingerprint>) {
    let mut ordered = Vec::with_capacity(transactions.len());
    let mut seen = BTreeSet::new();
    for txn in transactions {
        let fp = fingerprinter.fingerprint(txn);
        if seen.insert(fp.clone()) {
            ordered.push((fp, txn));
        }
    }
    (ordered, seen)
}

fn changed_metric_names(
    old: &CompanyMetrics,
    new: &CompanyMetrics,
    policy: MetricsPolicy,
) -> Vec<String> {
    old.tracked()
        .into_iter()
        .zip(new.tracked())
        .filter(|((_, a), (_, b))| !policy.equal(*a, *b))
        .map(|((name, _), _)| name.to_string())
        .collect()
}
