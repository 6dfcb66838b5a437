//! Commit sequencing tests against the filesystem stores
//! Covers initial load, add/remove, metrics-only and unchanged commits

use chrono::{TimeZone, Utc};
use insidertrack_core::{
    ChangeKind, CompanyMetrics, EngineConfig, EntityKey, ExErrorKind, Snapshot, Transaction,
};
use insidertrack_engine::{Coordinator, FixedClock};
use insidertrack_store::fs::{FsChangeLogStore, FsHistoryStore, FsSnapshotStore};
use insidertrack_store::FsStores;
use tempfile::TempDir;

type FsCoordinator = Coordinator<FsSnapshotStore, FsHistoryStore, FsChangeLogStore, FixedClock>;

fn setup() -> (TempDir, FsCoordinator) {
    let dir = TempDir::new().unwrap();
    let config = EngineConfig {
        data_dir: dir.path().to_path_buf(),
        ..EngineConfig::default()
    };
    let stores = FsStores::open(&config).unwrap();
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
    let coordinator =
        Coordinator::with_clock(stores.current, stores.history, stores.changes, clock, &config);
    (dir, coordinator)
}

fn key() -> EntityKey {
    EntityKey::new("afry-ab").unwrap()
}

fn txn(insider: &str) -> Transaction {
    Transaction::new("2025-03-01", "2025-02-27", insider, "1,000", "125,000 SEK")
}

fn metrics(value_bought: &str) -> CompanyMetrics {
    CompanyMetrics {
        company_name: Some("AFRY AB".to_string()),
        value_bought: Some(value_bought.to_string()),
        value_sold: Some("0 SEK".to_string()),
        net_insiders_buying: Some("Yes".to_string()),
        trades_count: Some("2".to_string()),
        insider_activity: None,
    }
}

fn snapshot(captured_at: &str, value_bought: &str, txns: Vec<Transaction>) -> Snapshot {
    Snapshot::new(
        captured_at,
        "https://example.test/en/company/afry-ab",
        metrics(value_bought),
        txns,
    )
}

#[test]
fn test_initial_load_writes_all_three_stores() {
    // Given: No prior data
    let (dir, coordinator) = setup();
    let s = snapshot("2025-03-01T08:00:00", "1 MSEK", vec![txn("A"), txn("B")]);

    // When: The first snapshot is committed
    let report = coordinator.commit(&key(), &s).unwrap().into_result().unwrap();

    // Then: Initial load with 2 new transactions
    assert_eq!(report.kind, ChangeKind::InitialLoad);
    assert!(report.changed);
    assert_eq!(report.new_count, 2);
    assert_eq!(report.removed_count, 0);

    // And: Current, history and change log were all written
    assert_eq!(coordinator.get_current_snapshot(&key()).unwrap(), Some(s.clone()));
    assert_eq!(
        coordinator.list_history(&key()).unwrap(),
        vec!["2025-03-01_08-00-00"]
    );
    let log = coordinator.get_change_log(&key()).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].scraped_at, "2025-03-01T08:00:00");
    assert_eq!(log[0].timestamp, "2025-03-01T12:00:00Z");
    assert_eq!(log[0].history_id.as_deref(), Some("2025-03-01_08-00-00"));
    assert!(dir.path().join("changes/afry-ab_changes.json").is_file());
}

#[test]
fn test_one_added_one_removed() {
    // Given: {A, B} committed
    let (_dir, coordinator) = setup();
    let first = snapshot("2025-03-01T08:00:00", "1 MSEK", vec![txn("A"), txn("B")]);
    coordinator.commit(&key(), &first).unwrap().into_result().unwrap();

    // When: {B, C} is committed with identical metrics
    let second = snapshot("2025-03-01T09:00:00", "1 MSEK", vec![txn("B"), txn("C")]);
    let report = coordinator.commit(&key(), &second).unwrap().into_result().unwrap();

    // Then: C appeared, A disappeared, metrics unchanged
    assert!(report.changed);
    assert_eq!(report.new_count, 1);
    assert_eq!(report.removed_count, 1);
    assert!(!report.metrics_changed);
    assert_eq!(report.new_transactions, vec![txn("C")]);
    assert_eq!(report.removed_transactions, vec![txn("A")]);

    // And: A second history record and change-log entry exist
    assert_eq!(coordinator.list_history(&key()).unwrap().len(), 2);
    let log = coordinator.get_change_log(&key()).unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].details.new_transactions_list, vec![txn("C")]);
    assert_eq!(log[1].details.removed_transactions_list, vec![txn("A")]);
}

#[test]
fn test_metrics_only_change() {
    // Given: A committed snapshot
    let (_dir, coordinator) = setup();
    coordinator
        .commit(&key(), &snapshot("2025-03-01T08:00:00", "1 MSEK", vec![txn("A")]))
        .unwrap()
        .into_result()
        .unwrap();

    // When: Only value_bought differs
    let report = coordinator
        .commit(&key(), &snapshot("2025-03-01T09:00:00", "2 MSEK", vec![txn("A")]))
        .unwrap()
        .into_result()
        .unwrap();

    // Then: Metrics-only change is recorded
    assert!(report.changed);
    assert_eq!(report.new_count, 0);
    assert_eq!(report.removed_count, 0);
    assert!(report.metrics_changed);
    assert_eq!(coordinator.get_change_log(&key()).unwrap().len(), 2);
}

#[test]
fn test_no_change_refreshes_current_only() {
    // Given: A committed snapshot
    let (_dir, coordinator) = setup();
    coordinator
        .commit(&key(), &snapshot("2025-03-01T08:00:00", "1 MSEK", vec![txn("A")]))
        .unwrap()
        .into_result()
        .unwrap();

    // When: The same content is captured again later
    let later = snapshot("2025-03-01T09:00:00", "1 MSEK", vec![txn("A")]);
    let report = coordinator.commit(&key(), &later).unwrap().into_result().unwrap();

    // Then: Nothing changed, but current carries the new capture time
    assert!(!report.changed);
    let current = coordinator.get_current_snapshot(&key()).unwrap().unwrap();
    assert_eq!(current.captured_at, "2025-03-01T09:00:00");

    // And: No new history record or change-log entry
    assert_eq!(coordinator.list_history(&key()).unwrap().len(), 1);
    assert_eq!(coordinator.get_change_log(&key()).unwrap().len(), 1);
}

#[test]
fn test_committing_twice_is_idempotent() {
    // Given: A committed snapshot
    let (_dir, coordinator) = setup();
    coordinator
        .commit(&key(), &snapshot("2025-03-01T08:00:00", "1 MSEK", vec![txn("A")]))
        .unwrap()
        .into_result()
        .unwrap();
    let next = snapshot("2025-03-01T09:00:00", "1 MSEK", vec![txn("A"), txn("B")]);

    // When: The same new snapshot is committed twice in a row
    let first = coordinator.commit(&key(), &next).unwrap().into_result().unwrap();
    let second = coordinator.commit(&key(), &next).unwrap().into_result().unwrap();

    // Then: Only the first reports a change
    assert!(first.changed);
    assert!(!second.changed);
    assert_eq!(coordinator.list_history(&key()).unwrap().len(), 2);
}

#[test]
fn test_current_roundtrips_exactly() {
    let (_dir, coordinator) = setup();
    let s = snapshot(
        "2025-03-01T08:15:00.123456",
        "1,000,000 SEK",
        vec![txn("Jane Doe").with_role("CEO").with_derived_price()],
    );

    coordinator.commit(&key(), &s).unwrap().into_result().unwrap();

    assert_eq!(coordinator.get_current_snapshot(&key()).unwrap(), Some(s));
}

#[test]
fn test_malformed_snapshot_writes_nothing() {
    // Given: A committed snapshot
    let (_dir, coordinator) = setup();
    let good = snapshot("2025-03-01T08:00:00", "1 MSEK", vec![txn("A")]);
    coordinator.commit(&key(), &good).unwrap().into_result().unwrap();

    // When: A snapshot with a blank insider name is committed
    let bad = snapshot("2025-03-01T09:00:00", "2 MSEK", vec![txn("  ")]);
    let err = coordinator.commit(&key(), &bad).unwrap_err();

    // Then: MalformedInput naming the entity, and state is untouched
    assert_eq!(err.kind(), ExErrorKind::MalformedInput);
    assert_eq!(err.entity_key(), Some("afry-ab"));
    assert_eq!(coordinator.get_current_snapshot(&key()).unwrap(), Some(good));
    assert_eq!(coordinator.list_history(&key()).unwrap().len(), 1);
    assert_eq!(coordinator.get_change_log(&key()).unwrap().len(), 1);
}

#[test]
fn test_unparseable_capture_time_is_malformed() {
    let (_dir, coordinator) = setup();
    let bad = snapshot("yesterday", "1 MSEK", vec![txn("A")]);

    let err = coordinator.commit(&key(), &bad).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::MalformedInput);
    assert_eq!(coordinator.get_current_snapshot(&key()).unwrap(), None);
}

#[test]
fn test_history_snapshot_is_readable() {
    let (_dir, coordinator) = setup();
    let s = snapshot("2025-03-01T08:00:00", "1 MSEK", vec![txn("A")]);
    coordinator.commit(&key(), &s).unwrap().into_result().unwrap();

    let ids = coordinator.list_history(&key()).unwrap();
    let archived = coordinator.get_history_snapshot(&key(), &ids[0]).unwrap();

    assert_eq!(archived, s);
}

#[test]
fn test_entities_are_independent() {
    let (_dir, coordinator) = setup();
    let other = EntityKey::new("bouvet-asa").unwrap();

    coordinator
        .commit(&key(), &snapshot("2025-03-01T08:00:00", "1 MSEK", vec![txn("A")]))
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(coordinator.get_current_snapshot(&other).unwrap(), None);
    assert!(coordinator.list_history(&other).unwrap().is_empty());
    assert!(coordinator.get_change_log(&other).unwrap().is_empty());
}
