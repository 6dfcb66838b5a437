#![allow(clippy::unwrap_used, clippy::expect_used)]

use insidertrack_core::errors::{ExError, ExErrorKind};
use insidertrack_core::logging_facility::test_capture::init_test_capture;
use insidertrack_core::{log_op_end, log_op_error, log_op_start};
use insidertrack_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE,
};
use tracing::Level;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, entity_key = "afry-ab");

    let events = capture.events_for(op_name, "afry-ab");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
}

#[test]
fn test_log_op_end_macro_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_event = capture.find(op_name, EVENT_END).expect("end event");
    assert_eq!(end_event.field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = ExError::new(ExErrorKind::Io).with_message("disk full");
    log_op_error!(op_name, err, duration_ms = 10);

    let error_event = capture.find(op_name, EVENT_END_ERROR).expect("error event");
    assert_eq!(error_event.level, Level::ERROR);
    assert_eq!(error_event.field(FIELD_ERR_CODE), Some("ERR_IO"));
}

#[test]
fn test_partial_commit_logged_as_warning() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = ExError::new(ExErrorKind::PartialCommit);
    log_op_error!(op_name, err, duration_ms = 3, entity_key = "bouvet-asa");

    let events = capture.events_for(op_name, "bouvet-asa");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::WARN);
}
