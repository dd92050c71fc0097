#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::scenario_conn;
use rusqlite::Connection;
use versus_core::logging_facility::test_capture::init_test_capture;
use versus_core::{CompareOptions, Materialize};
use versus_core_types::schema::{
    EVENT_ARTIFACT_DROPPED, EVENT_ARTIFACT_RECORDED, EVENT_END, EVENT_END_ERROR, EVENT_START,
    FIELD_ARTIFACT, FIELD_ARTIFACT_COUNT, FIELD_DROPPED, FIELD_ERR_CODE, FIELD_ERR_COLUMN,
    FIELD_ERR_SIDE, FIELD_EVENT, FIELD_MATERIALIZE,
};
use versus_engine::{compare, Comparison, Source, SqliteSubstrate};

fn open(conn: &Connection, level: Materialize) -> Comparison<SqliteSubstrate<'_>> {
    compare(
        Source::table("a"),
        Source::table("b"),
        &["id"],
        CompareOptions::default().materialize(level),
        Some(conn),
    )
    .unwrap()
}

#[test]
fn test_compare_and_close_emit_boundary_events() {
    let capture = init_test_capture();
    let conn = scenario_conn();
    let mut cmp = open(&conn, Materialize::All);
    let id = cmp.id().to_string();

    capture.assert_event_exists("compare", EVENT_START);
    let compare_end = capture
        .events_for(&id)
        .into_iter()
        .find(|e| e.is("compare", EVENT_END))
        .expect("compare end event");
    assert_eq!(compare_end.field(FIELD_ARTIFACT_COUNT), Some("7"));

    cmp.close();
    let close_end = capture
        .events_for(&id)
        .into_iter()
        .find(|e| e.is("close", EVENT_END))
        .expect("close end event");
    assert_eq!(close_end.field(FIELD_ARTIFACT_COUNT), Some("7"));
    assert_eq!(close_end.field(FIELD_DROPPED), Some("7"));

    // a second close emits nothing
    cmp.close();
    let closes = capture
        .events_for(&id)
        .iter()
        .filter(|e| e.op.as_deref() == Some("close"))
        .count();
    assert_eq!(closes, 2);
}

#[test]
fn test_every_artifact_is_recorded_then_dropped() {
    let capture = init_test_capture();
    let conn = scenario_conn();
    let cmp = open(&conn, Materialize::Summary);
    let names: Vec<String> = cmp.artifact_names().into_iter().map(str::to_string).collect();
    assert_eq!(names.len(), 4);
    drop(cmp);

    let events = capture.artifact_events(&names);
    let count = |event: &str| {
        events
            .iter()
            .filter(|e| e.field(FIELD_EVENT) == Some(event))
            .count()
    };
    assert_eq!(count(EVENT_ARTIFACT_RECORDED), 4);
    assert_eq!(count(EVENT_ARTIFACT_DROPPED), 4);

    // dropped newest first
    let dropped: Vec<&str> = events
        .iter()
        .filter(|e| e.field(FIELD_EVENT) == Some(EVENT_ARTIFACT_DROPPED))
        .filter_map(|e| e.field(FIELD_ARTIFACT))
        .collect();
    let mut newest_first: Vec<&str> = names.iter().map(String::as_str).collect();
    newest_first.reverse();
    assert_eq!(dropped, newest_first);
}

#[test]
fn test_projection_events_carry_comparison_id() {
    let capture = init_test_capture();
    let conn = scenario_conn();
    let cmp = open(&conn, Materialize::All);
    let id = cmp.id().to_string();

    cmp.value_diffs("value").unwrap();
    let _ = cmp.value_diffs("nope");

    let events = capture.events_for(&id);
    let count = |event: &str| events.iter().filter(|e| e.is("value_diffs", event)).count();
    assert_eq!(count(EVENT_START), 2);
    assert_eq!(count(EVENT_END), 1);
    assert_eq!(count(EVENT_END_ERROR), 1);

    let error = events
        .iter()
        .find(|e| e.is("value_diffs", EVENT_END_ERROR))
        .expect("error event");
    assert_eq!(error.field(FIELD_ERR_CODE), Some("ERR_UNKNOWN_COLUMN"));
    assert_eq!(error.field(FIELD_ERR_COLUMN), Some("nope"));
}

#[test]
fn test_failed_compare_logs_error_context() {
    let capture = init_test_capture();
    let conn = scenario_conn();
    let result = compare(
        Source::table("a"),
        Source::table("b"),
        &["missing_key"],
        CompareOptions::default().materialize(Materialize::None),
        Some(&conn),
    );
    assert!(result.is_err());

    let found = capture.count_events(|e| {
        e.is("compare", EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("ERR_MISSING_COLUMN")
            && e.field(FIELD_ERR_COLUMN) == Some("missing_key")
            && e.field(FIELD_ERR_SIDE) == Some("a")
    });
    assert!(found >= 1);

    let starts = capture.count_events(|e| {
        e.is("compare", EVENT_START) && e.field(FIELD_MATERIALIZE) == Some("none")
    });
    assert!(starts >= 1);
}
