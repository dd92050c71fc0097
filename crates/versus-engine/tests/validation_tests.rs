#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{scenario_conn, temp_objects, wide_conn};
use rusqlite::Connection;
use versus_core::{CompareOptions, ExErrorKind};
use versus_engine::{compare, Frame, Source};

fn dup_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE a (id INTEGER, value INTEGER);
         CREATE TABLE b (id INTEGER, value INTEGER);
         INSERT INTO a VALUES (1, 10), (1, 11), (2, 20);
         INSERT INTO b VALUES (1, 10), (2, 20);",
    )
    .unwrap();
    conn
}

#[test]
fn test_duplicate_key_reports_sample_and_leaves_nothing_behind() {
    let conn = dup_conn();
    let err = compare(
        Source::table("a"),
        Source::table("b"),
        &["id"],
        CompareOptions::default(),
        Some(&conn),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::DuplicateKey);
    assert_eq!(err.side(), Some("a"));
    assert_eq!(err.message(), "`a` has more than one row for by values (id=1)");
    assert_eq!(temp_objects(&conn), 0);
}

#[test]
fn test_duplicate_key_on_side_b_uses_its_label() {
    let conn = dup_conn();
    let err = compare(
        Source::table("b"),
        Source::table("a"),
        &["id"],
        CompareOptions::default().side_labels("left", "right"),
        Some(&conn),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::DuplicateKey);
    assert!(err.message().starts_with("`right` has more than one row"));
}

#[test]
fn test_missing_by_column() {
    let conn = scenario_conn();
    let err = compare(
        Source::table("a"),
        Source::table("b"),
        &["id", "nope"],
        CompareOptions::default(),
        Some(&conn),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::MissingColumn);
    assert_eq!(err.column(), Some("nope"));
    assert_eq!(err.message(), "`by` columns not found in `a`: nope");
    assert_eq!(temp_objects(&conn), 0);
}

#[test]
fn test_malformed_by_lists() {
    let conn = scenario_conn();
    for by in [vec![], vec!["id", "id"], vec![" "]] {
        let err = compare(
            Source::table("a"),
            Source::table("b"),
            by.as_slice(),
            CompareOptions::default(),
            Some(&conn),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidArgument, "by = {:?}", by);
    }
}

#[test]
fn test_type_mismatch_only_without_coercion() {
    let conn = wide_conn();
    let err = compare(
        Source::table("a"),
        Source::table("b"),
        &["id"],
        CompareOptions::default().coerce(false),
        Some(&conn),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::TypeMismatch);
    assert_eq!(err.column(), Some("z"));
    assert!(err.message().contains("`REAL` vs `TEXT`"));
    assert_eq!(temp_objects(&conn), 0);

    assert!(compare(
        Source::table("a"),
        Source::table("b"),
        &["id"],
        CompareOptions::default(),
        Some(&conn),
    )
    .is_ok());
}

#[test]
fn test_duplicate_column_names_in_query_source() {
    let conn = scenario_conn();
    let err = compare(
        Source::query("SELECT id, value, value FROM a"),
        Source::table("b"),
        &["id"],
        CompareOptions::default(),
        Some(&conn),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::DuplicateColumn);
    assert_eq!(err.side(), Some("a"));
    assert_eq!(temp_objects(&conn), 0);
}

#[test]
fn test_invalid_side_labels() {
    let conn = scenario_conn();
    for (a, b) in [("x", "x"), ("", "b"), ("a", "  ")] {
        let err = compare(
            Source::table("a"),
            Source::table("b"),
            &["id"],
            CompareOptions::default().side_labels(a, b),
            Some(&conn),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidArgument);
    }
}

#[test]
fn test_missing_source_is_engine_error_and_rolls_back() {
    let conn = scenario_conn();
    let frame = Frame::new(&[("id", "INTEGER"), ("value", "INTEGER")]);
    let err = compare(
        frame.into(),
        Source::table("does_not_exist"),
        &["id"],
        CompareOptions::default(),
        Some(&conn),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Engine);
    assert_eq!(temp_objects(&conn), 0);
}

#[test]
fn test_ragged_frame_is_rejected() {
    let mut frame = Frame::new(&[("id", "INTEGER"), ("value", "INTEGER")]);
    frame.push_row(vec![1.into()]);
    let err = compare(
        frame.into(),
        Frame::new(&[("id", "INTEGER")]).into(),
        &["id"],
        CompareOptions::default(),
        None,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidArgument);
}

#[test]
fn test_projection_argument_errors() {
    let conn = scenario_conn();
    let cmp = compare(
        Source::table("a"),
        Source::table("b"),
        &["id"],
        CompareOptions::default(),
        Some(&conn),
    )
    .unwrap();

    let err = cmp.slice_unmatched("c").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::UnknownSide);
    assert_eq!(err.op(), Some("slice_unmatched"));
    assert!(err.message().contains("`table` must be one of: a, b"));

    let err = cmp.slice_diffs("c", None).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::UnknownSide);

    let err = cmp.value_diffs("nope").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::UnknownColumn);
    assert_eq!(err.op(), Some("value_diffs"));

    // key columns are not comparable
    let err = cmp.value_diffs("id").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::UnknownColumn);

    let err = cmp.value_diffs_stacked(Some(&["value", "nope"])).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::UnknownColumn);
    assert_eq!(err.column(), Some("nope"));

    let err = cmp.weave_diffs_long(Some(&[])).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidArgument);

    let err = cmp.weave_diffs_wide(Some(&["value", "value"]), None).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidArgument);

    let err = cmp.weave_diffs_wide(None, Some(("_x", "_x"))).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidArgument);

    let err = cmp.weave_diffs_wide(None, Some(("", "_b"))).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidArgument);

    let err = cmp.diff_count("nope").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::UnknownColumn);

    let err = cmp.unmatched_count("c").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::UnknownSide);
}
