#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{ints, scenario_conn, schema_of, values, wide_conn, LEVELS};
use versus_engine::{compare, Source};
use versus_core::model::Summary;
use versus_core::{CompareOptions, Value};

fn tables() -> (Source, Source) {
    (Source::table("a"), Source::table("b"))
}

#[test]
fn test_basic_scenario_under_every_level() {
    let conn = scenario_conn();
    for level in LEVELS {
        let (a, b) = tables();
        let cmp = compare(a, b, &["id"], CompareOptions::default().materialize(level), Some(&conn))
            .unwrap();

        let intersection = cmp.intersection().unwrap();
        assert_eq!(intersection.len(), 1);
        assert_eq!(intersection[0].column, "value");
        assert_eq!(intersection[0].n_diffs, 1, "level {}", level);

        let diffs = cmp.value_diffs("value").unwrap();
        assert_eq!(diffs.column_names(), ["id", "value_a", "value_b"]);
        assert_eq!(ints(&diffs, "id"), [2]);
        assert_eq!(ints(&diffs, "value_a"), [20]);
        assert_eq!(ints(&diffs, "value_b"), [22]);

        assert_eq!(ints(&cmp.slice_unmatched("a").unwrap(), "id"), [1]);
        assert_eq!(ints(&cmp.slice_unmatched("b").unwrap(), "id"), [4]);
        assert_eq!(cmp.unmatched_count("a").unwrap(), 1);
        assert_eq!(cmp.diff_count("value").unwrap(), 1);
    }
}

#[test]
fn test_null_policy() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE a (id INTEGER, value INTEGER);
         CREATE TABLE b (id INTEGER, value INTEGER);
         INSERT INTO a VALUES (1, NULL);
         INSERT INTO b VALUES (1, NULL);",
    )
    .unwrap();

    for level in LEVELS {
        let lenient = compare(
            Source::table("a"),
            Source::table("b"),
            &["id"],
            CompareOptions::default().materialize(level),
            Some(&conn),
        )
        .unwrap();
        assert!(lenient.value_diffs("value").unwrap().is_empty());

        let strict = compare(
            Source::table("a"),
            Source::table("b"),
            &["id"],
            CompareOptions::default()
                .allow_both_na(false)
                .materialize(level),
            Some(&conn),
        )
        .unwrap();
        let diffs = strict.value_diffs("value").unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(values(&diffs, "value_a"), [Value::Null]);
    }
}

#[test]
fn test_null_versus_value_differs_under_both_policies() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE a (id INTEGER, value INTEGER);
         CREATE TABLE b (id INTEGER, value INTEGER);
         INSERT INTO a VALUES (1, NULL), (2, 5);
         INSERT INTO b VALUES (1, 3), (2, NULL);",
    )
    .unwrap();
    for allow in [true, false] {
        let cmp = compare(
            Source::table("a"),
            Source::table("b"),
            &["id"],
            CompareOptions::default().allow_both_na(allow),
            Some(&conn),
        )
        .unwrap();
        assert_eq!(ints(&cmp.value_diffs("value").unwrap(), "id"), [1, 2]);
    }
}

#[test]
fn test_summaries_of_wide_pair() {
    let conn = wide_conn();
    let cmp = compare(
        Source::table("a"),
        Source::table("b"),
        &["id"],
        CompareOptions::default(),
        Some(&conn),
    )
    .unwrap();

    let tables = cmp.tables().unwrap();
    assert_eq!(tables[0].table_name, "a");
    assert_eq!(tables[0].display, "a");
    assert_eq!((tables[0].nrow, tables[0].ncol), (4, 5));

    let by = cmp.by().unwrap();
    assert_eq!(by[0].column, "id");
    assert_eq!(by[0].type_a.as_str(), "INTEGER");

    let counts: Vec<_> = cmp
        .intersection()
        .unwrap()
        .iter()
        .map(|r| (r.column.as_str(), r.n_diffs))
        .collect();
    assert_eq!(counts, [("x", 1), ("y", 1), ("z", 2)]);

    let unmatched: Vec<_> = cmp
        .unmatched_cols()
        .unwrap()
        .iter()
        .map(|c| (c.table_name.as_str(), c.column.as_str(), c.column_type.as_str()))
        .collect();
    assert_eq!(unmatched, [("a", "only_a", "TEXT"), ("b", "only_b", "INTEGER")]);

    let rows: Vec<_> = cmp
        .unmatched_rows()
        .unwrap()
        .iter()
        .map(|r| (r.table_name.as_str(), r.n_unmatched))
        .collect();
    assert_eq!(rows, [("a", 1), ("b", 1)]);

    assert_eq!(
        cmp.summary().unwrap(),
        Summary {
            value_diffs: true,
            unmatched_cols: true,
            unmatched_rows: true,
            type_diffs: true,
        }
    );
}

#[test]
fn test_custom_labels_drive_output_names() {
    let conn = scenario_conn();
    let cmp = compare(
        Source::table("a"),
        Source::table("b"),
        &["id"],
        CompareOptions::default().side_labels("old", "new"),
        Some(&conn),
    )
    .unwrap();

    assert_eq!(
        cmp.value_diffs("value").unwrap().column_names(),
        ["id", "value_old", "value_new"]
    );
    assert_eq!(
        cmp.value_diffs_stacked(None).unwrap().column_names(),
        ["column", "val_old", "val_new", "id"]
    );
    assert_eq!(
        cmp.weave_diffs_wide(None, None).unwrap().column_names(),
        ["id", "value_old", "value_new"]
    );
    assert_eq!(ints(&cmp.slice_unmatched("new").unwrap(), "id"), [4]);
    assert_eq!(cmp.unmatched_count("old").unwrap(), 1);
}

#[test]
fn test_stacked_orders_by_column_then_key() {
    let conn = wide_conn();
    let cmp = compare(
        Source::table("a"),
        Source::table("b"),
        &["id"],
        CompareOptions::default(),
        Some(&conn),
    )
    .unwrap();

    let stacked = cmp.value_diffs_stacked(None).unwrap();
    let columns: Vec<_> = values(&stacked, "column");
    assert_eq!(
        columns,
        [Value::from("x"), Value::from("y"), Value::from("z"), Value::from("z")]
    );
    assert_eq!(ints(&stacked, "id"), [2, 3, 1, 2]);
    // mixed declared types are cast to text
    assert_eq!(schema_of(&stacked)[1], ("val_a".to_string(), "TEXT".to_string()));
    assert_eq!(values(&stacked, "val_a")[0], Value::from("2"));

    let only_x = cmp.value_diffs_stacked(Some(&["x"])).unwrap();
    assert_eq!(schema_of(&only_x)[1], ("val_a".to_string(), "INTEGER".to_string()));
    assert_eq!(values(&only_x, "val_b"), [Value::from(9)]);
}

#[test]
fn test_slice_diffs_deduplicates_rows() {
    let conn = wide_conn();
    let cmp = compare(
        Source::table("a"),
        Source::table("b"),
        &["id"],
        CompareOptions::default(),
        Some(&conn),
    )
    .unwrap();

    // id 2 differs on x and z; it appears once
    let slice = cmp.slice_diffs("a", None).unwrap();
    assert_eq!(ints(&slice, "id"), [1, 2, 3]);
    assert_eq!(slice.column_names(), ["id", "x", "y", "z", "only_a"]);

    // same keys as the stacked diffs, deduplicated
    let mut stacked_ids = ints(&cmp.value_diffs_stacked(None).unwrap(), "id");
    stacked_ids.sort_unstable();
    stacked_ids.dedup();
    assert_eq!(ints(&slice, "id"), stacked_ids);

    let slice_b = cmp.slice_diffs("b", Some(&["y"])).unwrap();
    assert_eq!(ints(&slice_b, "id"), [3]);
    assert_eq!(values(&slice_b, "y"), [Value::from("R")]);
}

#[test]
fn test_unmatched_both_tags_rows() {
    let conn = wide_conn();
    let cmp = compare(
        Source::table("a"),
        Source::table("b"),
        &["id"],
        CompareOptions::default(),
        Some(&conn),
    )
    .unwrap();

    let both = cmp.slice_unmatched_both().unwrap();
    assert_eq!(both.column_names(), ["table_name", "id", "x", "y", "z"]);
    assert_eq!(values(&both, "table_name"), [Value::from("a"), Value::from("b")]);
    assert_eq!(ints(&both, "id"), [5, 6]);

    let mut per_side = ints(&cmp.slice_unmatched("a").unwrap(), "id");
    per_side.extend(ints(&cmp.slice_unmatched("b").unwrap(), "id"));
    assert_eq!(per_side, ints(&both, "id"));
}

#[test]
fn test_weaves_round_trip() {
    let conn = wide_conn();
    let cmp = compare(
        Source::table("a"),
        Source::table("b"),
        &["id"],
        CompareOptions::default(),
        Some(&conn),
    )
    .unwrap();

    let wide = cmp.weave_diffs_wide(Some(&["x", "y"]), None).unwrap();
    assert_eq!(wide.column_names(), ["id", "x_a", "x_b", "y_a", "y_b", "z"]);
    assert_eq!(ints(&wide, "id"), [2, 3]);

    let long = cmp.weave_diffs_long(Some(&["x", "y"])).unwrap();
    assert_eq!(long.column_names(), ["table_name", "id", "x", "y", "z"]);
    assert_eq!(ints(&long, "id"), [2, 2, 3, 3]);
    assert_eq!(
        values(&long, "table_name"),
        [Value::from("a"), Value::from("b"), Value::from("a"), Value::from("b")]
    );

    // each wide pair equals the matching long rows
    for (i, id) in ints(&wide, "id").into_iter().enumerate() {
        for column in ["x", "y"] {
            let long_rows: Vec<usize> = ints(&long, "id")
                .iter()
                .enumerate()
                .filter(|(_, k)| **k == id)
                .map(|(j, _)| j)
                .collect();
            let long_values = values(&long, column);
            assert_eq!(values(&wide, &format!("{}_a", column))[i], long_values[long_rows[0]]);
            assert_eq!(values(&wide, &format!("{}_b", column))[i], long_values[long_rows[1]]);
        }
    }
}

#[test]
fn test_wide_weave_custom_suffix() {
    let conn = scenario_conn();
    let cmp = compare(
        Source::table("a"),
        Source::table("b"),
        &["id"],
        CompareOptions::default(),
        Some(&conn),
    )
    .unwrap();
    let wide = cmp.weave_diffs_wide(None, Some(("_before", "_after"))).unwrap();
    assert_eq!(wide.column_names(), ["id", "value_before", "value_after"]);
}

#[test]
fn test_composite_key_and_query_sources() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE sales (region TEXT, year INTEGER, amount REAL);
         INSERT INTO sales VALUES ('n', 2020, 1.0), ('n', 2021, 2.0), ('s', 2020, 3.0);",
    )
    .unwrap();
    let cmp = compare(
        Source::parse("SELECT * FROM sales"),
        Source::parse("SELECT region, year, CASE WHEN year = 2021 THEN 2.5 ELSE amount END AS amount FROM sales"),
        &["region", "year"],
        CompareOptions::default(),
        Some(&conn),
    )
    .unwrap();
    let diffs = cmp.value_diffs("amount").unwrap();
    assert_eq!(values(&diffs, "region"), [Value::from("n")]);
    assert_eq!(ints(&diffs, "year"), [2021]);
    assert_eq!(values(&diffs, "amount_b"), [Value::Real(2.5)]);
}

#[test]
fn test_frames_on_private_connection() {
    use versus_engine::Frame;
    let a = Frame::new(&[("id", "INTEGER"), ("v", "TEXT")])
        .row([Value::from(1), Value::from("x")])
        .row([Value::from(2), Value::from("y")]);
    let b = Frame::new(&[("id", "INTEGER"), ("v", "TEXT")])
        .row([Value::from(1), Value::from("x")])
        .row([Value::from(2), Value::from("z")]);
    let cmp = compare(a.into(), b.into(), &["id"], CompareOptions::default(), None).unwrap();

    assert_eq!(cmp.tables().unwrap()[0].nrow, 2);
    assert_eq!(ints(&cmp.value_diffs("v").unwrap(), "id"), [2]);
    assert!(cmp.tables().unwrap()[0].display.starts_with("frame"));
}

#[test]
fn test_display_lists_summaries() {
    let conn = scenario_conn();
    let cmp = compare(
        Source::table("a"),
        Source::table("b"),
        &["id"],
        CompareOptions::default(),
        Some(&conn),
    )
    .unwrap();
    let text = cmp.to_string();
    assert!(text.starts_with("Comparison of `a` and `b`"));
    assert!(text.contains("intersection:"));
    assert!(text.contains("value"));
    assert!(text.contains("unmatched_rows:"));
}
