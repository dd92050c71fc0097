use rusqlite::Connection;
use versus_core::{Materialize, Relation, Value};

pub const LEVELS: [Materialize; 3] = [Materialize::All, Materialize::Summary, Materialize::None];

/// A:(1,10),(2,20),(3,30)  B:(2,22),(3,30),(4,40), keyed on `id`
#[allow(dead_code)]
pub fn scenario_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE a (id INTEGER, value INTEGER);
         CREATE TABLE b (id INTEGER, value INTEGER);
         INSERT INTO a VALUES (1, 10), (2, 20), (3, 30);
         INSERT INTO b VALUES (2, 22), (3, 30), (4, 40);",
    )
    .unwrap();
    conn
}

/// Wider pair: shared `x` (INTEGER), `y` (TEXT), `z` (REAL on a, TEXT on b)
/// plus one unmatched column per side
#[allow(dead_code)]
pub fn wide_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE a (id INTEGER, x INTEGER, y TEXT, z REAL, only_a TEXT);
         CREATE TABLE b (id INTEGER, x INTEGER, y TEXT, z TEXT, only_b INTEGER);
         INSERT INTO a VALUES (1, 1, 'p', 1.5, 'u'), (2, 2, 'q', 2.5, 'v'),
                              (3, 3, 'r', NULL, 'w'), (5, 5, 's', 5.0, 'x');
         INSERT INTO b VALUES (1, 1, 'p', 'low', 7), (2, 9, 'q', 'mid', 8),
                              (3, 3, 'R', NULL, 9), (6, 6, 't', 'top', 10);",
    )
    .unwrap();
    conn
}

/// Count of objects in the connection's temp schema
#[allow(dead_code)]
pub fn temp_objects(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM sqlite_temp_master", [], |r| r.get(0))
        .unwrap()
}

#[allow(dead_code)]
pub fn ints(rel: &Relation, column: &str) -> Vec<i64> {
    rel.column(column)
        .unwrap()
        .into_iter()
        .map(|v| v.as_i64().unwrap())
        .collect()
}

#[allow(dead_code)]
pub fn values(rel: &Relation, column: &str) -> Vec<Value> {
    rel.column(column).unwrap().into_iter().cloned().collect()
}

#[allow(dead_code)]
pub fn schema_of(rel: &Relation) -> Vec<(String, String)> {
    rel.schema()
        .iter()
        .map(|f| (f.name.clone(), f.column_type.to_string()))
        .collect()
}
