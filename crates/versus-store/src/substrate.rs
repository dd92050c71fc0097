//! Relational substrate
//!
//! The engine talks to SQL only through [`Substrate`]. [`SqliteSubstrate`]
//! implements it on one `rusqlite` connection; every artifact lives in the
//! connection's `temp` schema.

use crate::errors::{engine_error, Result};
use crate::source::Frame;
use crate::value::{from_sql, to_sql};
use rusqlite::Connection;
use versus_core::plan::{quote_ident, render, Expr, Query, Select};
use versus_core::{ColumnType, Field, Value};
use versus_core_types::ArtifactKind;

/// Capabilities the diff engine needs from its host
pub trait Substrate {
    /// Output column names of a SELECT statement, without running it
    fn column_names(&self, sql: &str) -> Result<Vec<String>>;

    /// Create a temp view over a SELECT statement
    fn create_view(&self, name: &str, sql: &str) -> Result<()>;

    /// Create a temp table with the frame's columns and load its rows
    fn load_frame(&self, name: &str, frame: &Frame) -> Result<()>;

    /// Declared column types of a temp view or table, in column order
    fn describe(&self, name: &str) -> Result<Vec<Field>>;

    /// Run a query and collect its rows
    fn query(&self, query: &Query) -> Result<Vec<Vec<Value>>>;

    /// Persist a query result as a temp table
    fn materialize(&self, name: &str, query: &Query) -> Result<()>;

    /// Drop a temp artifact; a missing artifact is not an error
    fn drop_artifact(&self, name: &str, kind: ArtifactKind) -> Result<()>;

    /// Row count of a relation
    fn count(&self, relation: &str) -> Result<u64>;

    /// True if the query yields at least one row
    fn exists(&self, query: &Query) -> Result<bool>;
}

enum Handle<'c> {
    Borrowed(&'c Connection),
    Owned(Connection),
}

/// `Substrate` on a SQLite connection
pub struct SqliteSubstrate<'c> {
    conn: Handle<'c>,
}

impl<'c> SqliteSubstrate<'c> {
    /// Run against a caller-owned connection
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn: Handle::Borrowed(conn),
        }
    }

    pub fn connection(&self) -> &Connection {
        match &self.conn {
            Handle::Borrowed(conn) => conn,
            Handle::Owned(conn) => conn,
        }
    }

    fn execute(&self, op: &str, sql: &str) -> Result<()> {
        tracing::debug!(op, sql, "execute");
        self.connection()
            .execute_batch(sql)
            .map_err(|e| engine_error(op, e))
    }
}

impl SqliteSubstrate<'static> {
    /// Run against a private connection owned by the substrate
    pub fn owned(conn: Connection) -> Self {
        Self {
            conn: Handle::Owned(conn),
        }
    }

    /// Private in-memory connection
    pub fn in_memory() -> Result<Self> {
        Ok(Self::owned(crate::db::open_in_memory()?))
    }
}

impl Substrate for SqliteSubstrate<'_> {
    fn column_names(&self, sql: &str) -> Result<Vec<String>> {
        let stmt = self
            .connection()
            .prepare(sql)
            .map_err(|e| engine_error("column_names", e))?;
        Ok(stmt.column_names().into_iter().map(str::to_string).collect())
    }

    fn create_view(&self, name: &str, sql: &str) -> Result<()> {
        self.execute(
            "create_view",
            &format!("CREATE TEMP VIEW {} AS {}", quote_ident(name), sql),
        )
    }

    fn load_frame(&self, name: &str, frame: &Frame) -> Result<()> {
        self.execute(
            "load_frame",
            &format!(
                "CREATE TEMP TABLE {} ({})",
                quote_ident(name),
                frame.column_defs()
            ),
        )?;
        if frame.is_empty() {
            return Ok(());
        }

        let placeholders = (1..=frame.columns().len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO temp.{} VALUES ({})",
            quote_ident(name),
            placeholders
        );
        let mut stmt = self
            .connection()
            .prepare(&sql)
            .map_err(|e| engine_error("load_frame", e))?;
        for row in frame.rows() {
            stmt.execute(rusqlite::params_from_iter(row.iter().map(to_sql)))
                .map_err(|e| engine_error("load_frame", e))?;
        }
        tracing::debug!(table = name, rows = frame.len(), "frame loaded");
        Ok(())
    }

    fn describe(&self, name: &str) -> Result<Vec<Field>> {
        let mut stmt = self
            .connection()
            .prepare("SELECT name, type FROM pragma_table_info(?1, 'temp') ORDER BY cid")
            .map_err(|e| engine_error("describe", e))?;
        let fields = stmt
            .query_map([name], |row| {
                let column: String = row.get(0)?;
                let declared: String = row.get(1)?;
                Ok(Field::new(column, ColumnType::new(&declared)))
            })
            .map_err(|e| engine_error("describe", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| engine_error("describe", e))?;
        Ok(fields)
    }

    fn query(&self, query: &Query) -> Result<Vec<Vec<Value>>> {
        let sql = render(query);
        tracing::debug!(sql = %sql, "query");
        let mut stmt = self
            .connection()
            .prepare(&sql)
            .map_err(|e| engine_error("query", e))?;
        let width = stmt.column_count();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(from_sql))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .map_err(|e| engine_error("query", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| engine_error("query", e))?;
        Ok(rows)
    }

    fn materialize(&self, name: &str, query: &Query) -> Result<()> {
        self.execute(
            "materialize",
            &format!("CREATE TEMP TABLE {} AS {}", quote_ident(name), render(query)),
        )
    }

    fn drop_artifact(&self, name: &str, kind: ArtifactKind) -> Result<()> {
        let object = match kind {
            ArtifactKind::View => "VIEW",
            ArtifactKind::Table => "TABLE",
        };
        self.execute(
            "drop_artifact",
            &format!("DROP {} IF EXISTS temp.{}", object, quote_ident(name)),
        )
    }

    fn count(&self, relation: &str) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(relation));
        let n: i64 = self
            .connection()
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| engine_error("count", e))?;
        Ok(u64::try_from(n).unwrap_or_default())
    }

    fn exists(&self, query: &Query) -> Result<bool> {
        let wrapped = Select::new().item(Expr::exists(query.clone())).into_query();
        let sql = render(&wrapped);
        tracing::debug!(sql = %sql, "exists");
        let found: i64 = self
            .connection()
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| engine_error("exists", e))?;
        Ok(found != 0)
    }
}
