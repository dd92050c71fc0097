//! The comparison aggregate
//!
//! Holds both registered inputs, the key and value columns, the diff state
//! and the artifact ledger. Summaries are computed once; under
//! `Materialize::None` they are filled on first access and memoized.

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use crate::lifecycle::ArtifactLedger;
use crate::registration::TableHandle;
use crate::strategy::{self, KeySets};
use versus_core::diff::DiffPlans;
use versus_core::errors::{ComparisonError, ExError};
use versus_core::model::{
    ByColumn, IntersectionRow, Summary, TableSummary, UnmatchedColumn, UnmatchedRowCount,
};
use versus_core::plan::Query;
use versus_core::rules::validation;
use versus_core::{log_op_end, log_op_error, log_op_start};
use versus_core::{Materialize, Relation, Side, SideLabels};
use versus_store::Substrate;

pub(crate) type Result<T> = std::result::Result<T, ExError>;

/// Result of comparing two keyed inputs
pub struct Comparison<S: Substrate> {
    pub(crate) id: String,
    pub(crate) substrate: S,
    pub(crate) labels: SideLabels,
    pub(crate) materialize: Materialize,
    pub(crate) handles: [TableHandle; 2],
    pub(crate) by: Vec<String>,
    pub(crate) common: Vec<String>,
    pub(crate) plans: DiffPlans,
    pub(crate) key_sets: KeySets,
    pub(crate) ledger: ArtifactLedger,
    pub(crate) closed: bool,
    pub(crate) tables: Vec<TableSummary>,
    pub(crate) by_summary: Vec<ByColumn>,
    pub(crate) unmatched_cols: Vec<UnmatchedColumn>,
    pub(crate) intersection: OnceCell<Vec<IntersectionRow>>,
    pub(crate) unmatched_rows: OnceCell<Vec<UnmatchedRowCount>>,
    /// Per-column "has any diff" flags, used before the counts are known
    pub(crate) differs: RefCell<HashMap<String, bool>>,
}

impl<S: Substrate> Comparison<S> {
    /// Unique id of this comparison, used in log events
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn labels(&self) -> &SideLabels {
        &self.labels
    }

    pub fn materialize(&self) -> Materialize {
        self.materialize
    }

    pub fn by_columns(&self) -> &[String] {
        &self.by
    }

    /// Value columns: present on both sides, not keys
    pub fn common_columns(&self) -> &[String] {
        &self.common
    }

    pub fn handle(&self, side: Side) -> &TableHandle {
        &self.handles[side.index()]
    }

    pub fn substrate(&self) -> &S {
        &self.substrate
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Names of the temp artifacts currently owned
    pub fn artifact_names(&self) -> Vec<&str> {
        self.ledger.names().collect()
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(ComparisonError::Closed.into())
        } else {
            Ok(())
        }
    }

    /// Run `body` inside start/end boundary events
    pub(crate) fn observe<T>(&self, op: &str, body: impl FnOnce() -> Result<T>) -> Result<T> {
        log_op_start!(op, comparison_id = self.id.as_str());
        let start = Instant::now();
        let result = self.ensure_open().and_then(|()| body()).map_err(|e| {
            log_op_error!(
                op,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                comparison_id = self.id.as_str()
            );
            e.with_op(op)
        })?;
        log_op_end!(
            op,
            duration_ms = start.elapsed().as_millis() as u64,
            comparison_id = self.id.as_str()
        );
        Ok(result)
    }

    // ========== Summaries ==========

    /// One row per side: label, source, row and column counts
    pub fn tables(&self) -> Result<&[TableSummary]> {
        self.ensure_open()?;
        Ok(&self.tables)
    }

    /// Key columns with their declared type on each side
    pub fn by(&self) -> Result<&[ByColumn]> {
        self.ensure_open()?;
        Ok(&self.by_summary)
    }

    /// Columns present on one side only, sorted by side then name
    pub fn unmatched_cols(&self) -> Result<&[UnmatchedColumn]> {
        self.ensure_open()?;
        Ok(&self.unmatched_cols)
    }

    /// One row per value column: diff count and declared types
    pub fn intersection(&self) -> Result<&[IntersectionRow]> {
        self.ensure_open()?;
        if let Some(rows) = self.intersection.get() {
            return Ok(rows);
        }
        let counts = self
            .key_sets
            .diff_counts(&self.substrate, &self.plans, &self.common)?;
        let rows = strategy::intersection_rows(&self.handles, &self.common, &counts);
        tracing::debug!(comparison_id = self.id.as_str(), "intersection computed");
        Ok(self.intersection.get_or_init(|| rows))
    }

    /// Unmatched key count per side, in side order
    pub fn unmatched_rows(&self) -> Result<&[UnmatchedRowCount]> {
        self.ensure_open()?;
        if let Some(rows) = self.unmatched_rows.get() {
            return Ok(rows);
        }
        let counts = self.key_sets.unmatched_counts(&self.substrate, &self.plans)?;
        let rows = strategy::unmatched_row_counts(&self.labels, counts);
        Ok(self.unmatched_rows.get_or_init(|| rows))
    }

    /// Number of keys where `column` differs
    pub fn diff_count(&self, column: &str) -> Result<u64> {
        validation::ensure_common_column(column, &self.common)?;
        Ok(self
            .intersection()?
            .iter()
            .find(|row| row.column == column)
            .map_or(0, |row| row.n_diffs))
    }

    /// Number of keys of the side labelled `side` with no partner
    pub fn unmatched_count(&self, side: &str) -> Result<u64> {
        let side = self.labels.resolve(side)?;
        Ok(self.unmatched_rows()?[side.index()].n_unmatched)
    }

    /// Which kinds of difference exist
    ///
    /// Uses the cached summaries when they exist; otherwise answers with
    /// emptiness checks instead of computing full counts.
    pub fn summary(&self) -> Result<Summary> {
        self.observe("summary", || {
            let value_diffs = match self.intersection.get() {
                Some(rows) => rows.iter().any(|row| row.n_diffs > 0),
                None => self.any_exists(self.key_sets.diff_keys(&self.plans, &self.common))?,
            };
            let unmatched_rows = match self.unmatched_rows.get() {
                Some(rows) => rows.iter().any(|row| row.n_unmatched > 0),
                None => {
                    self.any_exists(self.key_sets.unmatched_keys(&self.plans, Side::A))?
                        || self.any_exists(self.key_sets.unmatched_keys(&self.plans, Side::B))?
                }
            };
            let type_diffs = self.common.iter().any(|c| {
                strategy::declared_type(&self.handles[0], c)
                    != strategy::declared_type(&self.handles[1], c)
            });
            Ok(Summary {
                value_diffs,
                unmatched_cols: !self.unmatched_cols.is_empty(),
                unmatched_rows,
                type_diffs,
            })
        })
    }

    fn any_exists(&self, query: Query) -> Result<bool> {
        self.substrate.exists(&query)
    }

    /// True when `column` has at least one differing key
    pub(crate) fn column_differs(&self, column: &str) -> Result<bool> {
        if let Some(rows) = self.intersection.get() {
            return Ok(rows.iter().any(|row| row.column == column && row.n_diffs > 0));
        }
        if let Some(&known) = self.differs.borrow().get(column) {
            return Ok(known);
        }
        let keys = self
            .key_sets
            .diff_keys(&self.plans, std::slice::from_ref(&column.to_string()));
        let found = self.substrate.exists(&keys)?;
        self.differs.borrow_mut().insert(column.to_string(), found);
        Ok(found)
    }

    /// The subset of `columns` with at least one difference
    pub(crate) fn differing(&self, columns: &[String]) -> Result<Vec<String>> {
        let mut out = Vec::with_capacity(columns.len());
        for column in columns {
            if self.column_differs(column)? {
                out.push(column.clone());
            }
        }
        Ok(out)
    }

    pub(crate) fn run(&self, schema: Vec<versus_core::Field>, query: &Query) -> Result<Relation> {
        let rows = self.substrate.query(query)?;
        Ok(Relation::new(schema, rows))
    }

    // ========== Lifecycle ==========

    /// Release every temp artifact; safe to call any number of times
    ///
    /// Later calls to summaries or projections fail with `Closed`.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        log_op_start!("close", comparison_id = self.id.as_str());
        let start = Instant::now();
        let owned = self.ledger.len();
        let dropped = self.ledger.release(&self.substrate);
        self.closed = true;
        log_op_end!(
            "close",
            duration_ms = start.elapsed().as_millis() as u64,
            comparison_id = self.id.as_str(),
            artifact_count = owned as u64,
            dropped = dropped as u64
        );
    }
}

impl<S: Substrate> Drop for Comparison<S> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<S: Substrate> fmt::Debug for Comparison<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparison")
            .field("id", &self.id)
            .field("labels", &self.labels)
            .field("by", &self.by)
            .field("common", &self.common)
            .field("materialize", &self.materialize)
            .field("persisted_keys", &self.key_sets.is_persisted())
            .field("closed", &self.closed)
            .finish()
    }
}

impl<S: Substrate> fmt::Display for Comparison<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.closed {
            return write!(f, "Comparison (closed)");
        }
        let (a, b) = (self.labels.a(), self.labels.b());
        writeln!(f, "Comparison of `{}` and `{}`", a, b)?;

        writeln!(f, "tables:")?;
        for t in &self.tables {
            writeln!(f, "  {:<12} {:>8} rows {:>4} cols  {}", t.table_name, t.nrow, t.ncol, t.display)?;
        }

        writeln!(f, "by:")?;
        for k in &self.by_summary {
            writeln!(f, "  {:<20} {} / {}", k.column, k.type_a, k.type_b)?;
        }

        writeln!(f, "intersection:")?;
        match self.intersection() {
            Ok(rows) => {
                for row in rows {
                    writeln!(
                        f,
                        "  {:<20} {:>8} diffs  {} / {}",
                        row.column, row.n_diffs, row.type_a, row.type_b
                    )?;
                }
            }
            Err(err) => writeln!(f, "  <unavailable: {}>", err)?,
        }

        writeln!(f, "unmatched_cols:")?;
        for col in &self.unmatched_cols {
            writeln!(f, "  {:<12} {:<20} {}", col.table_name, col.column, col.column_type)?;
        }

        write!(f, "unmatched_rows:")?;
        match self.unmatched_rows() {
            Ok(rows) => {
                for row in rows {
                    write!(f, "\n  {:<12} {:>8}", row.table_name, row.n_unmatched)?;
                }
            }
            Err(err) => write!(f, "\n  <unavailable: {}>", err)?,
        }
        Ok(())
    }
}
