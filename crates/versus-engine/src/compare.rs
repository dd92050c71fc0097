//! Comparison construction
//!
//! ## Pipeline (in order):
//! 1. Validate side labels and key columns
//! 2. Register both inputs (temp views, schemas, row counts)
//! 3. Key existence, type compatibility and key uniqueness checks
//! 4. Summaries that need no diff state (tables, by, unmatched columns)
//! 5. Diff state at the requested materialization level
//!
//! Construction is atomic: if any step fails, every artifact created so far
//! is dropped before the error is returned.

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::time::Instant;

use rusqlite::Connection;
use uuid::Uuid;

use crate::comparison::{Comparison, Result};
use crate::lifecycle::ArtifactLedger;
use crate::registration::{self, TableHandle};
use crate::strategy::{self, KeySets};
use versus_core::diff::DiffPlans;
use versus_core::model::{
    ByColumn, IntersectionRow, TableSummary, UnmatchedColumn, UnmatchedRowCount,
};
use versus_core::rules::validation;
use versus_core::{log_op_end, log_op_error, log_op_start};
use versus_core::{CompareOptions, Side, SideLabels};
use versus_store::{Source, SqliteSubstrate, Substrate};

/// Compare two inputs on a SQLite connection
///
/// With `connection = None` a private in-memory connection is opened and
/// owned by the comparison; only query and frame sources make sense there.
///
/// ## Errors
///
/// - `InvalidArgument`: malformed `by` or side labels
/// - `DuplicateColumn`, `MissingColumn`, `TypeMismatch`, `DuplicateKey`:
///   the inputs cannot be compared
/// - `Engine`: SQLite rejected a statement
pub fn compare<'c, K: AsRef<str>>(
    a: Source,
    b: Source,
    by: &[K],
    options: CompareOptions,
    connection: Option<&'c Connection>,
) -> Result<Comparison<SqliteSubstrate<'c>>> {
    let substrate = match connection {
        Some(conn) => SqliteSubstrate::new(conn),
        None => SqliteSubstrate::in_memory()?,
    };
    compare_with(substrate, a, b, by, options)
}

/// Compare two inputs on any substrate
pub fn compare_with<S: Substrate, K: AsRef<str>>(
    substrate: S,
    a: Source,
    b: Source,
    by: &[K],
    options: CompareOptions,
) -> Result<Comparison<S>> {
    log_op_start!("compare", materialize = options.materialize.as_str());
    let start = Instant::now();

    let result = compare_impl(substrate, &a, &b, by, &options).map_err(|e| {
        log_op_error!(
            "compare",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "compare",
        duration_ms = start.elapsed().as_millis() as u64,
        comparison_id = result.id(),
        artifact_count = result.artifact_names().len() as u64
    );
    Ok(result)
}

/// Everything computed during construction, before the aggregate exists
struct Built {
    handles: [TableHandle; 2],
    by: Vec<String>,
    common: Vec<String>,
    plans: DiffPlans,
    key_sets: KeySets,
    tables: Vec<TableSummary>,
    by_summary: Vec<ByColumn>,
    unmatched_cols: Vec<UnmatchedColumn>,
    intersection: OnceCell<Vec<IntersectionRow>>,
    unmatched_rows: OnceCell<Vec<UnmatchedRowCount>>,
}

fn compare_impl<S: Substrate, K: AsRef<str>>(
    substrate: S,
    a: &Source,
    b: &Source,
    by: &[K],
    options: &CompareOptions,
) -> Result<Comparison<S>> {
    let labels = options.labels()?;
    let by = validation::normalize_column_list("by", by)?;

    let mut ledger = ArtifactLedger::new();
    let built = match build(&substrate, &mut ledger, &labels, a, b, by, options) {
        Ok(built) => built,
        Err(err) => {
            let dropped = ledger.release(&substrate);
            tracing::debug!(dropped, "construction failed, artifacts released");
            return Err(err);
        }
    };

    Ok(Comparison {
        id: Uuid::now_v7().to_string(),
        substrate,
        labels,
        materialize: options.materialize,
        handles: built.handles,
        by: built.by,
        common: built.common,
        plans: built.plans,
        key_sets: built.key_sets,
        ledger,
        closed: false,
        tables: built.tables,
        by_summary: built.by_summary,
        unmatched_cols: built.unmatched_cols,
        intersection: built.intersection,
        unmatched_rows: built.unmatched_rows,
        differs: RefCell::new(HashMap::new()),
    })
}

fn build<S: Substrate>(
    substrate: &S,
    ledger: &mut ArtifactLedger,
    labels: &SideLabels,
    a: &Source,
    b: &Source,
    by: Vec<String>,
    options: &CompareOptions,
) -> Result<Built> {
    let handle_a = registration::register(substrate, ledger, labels.a(), a)?;
    let handle_b = registration::register(substrate, ledger, labels.b(), b)?;
    let handles = [handle_a, handle_b];

    let plans = DiffPlans::new(
        handles[0].view.as_str(),
        handles[1].view.as_str(),
        by.clone(),
        options.allow_both_na,
    );
    registration::validate_inputs(substrate, &handles, labels, &by, options.coerce, &plans)?;

    let common = validation::common_columns(&handles[0].schema, &handles[1].schema, &by);
    let tables = Side::BOTH
        .iter()
        .map(|&side| {
            let h = &handles[side.index()];
            TableSummary {
                table_name: h.label.clone(),
                display: h.display.clone(),
                nrow: h.nrow,
                ncol: h.schema.len(),
            }
        })
        .collect();
    let by_summary = by
        .iter()
        .map(|column| ByColumn {
            column: column.clone(),
            type_a: strategy::declared_type(&handles[0], column),
            type_b: strategy::declared_type(&handles[1], column),
        })
        .collect();
    let unmatched_cols = Side::BOTH
        .iter()
        .flat_map(|&side| {
            let own = &handles[side.index()];
            let other = &handles[side.other().index()];
            validation::columns_only_in(&own.schema, &other.schema)
                .into_iter()
                .map(move |column| UnmatchedColumn {
                    table_name: own.label.clone(),
                    column_type: strategy::declared_type(own, &column),
                    column,
                })
        })
        .collect();

    let key_sets = if options.materialize.persists_key_sets() {
        KeySets::persist(substrate, ledger, &plans, &common)?
    } else {
        KeySets::Inline
    };

    let intersection = OnceCell::new();
    let unmatched_rows = OnceCell::new();
    if options.materialize.persists_summaries() {
        let counts = key_sets.diff_counts(substrate, &plans, &common)?;
        let rows = strategy::intersection_rows(&handles, &common, &counts);
        let unmatched = strategy::unmatched_row_counts(
            labels,
            key_sets.unmatched_counts(substrate, &plans)?,
        );
        strategy::persist_summaries(substrate, ledger, labels, &rows, &unmatched)?;
        let _ = intersection.set(rows);
        let _ = unmatched_rows.set(unmatched);
    }

    Ok(Built {
        handles,
        by,
        common,
        plans,
        key_sets,
        tables,
        by_summary,
        unmatched_cols,
        intersection,
        unmatched_rows,
    })
}
