//! Diff computation strategies
//!
//! Projections ask one question, "which keys differ on these columns" (or
//! "which keys of this side are unmatched"), and get back a query. Whether
//! that query scans a persisted key-set table or recomputes the predicate
//! inline depends on the materialization level, never on the caller.

use std::collections::HashMap;

use crate::lifecycle::ArtifactLedger;
use crate::registration::TableHandle;
use versus_core::diff::DiffPlans;
use versus_core::errors::{ExError, ExErrorKind};
use versus_core::model::{IntersectionRow, UnmatchedRowCount};
use versus_core::plan::{Expr, FromItem, Query, Select};
use versus_core::{ColumnType, Side, SideLabels, Value};
use versus_core_types::{ArtifactKind, ArtifactName};
use versus_store::Substrate;

type Result<T> = std::result::Result<T, ExError>;

/// Where key sets come from
#[derive(Debug)]
pub enum KeySets {
    /// One temp table per value column and per side
    Persisted {
        diff: HashMap<String, ArtifactName>,
        unmatched: [ArtifactName; 2],
    },
    /// Predicates recomputed in every query
    Inline,
}

impl KeySets {
    /// Persist every per-column diff key set and both unmatched key sets
    pub fn persist<S: Substrate + ?Sized>(
        substrate: &S,
        ledger: &mut ArtifactLedger,
        plans: &DiffPlans,
        common: &[String],
    ) -> Result<Self> {
        let mut diff = HashMap::with_capacity(common.len());
        for (i, column) in common.iter().enumerate() {
            let table = ArtifactName::generate(&format!("diff_{}", i));
            ledger.record(table.clone(), ArtifactKind::Table);
            substrate.materialize(table.as_str(), &plans.diff_keys_query(std::slice::from_ref(column)))?;
            diff.insert(column.clone(), table);
        }

        let mut persist_unmatched = |side: Side| -> Result<ArtifactName> {
            let table = ArtifactName::generate(&format!("unmatched_{}", plans.alias(side)));
            ledger.record(table.clone(), ArtifactKind::Table);
            substrate.materialize(table.as_str(), &plans.unmatched_keys_query(side))?;
            Ok(table)
        };
        let unmatched = [persist_unmatched(Side::A)?, persist_unmatched(Side::B)?];

        Ok(KeySets::Persisted { diff, unmatched })
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, KeySets::Persisted { .. })
    }

    /// Keys where any of `columns` differs
    pub fn diff_keys(&self, plans: &DiffPlans, columns: &[String]) -> Query {
        if let KeySets::Persisted { diff, .. } = self {
            let parts: Vec<Query> = columns
                .iter()
                .filter_map(|c| diff.get(c))
                .map(|table| plans.key_table_query(table.as_str()))
                .collect();
            if !parts.is_empty() {
                return plans.union_keys(parts);
            }
        }
        plans.diff_keys_query(columns)
    }

    /// Keys of `side` with no partner
    pub fn unmatched_keys(&self, plans: &DiffPlans, side: Side) -> Query {
        match self {
            KeySets::Persisted { unmatched, .. } => {
                plans.key_table_query(unmatched[side.index()].as_str())
            }
            KeySets::Inline => plans.unmatched_keys_query(side),
        }
    }

    /// Diff count per column, in `common` order
    pub fn diff_counts<S: Substrate + ?Sized>(
        &self,
        substrate: &S,
        plans: &DiffPlans,
        common: &[String],
    ) -> Result<Vec<u64>> {
        match self {
            KeySets::Persisted { diff, .. } => common
                .iter()
                .map(|c| match diff.get(c) {
                    Some(table) => substrate.count(table.as_str()),
                    None => Ok(0),
                })
                .collect(),
            KeySets::Inline => single_pass_counts(substrate, plans, common),
        }
    }

    /// Unmatched key count per side, in side order
    pub fn unmatched_counts<S: Substrate + ?Sized>(
        &self,
        substrate: &S,
        plans: &DiffPlans,
    ) -> Result<[u64; 2]> {
        let count = |side: Side| match self {
            KeySets::Persisted { unmatched, .. } => substrate.count(unmatched[side.index()].as_str()),
            KeySets::Inline => count_rows(substrate, plans.unmatched_keys_query(side)),
        };
        Ok([count(Side::A)?, count(Side::B)?])
    }
}

/// All diff counts from one scan of the joined inputs
fn single_pass_counts<S: Substrate + ?Sized>(
    substrate: &S,
    plans: &DiffPlans,
    common: &[String],
) -> Result<Vec<u64>> {
    if common.is_empty() {
        return Ok(Vec::new());
    }
    let row = substrate
        .query(&plans.diff_counts_query(common))?
        .into_iter()
        .next()
        .ok_or_else(|| internal("diff counts returned no row"))?;
    row.iter().map(as_count).collect()
}

/// Number of rows a query yields
pub fn count_rows<S: Substrate + ?Sized>(substrate: &S, query: Query) -> Result<u64> {
    let counted = Select::new()
        .item(Expr::CountStar)
        .from(FromItem::subquery(query, "counted"))
        .into_query();
    let value = substrate
        .query(&counted)?
        .into_iter()
        .next()
        .and_then(|row| row.into_iter().next())
        .ok_or_else(|| internal("count returned no row"))?;
    as_count(&value)
}

fn as_count(value: &Value) -> Result<u64> {
    value
        .as_i64()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| internal(&format!("expected a count, got {}", value)))
}

fn internal(message: &str) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op("diff_counts")
        .with_message(message)
}

pub fn intersection_rows(
    handles: &[TableHandle; 2],
    common: &[String],
    counts: &[u64],
) -> Vec<IntersectionRow> {
    common
        .iter()
        .zip(counts)
        .map(|(column, &n_diffs)| IntersectionRow {
            column: column.clone(),
            n_diffs,
            type_a: declared_type(&handles[0], column),
            type_b: declared_type(&handles[1], column),
        })
        .collect()
}

pub fn unmatched_row_counts(labels: &SideLabels, counts: [u64; 2]) -> Vec<UnmatchedRowCount> {
    Side::BOTH
        .iter()
        .map(|&side| UnmatchedRowCount {
            table_name: labels.label(side).to_string(),
            n_unmatched: counts[side.index()],
        })
        .collect()
}

pub fn declared_type(handle: &TableHandle, column: &str) -> ColumnType {
    handle
        .schema
        .column_type(column)
        .cloned()
        .unwrap_or_else(ColumnType::any)
}

/// Persist the intersection and unmatched-rows summaries as temp tables
pub fn persist_summaries<S: Substrate + ?Sized>(
    substrate: &S,
    ledger: &mut ArtifactLedger,
    labels: &SideLabels,
    intersection: &[IntersectionRow],
    unmatched: &[UnmatchedRowCount],
) -> Result<()> {
    let type_a = format!("type_{}", labels.a());
    let type_b = format!("type_{}", labels.b());
    let rows = intersection
        .iter()
        .map(|row| {
            vec![
                Value::from(row.column.as_str()),
                Value::Integer(count_value(row.n_diffs)),
                Value::from(row.type_a.as_str()),
                Value::from(row.type_b.as_str()),
            ]
        })
        .collect();
    let table = ArtifactName::generate("intersection");
    ledger.record(table.clone(), ArtifactKind::Table);
    substrate.materialize(
        table.as_str(),
        &DiffPlans::literal_rows(&["column", "n_diffs", &type_a, &type_b], rows),
    )?;

    let rows = unmatched
        .iter()
        .map(|row| {
            vec![
                Value::from(row.table_name.as_str()),
                Value::Integer(count_value(row.n_unmatched)),
            ]
        })
        .collect();
    let table = ArtifactName::generate("unmatched_rows");
    ledger.record(table.clone(), ArtifactKind::Table);
    substrate.materialize(
        table.as_str(),
        &DiffPlans::literal_rows(&["table_name", "n_unmatched"], rows),
    )?;
    Ok(())
}

fn count_value(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
