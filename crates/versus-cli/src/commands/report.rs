//! Report subcommands

use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value as Json};
use versus_core::rules::validation;
use versus_core::{Relation, SideLabels};
use versus_engine::{Comparison, SqliteSubstrate};

#[derive(Debug, Subcommand)]
pub enum Report {
    /// Which kinds of difference exist
    Summary,
    /// Row and column counts per side
    Tables,
    /// Key columns and their declared types
    By,
    /// Diff count per value column
    Intersection,
    /// Columns present on one side only
    UnmatchedCols,
    /// Unmatched key count per side
    UnmatchedRows,
    /// Keys where one column differs, with both values
    ValueDiffs {
        #[arg(required = true)]
        column: Vec<String>,
    },
    /// Value diffs of several columns stacked
    Stacked(Selection),
    /// Rows of one side whose key differs on any selected column
    SliceDiffs {
        side: String,
        #[command(flatten)]
        selection: Selection,
    },
    /// Rows of one side with no partner
    SliceUnmatched { side: String },
    /// Unmatched rows of both sides, tagged by side
    UnmatchedBoth,
    /// Differing rows, one row per key with split columns
    WeaveWide {
        #[command(flatten)]
        selection: Selection,
        #[arg(long, num_args = 2, value_names = ["SUFFIX_A", "SUFFIX_B"])]
        suffix: Option<Vec<String>>,
    },
    /// Differing rows, two tagged rows per key
    WeaveLong(Selection),
}

#[derive(Debug, Args)]
pub struct Selection {
    /// Restrict to these value columns; repeatable
    #[arg(long = "column")]
    pub columns: Vec<String>,
}

impl Selection {
    fn as_option(&self) -> Option<Vec<&str>> {
        if self.columns.is_empty() {
            None
        } else {
            Some(self.columns.iter().map(String::as_str).collect())
        }
    }
}

type Outcome = Result<Json, Box<dyn std::error::Error>>;

pub fn render(cmp: &Comparison<SqliteSubstrate<'_>>, report: Report) -> Outcome {
    let labels = cmp.labels();
    match report {
        Report::Summary => json(&cmp.summary()?),
        Report::Tables => json(cmp.tables()?),
        Report::By => Ok(relabel_types(json(cmp.by()?)?, labels)),
        Report::Intersection => Ok(relabel_types(json(cmp.intersection()?)?, labels)),
        Report::UnmatchedCols => json(cmp.unmatched_cols()?),
        Report::UnmatchedRows => json(cmp.unmatched_rows()?),
        Report::ValueDiffs { column } => {
            let column = validation::single_column("value_diffs", &column)?;
            records(cmp.value_diffs(column)?)
        }
        Report::Stacked(selection) => {
            records(cmp.value_diffs_stacked(selection.as_option().as_deref())?)
        }
        Report::SliceDiffs { side, selection } => {
            records(cmp.slice_diffs(&side, selection.as_option().as_deref())?)
        }
        Report::SliceUnmatched { side } => records(cmp.slice_unmatched(&side)?),
        Report::UnmatchedBoth => records(cmp.slice_unmatched_both()?),
        Report::WeaveWide { selection, suffix } => {
            let suffix = suffix.as_deref().and_then(|s| match s {
                [a, b] => Some((a.as_str(), b.as_str())),
                _ => None,
            });
            records(cmp.weave_diffs_wide(selection.as_option().as_deref(), suffix)?)
        }
        Report::WeaveLong(selection) => {
            records(cmp.weave_diffs_long(selection.as_option().as_deref())?)
        }
    }
}

fn json<T: Serialize + ?Sized>(value: &T) -> Outcome {
    Ok(serde_json::to_value(value)?)
}

fn records(relation: Relation) -> Outcome {
    Ok(Json::Array(
        relation.to_records().into_iter().map(Json::Object).collect(),
    ))
}

/// Rename `type_a`/`type_b` keys after the configured side labels
fn relabel_types(value: Json, labels: &SideLabels) -> Json {
    match value {
        Json::Array(rows) => Json::Array(
            rows.into_iter()
                .map(|row| relabel_types(row, labels))
                .collect(),
        ),
        Json::Object(map) => {
            let renamed: Map<String, Json> = map
                .into_iter()
                .map(|(key, v)| match key.as_str() {
                    "type_a" => (format!("type_{}", labels.a()), v),
                    "type_b" => (format!("type_{}", labels.b()), v),
                    _ => (key, v),
                })
                .collect();
            Json::Object(renamed)
        }
        other => other,
    }
}
