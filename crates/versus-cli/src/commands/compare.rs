//! Comparison options and connection setup

use clap::Args;
use versus_core::{CompareOptions, Materialize};
use versus_engine::{compare, Source};
use versus_store::db;

use super::report::{self, Report};

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// First input: a table name, or a SELECT/WITH query
    pub source_a: String,

    /// Second input: a table name, or a SELECT/WITH query
    pub source_b: String,

    /// SQLite database file (in-memory when omitted)
    #[arg(long)]
    pub db: Option<String>,

    /// Key column; repeat for a composite key
    #[arg(long = "by", required = true)]
    pub by: Vec<String>,

    #[arg(long, default_value = "a")]
    pub label_a: String,

    #[arg(long, default_value = "b")]
    pub label_b: String,

    /// all, summary or none
    #[arg(long, default_value = "all")]
    pub materialize: Materialize,

    /// Treat NULL on both sides as a difference
    #[arg(long)]
    pub strict_na: bool,

    /// Fail when a shared column has different declared types
    #[arg(long)]
    pub no_coerce: bool,

    /// Emit JSON logs on stderr
    #[arg(long)]
    pub log_json: bool,
}

impl CompareArgs {
    fn options(&self) -> CompareOptions {
        CompareOptions::default()
            .allow_both_na(!self.strict_na)
            .coerce(!self.no_coerce)
            .side_labels(self.label_a.as_str(), self.label_b.as_str())
            .materialize(self.materialize)
    }
}

pub fn execute(args: CompareArgs, report: Report) -> Result<(), Box<dyn std::error::Error>> {
    let conn = match &args.db {
        Some(path) => {
            if !std::path::Path::new(path).exists() {
                return Err(format!("database not found: {}", path).into());
            }
            db::open(path)?
        }
        None => db::open_in_memory()?,
    };

    let mut comparison = compare(
        Source::parse(&args.source_a),
        Source::parse(&args.source_b),
        args.by.as_slice(),
        args.options(),
        Some(&conn),
    )?;

    let output = report::render(&comparison, report)?;
    comparison.close();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
