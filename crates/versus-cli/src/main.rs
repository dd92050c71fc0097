//! Versus CLI
//!
//! Compares two tables or queries in a SQLite database and prints a
//! summary or projection as JSON

use clap::Parser;
use versus_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "versus")]
#[command(about = "Versus - compare two keyed tables", long_about = None)]
struct Cli {
    #[command(flatten)]
    compare: commands::compare::CompareArgs,

    #[command(subcommand)]
    report: commands::report::Report,
}

fn main() {
    let cli = Cli::parse();

    if cli.compare.log_json {
        init(Profile::Production);
    } else if std::env::var_os("RUST_LOG").is_some() {
        init(Profile::Development);
    }

    let result = commands::compare::execute(cli.compare, cli.report);

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
