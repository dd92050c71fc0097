//! Diff plan builders
//!
//! Every diff-oriented query is derived from one per-column predicate
//! ([`DiffPlans::diff_predicate`]) joined on the key columns. Unmatched keys
//! come from a left anti-join against the other side's keys.
//!
//! ```
//! use versus_core::diff::DiffPlans;
//! use versus_core::plan::render;
//!
//! let plans = DiffPlans::new("va", "vb", vec!["id".to_string()], true);
//! let sql = render(&plans.diff_keys_query(&["value".to_string()]));
//! assert!(sql.contains("IS NOT"));
//! ```

pub mod plans;

pub use plans::{DiffPlans, KEYS_ALIAS, PRESENT_COLUMN, SIDE_ALIASES, SIDE_COLUMN, STACK_COLUMN};
