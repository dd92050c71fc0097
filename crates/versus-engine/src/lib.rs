//! Versus Engine - the comparison aggregate
//!
//! `compare` registers two inputs, validates them, computes the diff state
//! at the requested materialization level and returns a [`Comparison`].
//! The comparison answers summaries and projections and releases every
//! temporary artifact it created on `close()` or drop.
//!
//! ## Logging Ownership
//!
//! The engine layer owns boundary logging:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Store and core layers only emit `tracing::debug!()` details.

pub mod comparison;
pub mod compare;
pub mod lifecycle;
pub mod projections;
pub mod registration;
pub mod strategy;

pub use compare::{compare, compare_with};
pub use comparison::Comparison;
pub use lifecycle::ArtifactLedger;
pub use registration::TableHandle;
pub use versus_store::{Frame, Source, SqliteSubstrate, Substrate};
