//! Structured logging facility for versus
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - Boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - `log_artifact!` for temp view and table transitions
//! - In-memory capture for tests, filtered by comparison id or artifact
//!
//! # Usage
//!
//! ```rust
//! use versus_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```
//!
//! # Ownership
//!
//! Boundary events (`start`, `end`, `end_error`) belong to the engine layer.
//! The core and store layers only emit `tracing::debug!` details.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
