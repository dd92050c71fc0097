//! Core types shared across versus facilities
//!
//! This crate provides foundational types used by the error, logging and
//! lifecycle facilities:
//!
//! - **Schema constants**: Canonical field keys and event names
//! - **Artifact names**: Collision-free identifiers for temporary
//!   server-side objects

pub mod artifact;
pub mod schema;

pub use artifact::{ArtifactKind, ArtifactName};
