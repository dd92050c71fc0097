//! Versus Store - the relational substrate on SQLite
//!
//! Provides:
//! - Connection helpers
//! - The `Substrate` trait the engine runs against, and its SQLite
//!   implementation over a borrowed or private in-memory connection
//! - Input sources: existing tables, SELECT queries and in-memory frames
//! - Conversion between `rusqlite` values and `versus_core::Value`

pub mod db;
pub mod errors;
pub mod source;
pub mod substrate;
pub mod value;

// Re-export key types
pub use errors::Result;
pub use source::{Frame, Source};
pub use substrate::{SqliteSubstrate, Substrate};
