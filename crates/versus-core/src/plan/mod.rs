//! Typed query plan
//!
//! Queries are assembled as data (`Expr`, `Select`, `Query`) and rendered to
//! SQLite text only at the end, via [`render`]. Plans can be inspected and
//! unit-tested without a connection.

pub mod expr;
pub mod query;
pub mod render;

pub use expr::{Expr, SelectItem};
pub use query::{FromItem, Query, Select, SetOp};
pub use render::{quote_ident, quote_literal, render, render_expr};
