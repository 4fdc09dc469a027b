//! ora2lite-db - database layer for the ora2lite migration tool
//!
//! Reading happens through the [`Source`] trait, implemented for Oracle by
//! [`OracleSource`] on top of the `oracle` crate. Writing happens through
//! [`SqliteTarget`], a thin wrapper over `rusqlite` that owns the output file.
//!
//! # Features
//!
//! - **Query API**: [`Query`] with `.bind()` chaining over any [`Source`]
//! - **Derive Macro**: `#[derive(FromRow)]` maps dictionary rows onto structs
//! - **Streaming**: [`Source::for_each_row`] hands positional rows to a callback
//! - **Dynamic values**: [`Value`] carries every Oracle value the tool copies
//!
//! # Example
//!
//! ```ignore
//! use ora2lite_db::{FromRow, OracleSource, Query};
//!
//! #[derive(FromRow)]
//! pub struct TableRow {
//!     pub table_name: String,
//! }
//!
//! fn tables(source: &OracleSource, owner: &str) -> ora2lite_db::Result<Vec<TableRow>> {
//!     Query::new("SELECT table_name FROM all_tables WHERE owner = :1")
//!         .bind(owner)
//!         .fetch_all(source)
//! }
//! ```

pub mod error;
pub mod query;
pub mod source;
pub mod target;
pub mod traits;
pub mod value;

// Re-export the derive macro
pub use ora2lite_derive::FromRow;

pub use error::{Error, Result};
pub use query::Query;
pub use source::{OracleRow, OracleSource, OracleSourceBuilder};
pub use target::{InsertStatement, SqliteTarget, SqliteTransaction};
pub use traits::{FromRow, FromValue, Row, RowExt, Source};
pub use value::Value;
