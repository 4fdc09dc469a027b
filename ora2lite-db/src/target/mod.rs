//! SQLite target database

mod database;
mod types;

pub use database::{InsertStatement, SqliteTarget, SqliteTransaction};
pub use types::to_sqlite_value;
