//! Error types for ora2lite-db

use thiserror::Error;

/// Result type alias for database operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading from the source or writing the target
#[derive(Error, Debug)]
pub enum Error {
    /// Oracle driver error
    #[error("Oracle error: {0}")]
    Oracle(#[from] oracle::Error),

    /// SQLite driver error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem error while preparing the target file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Type conversion error
    #[error("Type conversion error: expected {expected}, got {actual}")]
    TypeConversion {
        expected: &'static str,
        actual: String,
    },

    /// Column not found in row
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Null value for non-optional field
    #[error("Unexpected null value for column: {0}")]
    UnexpectedNull(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
}

impl Error {
    /// Whether this error was raised while establishing a connection.
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection(_))
    }
}
