//! Error types for ora2lite

use thiserror::Error;

/// Result type alias for migration operations
pub type Result<T> = std::result::Result<T, MigrateError>;

/// Errors that abort a migration run
#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Database(#[from] ora2lite_db::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Failed to create table {table}: {source}")]
    CreateTable {
        table: String,
        #[source]
        source: ora2lite_db::Error,
    },

    #[error("Failed to copy rows of table {table}: {source}")]
    CopyTable {
        table: String,
        #[source]
        source: ora2lite_db::Error,
    },
}

impl MigrateError {
    /// Errors that warrant printing the usage banner: bad or missing
    /// arguments, and a source database that cannot be reached.
    pub fn is_usage_error(&self) -> bool {
        match self {
            MigrateError::ConfigError(_) | MigrateError::ValidationError(_) => true,
            MigrateError::Database(e) => e.is_connection(),
            _ => false,
        }
    }
}

impl From<config::ConfigError> for MigrateError {
    fn from(err: config::ConfigError) -> Self {
        MigrateError::ConfigError(err.to_string())
    }
}
