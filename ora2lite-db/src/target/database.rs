//! SQLite output database

use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::value::Value;

use super::types::to_sqlite_value;

/// Pragmas for a one-shot bulk load into a fresh file.
const BULK_LOAD_PRAGMAS: &str = "
    PRAGMA journal_mode = MEMORY;
    PRAGMA synchronous = OFF;
    PRAGMA temp_store = MEMORY;
    PRAGMA foreign_keys = OFF;
";

/// The SQLite database file the migration writes.
///
/// # Example
///
/// ```ignore
/// let mut target = SqliteTarget::create("scott.db")?;
/// target.execute_batch("CREATE TABLE \"DEPT\" (\"DEPTNO\" INTEGER)")?;
/// target.in_transaction(|tx| {
///     let mut insert = tx.prepare_insert("INSERT INTO \"DEPT\" VALUES (?1)")?;
///     insert.insert(&[Value::I64(10)])
/// })?;
/// ```
pub struct SqliteTarget {
    conn: Connection,
}

impl SqliteTarget {
    /// Create a fresh database at `path`, deleting any existing file first.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            info!("Removing existing output file {}", path.display());
            std::fs::remove_file(path)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(BULK_LOAD_PRAGMAS)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (dry runs and tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(BULK_LOAD_PRAGMAS)?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying `rusqlite::Connection`.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Execute one or more semicolon-separated statements.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        debug!("execute: {}", sql);
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed if the closure returns `Ok` and rolled
    /// back if it returns `Err`.
    pub fn in_transaction<R, F>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&SqliteTransaction<'_>) -> Result<R>,
    {
        let tx = SqliteTransaction {
            inner: self.conn.transaction()?,
        };

        match f(&tx) {
            Ok(result) => {
                tx.inner.commit()?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback) = tx.inner.rollback() {
                    warn!("Rollback failed: {}", rollback);
                }
                Err(e)
            }
        }
    }

    /// Close the database, flushing it to disk.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }
}

/// A transaction on the target database.
pub struct SqliteTransaction<'c> {
    inner: rusqlite::Transaction<'c>,
}

impl SqliteTransaction<'_> {
    /// Prepare an `INSERT` statement for repeated execution.
    pub fn prepare_insert(&self, sql: &str) -> Result<InsertStatement<'_>> {
        debug!("prepare: {}", sql);
        Ok(InsertStatement {
            stmt: self.inner.prepare(sql)?,
        })
    }
}

/// A prepared insert bound positionally from `Value`s.
pub struct InsertStatement<'t> {
    stmt: rusqlite::Statement<'t>,
}

impl InsertStatement<'_> {
    /// Insert one row.
    pub fn insert(&mut self, values: &[Value]) -> Result<()> {
        self.stmt
            .execute(rusqlite::params_from_iter(values.iter().map(to_sqlite_value)))?;
        Ok(())
    }
}
