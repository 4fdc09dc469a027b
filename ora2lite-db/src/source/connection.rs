//! Oracle connection implementing `Source`

use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::{FromRow, Source};
use crate::value::Value;

use super::row::OracleRow;
use super::types::{from_sql_value, to_sql_param};

/// Rows fetched per network round trip unless configured otherwise.
const DEFAULT_FETCH_SIZE: u32 = 500;

/// A single Oracle connection used as the migration source.
///
/// Queries run on one connection, one statement at a time.
///
/// # Example
///
/// ```ignore
/// use ora2lite_db::OracleSource;
///
/// let source = OracleSource::connect("scott", "tiger", "//localhost:1521/FREEPDB1")?;
/// let tables: Vec<TableRow> = Query::new("SELECT table_name FROM user_tables")
///     .fetch_all(&source)?;
/// source.close()?;
/// ```
pub struct OracleSource {
    conn: oracle::Connection,
    fetch_size: u32,
}

impl OracleSource {
    /// Connect with the default fetch size.
    ///
    /// `connect_string` is anything Oracle accepts: an Easy Connect string
    /// (`//host:port/service`), a TNS alias, or a full descriptor.
    pub fn connect(user: &str, password: &str, connect_string: &str) -> Result<Self> {
        Self::builder(user, password, connect_string).connect()
    }

    /// Create a builder for configuring the connection.
    pub fn builder<'a>(
        user: &'a str,
        password: &'a str,
        connect_string: &'a str,
    ) -> OracleSourceBuilder<'a> {
        OracleSourceBuilder {
            user,
            password,
            connect_string,
            fetch_size: DEFAULT_FETCH_SIZE,
        }
    }

    /// Server version banner, e.g. `23.4.0.24.5`.
    pub fn server_version(&self) -> Result<String> {
        let (version, _banner) = self.conn.server_version()?;
        Ok(version.to_string())
    }

    /// Get a reference to the underlying `oracle::Connection`.
    pub fn inner(&self) -> &oracle::Connection {
        &self.conn
    }

    /// Close the connection.
    pub fn close(self) -> Result<()> {
        self.conn.close()?;
        Ok(())
    }

    fn prepare(&self, sql: &str) -> Result<oracle::Statement> {
        debug!(fetch_size = self.fetch_size, "prepare: {}", sql);
        let stmt = self
            .conn
            .statement(sql)
            .fetch_array_size(self.fetch_size)
            .build()?;
        Ok(stmt)
    }
}

/// Builder for an [`OracleSource`].
pub struct OracleSourceBuilder<'a> {
    user: &'a str,
    password: &'a str,
    connect_string: &'a str,
    fetch_size: u32,
}

impl OracleSourceBuilder<'_> {
    /// Set the number of rows fetched per round trip.
    pub fn fetch_size(mut self, rows: u32) -> Self {
        self.fetch_size = rows.max(1);
        self
    }

    /// Open the connection.
    pub fn connect(self) -> Result<OracleSource> {
        let conn = oracle::Connection::connect(self.user, self.password, self.connect_string)
            .map_err(|e| {
                Error::Connection(format!(
                    "{}@{}: {}",
                    self.user, self.connect_string, e
                ))
            })?;

        Ok(OracleSource {
            conn,
            fetch_size: self.fetch_size,
        })
    }
}

impl Source for OracleSource {
    fn fetch_all<T: FromRow>(&self, sql: &str, params: &[Value]) -> Result<Vec<T>> {
        let mut stmt = self.prepare(sql)?;
        let bound: Vec<Box<dyn oracle::sql_type::ToSql>> = params.iter().map(to_sql_param).collect();
        let refs: Vec<&dyn oracle::sql_type::ToSql> = bound.iter().map(|p| p.as_ref()).collect();

        let rows = stmt.query(&refs)?;
        let labels: Vec<String> = rows
            .column_info()
            .iter()
            .map(|c| c.name().to_lowercase())
            .collect();

        let mut results = Vec::new();
        for row in rows {
            let row = OracleRow::from_oracle_row(&row?, &labels)?;
            results.push(T::from_row(&row)?);
        }

        Ok(results)
    }

    fn for_each_row<F>(&self, sql: &str, params: &[Value], mut f: F) -> Result<u64>
    where
        F: FnMut(Vec<Value>) -> Result<()>,
    {
        let mut stmt = self.prepare(sql)?;
        let bound: Vec<Box<dyn oracle::sql_type::ToSql>> = params.iter().map(to_sql_param).collect();
        let refs: Vec<&dyn oracle::sql_type::ToSql> = bound.iter().map(|p| p.as_ref()).collect();

        let mut count = 0;
        for row in stmt.query(&refs)? {
            let row = row?;
            let values = row
                .sql_values()
                .iter()
                .map(from_sql_value)
                .collect::<Result<Vec<_>>>()?;
            f(values)?;
            count += 1;
        }

        Ok(count)
    }
}
