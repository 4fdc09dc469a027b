//! FromRow trait for mapping database rows to Rust structs

use crate::error::Result;
use crate::value::Value;

/// A database row that can be queried by column name.
///
/// Implementations fold column labels to lower case, so `TABLE_NAME` from the
/// Oracle dictionary is looked up as `table_name`.
pub trait Row {
    /// Get a value from the row by column name as a dynamic Value.
    ///
    /// Returns an error if the column doesn't exist.
    fn get_value(&self, column: &str) -> Result<Value>;
}

/// Extension trait for typed access to row values.
pub trait RowExt: Row {
    /// Get a typed value from the row by column name.
    fn get<T: crate::FromValue>(&self, column: &str) -> Result<T> {
        let value = self.get_value(column)?;
        T::from_value(value).map_err(|e| match e {
            crate::Error::UnexpectedNull(_) => crate::Error::UnexpectedNull(column.to_string()),
            other => other,
        })
    }
}

impl<R: Row> RowExt for R {}

/// Trait for types that can be constructed from a database row.
///
/// This trait is typically implemented via the `#[derive(FromRow)]` macro,
/// which generates the implementation automatically based on struct fields.
///
/// # Manual Implementation
///
/// ```ignore
/// use ora2lite_db::{FromRow, Row, RowExt, Result};
///
/// pub struct TableRow {
///     pub table_name: String,
///     pub object_type: String,
/// }
///
/// impl FromRow for TableRow {
///     fn from_row<R: Row>(row: &R) -> Result<Self> {
///         Ok(Self {
///             table_name: row.get("table_name")?,
///             object_type: row.get("object_type")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Construct an instance of this type from a database row.
    fn from_row<R: Row>(row: &R) -> Result<Self>;
}
