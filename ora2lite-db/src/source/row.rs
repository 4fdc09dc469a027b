//! Oracle row implementation

use crate::error::{Error, Result};
use crate::traits::Row;
use crate::value::Value;
use std::collections::HashMap;

use super::types::from_sql_value;

/// An Oracle row decoded into dynamic values.
///
/// Column labels are folded to lower case, matching the field names that
/// `#[derive(FromRow)]` looks up.
pub struct OracleRow {
    values: HashMap<String, Value>,
}

impl OracleRow {
    /// Decode an `oracle::Row` using the result set's column labels.
    pub fn from_oracle_row(row: &oracle::Row, labels: &[String]) -> Result<Self> {
        let sql_values = row.sql_values();
        let mut values = HashMap::with_capacity(labels.len());

        for (label, sql_value) in labels.iter().zip(sql_values) {
            values.insert(label.clone(), from_sql_value(sql_value)?);
        }

        Ok(Self { values })
    }
}

impl Row for OracleRow {
    fn get_value(&self, column: &str) -> Result<Value> {
        self.values
            .get(column)
            .cloned()
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))
    }
}
