//! In-memory `Source` for unit tests

use std::cell::RefCell;
use std::collections::HashMap;

use ora2lite_db::{Error, FromRow, Result, Row, Source, Value};

/// A dictionary row keyed by lower-cased column label
#[derive(Debug, Clone, Default)]
pub struct MapRow(HashMap<String, Value>);

impl MapRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.0.insert(column.to_lowercase(), value.into());
        self
    }
}

impl Row for MapRow {
    fn get_value(&self, column: &str) -> Result<Value> {
        self.0
            .get(column)
            .cloned()
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))
    }
}

/// Canned answers for dictionary queries (by exact SQL) and table data
/// (by quoted `"OWNER"."TABLE"` found in the SELECT).
#[derive(Default)]
pub struct FakeSource {
    dictionary: HashMap<String, Vec<MapRow>>,
    data: HashMap<String, Vec<Vec<Value>>>,
    pub executed: RefCell<Vec<(String, Vec<Value>)>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dictionary(mut self, sql: &str, rows: Vec<MapRow>) -> Self {
        self.dictionary.insert(sql.to_string(), rows);
        self
    }

    pub fn with_data(mut self, owner: &str, table: &str, rows: Vec<Vec<Value>>) -> Self {
        self.data
            .insert(format!("\"{}\".\"{}\"", owner, table), rows);
        self
    }

    /// SQL text of every statement run so far
    pub fn statements(&self) -> Vec<String> {
        self.executed
            .borrow()
            .iter()
            .map(|(sql, _)| sql.clone())
            .collect()
    }
}

impl Source for FakeSource {
    fn fetch_all<T: FromRow>(&self, sql: &str, params: &[Value]) -> Result<Vec<T>> {
        self.executed
            .borrow_mut()
            .push((sql.to_string(), params.to_vec()));

        self.dictionary
            .get(sql)
            .map(|rows| rows.iter().map(T::from_row).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn for_each_row<F>(&self, sql: &str, params: &[Value], mut f: F) -> Result<u64>
    where
        F: FnMut(Vec<Value>) -> Result<()>,
    {
        self.executed
            .borrow_mut()
            .push((sql.to_string(), params.to_vec()));

        let rows = self
            .data
            .iter()
            .find(|(key, _)| sql.contains(key.as_str()))
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| Error::Query(format!("table or view does not exist: {}", sql)))?;

        let limit = match params.first() {
            Some(Value::I64(n)) if sql.contains("ROWNUM") => *n as usize,
            _ => usize::MAX,
        };

        let mut count = 0;
        for row in rows.into_iter().take(limit) {
            f(row)?;
            count += 1;
        }
        Ok(count)
    }
}
