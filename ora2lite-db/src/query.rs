//! Query builder for ora2lite-db

use crate::error::Result;
use crate::traits::{FromRow, Source};
use crate::value::Value;

/// A query builder that supports fluent parameter binding.
///
/// # Example
///
/// ```ignore
/// use ora2lite_db::{Query, Source};
///
/// fn views(source: &impl Source, owner: &str) -> ora2lite_db::Result<Vec<ViewRow>> {
///     Query::new("SELECT view_name FROM all_views WHERE owner = :1")
///         .bind(owner)
///         .fetch_all(source)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Query<'q> {
    sql: &'q str,
    params: Vec<Value>,
}

impl<'q> Query<'q> {
    /// Create a new query with the given SQL.
    pub fn new(sql: &'q str) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }

    /// Bind a single value to the query.
    ///
    /// Values are bound in order, replacing `:1`, `:2`, ... placeholders.
    pub fn bind<T: Into<Value>>(mut self, value: T) -> Self {
        self.params.push(value.into());
        self
    }

    /// Fetch all matching rows.
    pub fn fetch_all<T: FromRow, S: Source>(self, source: &S) -> Result<Vec<T>> {
        source.fetch_all(self.sql, &self.params)
    }

    /// Stream matching rows positionally.
    pub fn for_each_row<S, F>(self, source: &S, f: F) -> Result<u64>
    where
        S: Source,
        F: FnMut(Vec<Value>) -> Result<()>,
    {
        source.for_each_row(self.sql, &self.params, f)
    }
}
