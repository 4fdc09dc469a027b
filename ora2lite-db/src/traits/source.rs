//! Source trait for databases rows are read from

use crate::error::Result;
use crate::traits::FromRow;
use crate::value::Value;

/// A database the migration reads from.
///
/// Parameters are positional and bound in order (`:1`, `:2`, ... for Oracle).
/// Implemented by [`crate::OracleSource`]; tests substitute an in-memory source.
pub trait Source {
    /// Fetch all rows matching the query, mapping each through [`FromRow`].
    fn fetch_all<T: FromRow>(&self, sql: &str, params: &[Value]) -> Result<Vec<T>>;

    /// Stream rows positionally through `f`, returning the number of rows seen.
    ///
    /// Rows are handed over one at a time in the order of the select list;
    /// the first error returned by `f` stops the stream and is propagated.
    fn for_each_row<F>(&self, sql: &str, params: &[Value], f: F) -> Result<u64>
    where
        F: FnMut(Vec<Value>) -> Result<()>;
}

impl<S: Source> Source for &S {
    fn fetch_all<T: FromRow>(&self, sql: &str, params: &[Value]) -> Result<Vec<T>> {
        (*self).fetch_all(sql, params)
    }

    fn for_each_row<F>(&self, sql: &str, params: &[Value], f: F) -> Result<u64>
    where
        F: FnMut(Vec<Value>) -> Result<()>,
    {
        (*self).for_each_row(sql, params, f)
    }
}
