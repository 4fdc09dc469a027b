//! Derive macros for the ora2lite database layer
//!
//! This crate provides the `FromRow` derive macro, which maps rows returned
//! by a `Source` (for example Oracle data dictionary queries) onto structs.
//!
//! The macro is re-exported from the `ora2lite-db` crate, so users typically
//! don't need to depend on this crate directly.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod from_row;

/// Derive macro for mapping database rows to Rust structs.
///
/// This macro generates an implementation of the `FromRow` trait,
/// which allows automatic conversion from database rows.
///
/// Column lookup uses the field name, which must match the lower-cased
/// column label of the query.
///
/// # Attributes
///
/// - `#[ora2lite(rename = "column_name")]` - Use a different column name for this field
/// - `#[ora2lite(skip)]` - Skip this field when reading from the row
///
/// # Example
///
/// ```ignore
/// use ora2lite_db::FromRow;
///
/// #[derive(FromRow)]
/// pub struct ColumnRow {
///     pub table_name: String,
///     #[ora2lite(rename = "column_name")]
///     pub name: String,
///     pub data_scale: Option<i64>,
/// }
/// ```
#[proc_macro_derive(FromRow, attributes(ora2lite))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::derive_from_row_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
