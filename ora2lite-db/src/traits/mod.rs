//! Core traits for ora2lite-db

mod from_row;
mod from_value;
mod source;

pub use from_row::{FromRow, Row, RowExt};
pub use from_value::FromValue;
pub use source::Source;
