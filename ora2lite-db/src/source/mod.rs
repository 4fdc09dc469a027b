//! Oracle implementation of the `Source` trait

mod connection;
mod row;
mod types;

pub use connection::{OracleSource, OracleSourceBuilder};
pub use row::OracleRow;
pub use types::parse_number;
