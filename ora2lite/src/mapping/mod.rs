//! Mapping of Oracle names, types and defaults onto SQLite

mod default_value;
mod naming;
mod types;

pub use default_value::translate_default;
pub use naming::{
    check_target_names, quote_ident, source_object, target_ident, target_ident_list,
};
pub use types::{normalize_type_name, LobKind, SqliteType, TypeResolver};
