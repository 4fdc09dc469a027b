//! Oracle schema introspection

mod catalog;
mod metadata;

pub use catalog::{load_schema, prune_foreign_keys, CatalogOptions};
pub use metadata::*;

#[cfg(test)]
pub(crate) mod catalog_sql {
    pub(crate) use super::catalog::{
        COLUMNS_SQL as COLUMNS, FOREIGN_KEYS_SQL as FOREIGN_KEYS, INDEXES_SQL as INDEXES,
        KEYS_SQL as KEYS, TABLES_SQL as TABLES, VIEWS_SQL as VIEWS,
    };
}
