//! Identifier naming and quoting

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::config::NameCase;
use crate::error::{MigrateError, Result};
use crate::schema::TableMetadata;

/// Quote an identifier with double quotes, doubling embedded quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Target spelling of a source identifier, quoted
pub fn target_ident(name: &str, case: NameCase) -> String {
    quote_ident(&case.apply(name))
}

/// Comma-separated list of quoted target identifiers
pub fn target_ident_list(names: &[String], case: NameCase) -> String {
    names
        .iter()
        .map(|n| target_ident(n, case))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fully qualified source object, e.g. `"SCOTT"."EMP"`
pub fn source_object(owner: &str, name: &str) -> String {
    format!("{}.{}", quote_ident(owner), quote_ident(name))
}

/// Reject tables, or columns of one table, whose target names collide.
///
/// SQLite compares identifiers case-insensitively, and `snake` drops `#` and
/// `$`, so `COL#` and `COL` both become `col`.
pub fn check_target_names(tables: &[TableMetadata], case: NameCase) -> Result<()> {
    if let Some((first, second, target)) =
        find_collision(tables.iter().map(|t| t.name.as_str()), case)
    {
        return Err(MigrateError::SchemaError(format!(
            "tables {} and {} both map to {}",
            first,
            second,
            quote_ident(&target)
        )));
    }

    for table in tables {
        if let Some((first, second, target)) =
            find_collision(table.columns.iter().map(|c| c.name.as_str()), case)
        {
            return Err(MigrateError::SchemaError(format!(
                "columns {} and {} of table {} both map to {}",
                first,
                second,
                table.name,
                quote_ident(&target)
            )));
        }
    }

    Ok(())
}

fn find_collision<'a>(
    names: impl IntoIterator<Item = &'a str>,
    case: NameCase,
) -> Option<(&'a str, &'a str, String)> {
    let mut seen: HashMap<String, &'a str> = HashMap::new();
    for name in names {
        let target = case.apply(name);
        match seen.entry(target.to_lowercase()) {
            Entry::Occupied(e) => return Some((*e.get(), name, target)),
            Entry::Vacant(e) => {
                e.insert(name);
            }
        }
    }
    None
}
