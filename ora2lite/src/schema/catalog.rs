//! Schema introspection from the Oracle data dictionary

use std::collections::HashSet;

use ora2lite_db::{FromRow, Query, Source};
use tracing::{debug, info, warn};

use super::metadata::*;
use crate::config::MigrateConfig;
use crate::error::Result;

pub(crate) const TABLES_SQL: &str = "\
SELECT table_name FROM all_tables \
WHERE owner = :1 AND dropped = 'NO' AND nested = 'NO' AND secondary = 'N' \
AND (iot_type IS NULL OR iot_type = 'IOT') \
ORDER BY table_name";

pub(crate) const VIEWS_SQL: &str = "\
SELECT view_name AS table_name FROM all_views \
WHERE owner = :1 \
ORDER BY view_name";

pub(crate) const COLUMNS_SQL: &str = "\
SELECT table_name, column_name, data_type, nullable, data_length, data_precision, data_scale, data_default \
FROM all_tab_columns \
WHERE owner = :1 \
ORDER BY table_name, column_id";

pub(crate) const KEYS_SQL: &str = "\
SELECT c.table_name, c.constraint_name, c.constraint_type, cc.column_name \
FROM all_constraints c \
JOIN all_cons_columns cc ON cc.owner = c.owner AND cc.constraint_name = c.constraint_name AND cc.table_name = c.table_name \
WHERE c.owner = :1 AND c.constraint_type IN ('P', 'U') AND c.status = 'ENABLED' \
ORDER BY c.table_name, c.constraint_name, cc.position";

pub(crate) const FOREIGN_KEYS_SQL: &str = "\
SELECT c.table_name, c.constraint_name, cc.column_name, \
r.owner AS referenced_owner, r.table_name AS referenced_table, rc.column_name AS referenced_column, c.delete_rule \
FROM all_constraints c \
JOIN all_cons_columns cc ON cc.owner = c.owner AND cc.constraint_name = c.constraint_name \
JOIN all_constraints r ON r.owner = c.r_owner AND r.constraint_name = c.r_constraint_name \
JOIN all_cons_columns rc ON rc.owner = r.owner AND rc.constraint_name = r.constraint_name AND rc.position = cc.position \
WHERE c.owner = :1 AND c.constraint_type = 'R' AND c.status = 'ENABLED' \
ORDER BY c.table_name, c.constraint_name, cc.position";

pub(crate) const INDEXES_SQL: &str = "\
SELECT i.table_name, i.index_name, i.uniqueness, ic.column_name \
FROM all_indexes i \
JOIN all_ind_columns ic ON ic.index_owner = i.owner AND ic.index_name = i.index_name \
WHERE i.table_owner = :1 AND i.index_type IN ('NORMAL', 'BITMAP', 'FUNCTION-BASED NORMAL') \
ORDER BY i.table_name, i.index_name, ic.column_position";

#[derive(Debug, FromRow)]
struct TableRow {
    table_name: String,
}

#[derive(Debug, FromRow)]
struct ColumnRow {
    table_name: String,
    #[ora2lite(rename = "COLUMN_NAME")]
    name: String,
    data_type: Option<String>,
    nullable: String,
    data_length: Option<i64>,
    data_precision: Option<i64>,
    data_scale: Option<i64>,
    data_default: Option<String>,
}

#[derive(Debug, FromRow)]
struct KeyColumnRow {
    table_name: String,
    constraint_name: String,
    constraint_type: String,
    column_name: String,
}

#[derive(Debug, FromRow)]
struct ForeignKeyColumnRow {
    table_name: String,
    constraint_name: String,
    column_name: String,
    referenced_owner: String,
    referenced_table: String,
    referenced_column: String,
    delete_rule: Option<String>,
}

#[derive(Debug, FromRow)]
struct IndexColumnRow {
    table_name: String,
    index_name: String,
    uniqueness: String,
    column_name: String,
}

/// What to read from the dictionary
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    /// Schema owner, upper case
    pub owner: String,
    pub views: bool,
    pub keys: bool,
    pub indices: bool,
}

impl From<&MigrateConfig> for CatalogOptions {
    fn from(config: &MigrateConfig) -> Self {
        Self {
            owner: config.owner(),
            views: config.views,
            keys: config.keys,
            indices: config.indices,
        }
    }
}

/// Introspect every table (and view, when enabled) owned by `options.owner`.
///
/// Tables without visible columns are skipped.
pub fn load_schema<S: Source>(source: &S, options: &CatalogOptions) -> Result<Vec<TableMetadata>> {
    let owner = options.owner.as_str();

    let mut tables: Vec<TableMetadata> = Query::new(TABLES_SQL)
        .bind(owner)
        .fetch_all::<TableRow, _>(source)?
        .into_iter()
        .map(|row| TableMetadata::new(row.table_name, TableKind::Table))
        .collect();
    info!("Found {} tables in schema {}", tables.len(), owner);

    if options.views {
        let views: Vec<TableRow> = Query::new(VIEWS_SQL).bind(owner).fetch_all(source)?;
        info!("Found {} views in schema {}", views.len(), owner);
        tables.extend(
            views
                .into_iter()
                .map(|row| TableMetadata::new(row.table_name, TableKind::View)),
        );
    }

    load_columns(source, owner, &mut tables)?;
    tables.retain(|t| {
        if t.columns.is_empty() {
            warn!("Skipping {}: no visible columns", t.name);
        }
        !t.columns.is_empty()
    });

    if options.keys {
        load_keys(source, owner, &mut tables)?;
        load_foreign_keys(source, owner, &mut tables)?;
    }
    if options.indices {
        load_indexes(source, owner, &mut tables)?;
    }

    Ok(tables)
}

fn load_columns<S: Source>(source: &S, owner: &str, tables: &mut [TableMetadata]) -> Result<()> {
    let rows: Vec<ColumnRow> = Query::new(COLUMNS_SQL).bind(owner).fetch_all(source)?;
    debug!("Loaded {} column rows", rows.len());

    for row in rows {
        let Some(table) = find_table(tables, &row.table_name) else {
            continue;
        };
        table.columns.push(ColumnMetadata {
            name: row.name,
            data_type: row.data_type.unwrap_or_default(),
            nullable: row.nullable != "N",
            data_length: row.data_length,
            data_precision: row.data_precision,
            data_scale: row.data_scale,
            default_value: row
                .data_default
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        });
    }

    Ok(())
}

fn load_keys<S: Source>(source: &S, owner: &str, tables: &mut [TableMetadata]) -> Result<()> {
    let rows: Vec<KeyColumnRow> = Query::new(KEYS_SQL).bind(owner).fetch_all(source)?;

    for row in rows {
        let Some(table) = find_table(tables, &row.table_name) else {
            continue;
        };

        if row.constraint_type == "P" {
            // At most one primary key per table
            table
                .primary_key
                .get_or_insert_with(|| PrimaryKey {
                    name: row.constraint_name.clone(),
                    columns: Vec::new(),
                })
                .columns
                .push(row.column_name);
        } else {
            match table.unique_keys.last_mut() {
                Some(uk) if uk.name == row.constraint_name => uk.columns.push(row.column_name),
                _ => table.unique_keys.push(UniqueKey {
                    name: row.constraint_name,
                    columns: vec![row.column_name],
                }),
            }
        }
    }

    Ok(())
}

fn load_foreign_keys<S: Source>(
    source: &S,
    owner: &str,
    tables: &mut [TableMetadata],
) -> Result<()> {
    let rows: Vec<ForeignKeyColumnRow> =
        Query::new(FOREIGN_KEYS_SQL).bind(owner).fetch_all(source)?;

    for row in rows {
        if row.referenced_owner != owner {
            warn!(
                "Skipping foreign key {}: references {}.{} outside schema {}",
                row.constraint_name, row.referenced_owner, row.referenced_table, owner
            );
            continue;
        }
        let Some(table) = find_table(tables, &row.table_name) else {
            continue;
        };

        match table.foreign_keys.last_mut() {
            Some(fk) if fk.name == row.constraint_name => {
                fk.columns.push(row.column_name);
                fk.referenced_columns.push(row.referenced_column);
            }
            _ => table.foreign_keys.push(ForeignKeyMetadata {
                name: row.constraint_name,
                columns: vec![row.column_name],
                referenced_table: row.referenced_table,
                referenced_columns: vec![row.referenced_column],
                on_delete: OnDelete::from_delete_rule(row.delete_rule.as_deref()),
            }),
        }
    }

    Ok(())
}

fn load_indexes<S: Source>(source: &S, owner: &str, tables: &mut [TableMetadata]) -> Result<()> {
    let rows: Vec<IndexColumnRow> = Query::new(INDEXES_SQL).bind(owner).fetch_all(source)?;

    for row in rows {
        let Some(table) = find_table(tables, &row.table_name) else {
            continue;
        };

        match table.indexes.last_mut() {
            Some(idx) if idx.name == row.index_name => idx.columns.push(row.column_name),
            _ => table.indexes.push(IndexMetadata {
                name: row.index_name,
                columns: vec![row.column_name],
                unique: row.uniqueness == "UNIQUE",
            }),
        }
    }

    for table in tables.iter_mut() {
        let indexes = std::mem::take(&mut table.indexes);
        for index in indexes {
            if !table.has_columns(&index.columns) {
                warn!(
                    "Skipping index {} on {}: expression columns are not supported",
                    index.name, table.name
                );
            } else if table.is_key_index(&index) {
                debug!("Index {} backs a key constraint of {}", index.name, table.name);
            } else {
                table.indexes.push(index);
            }
        }
    }

    Ok(())
}

/// Drop foreign keys whose parent table is not part of this run.
pub fn prune_foreign_keys(tables: &mut [TableMetadata]) {
    let names: HashSet<String> = tables.iter().map(|t| t.name.clone()).collect();

    for table in tables.iter_mut() {
        table.foreign_keys.retain(|fk| {
            let keep = names.contains(&fk.referenced_table);
            if !keep {
                warn!(
                    "Skipping foreign key {} on {}: table {} is not migrated",
                    fk.name, table.name, fk.referenced_table
                );
            }
            keep
        });
    }
}

fn find_table<'a>(tables: &'a mut [TableMetadata], name: &str) -> Option<&'a mut TableMetadata> {
    tables.iter_mut().find(|t| t.name == name)
}
