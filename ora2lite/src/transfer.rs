//! Row transfer from Oracle into SQLite

use ora2lite_db::{Query, Source, SqliteTarget, Value};
use tracing::{debug, info};

use crate::config::{MigrateConfig, NameCase};
use crate::ddl;
use crate::error::{MigrateError, Result};
use crate::mapping::{quote_ident, source_object, LobKind, TypeResolver};
use crate::schema::{ColumnMetadata, TableMetadata};

/// What happens to a column's value on the way to SQLite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAction {
    /// Copy the value as fetched
    Copy,
    /// Fetch XMLTYPE serialized to a character LOB and copy the text
    SerializeXml,
    /// Never read the value; store NULL
    Null,
}

/// Which large-object classes are copied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LobSwitches {
    pub blobs: bool,
    pub clobs: bool,
    pub xml: bool,
}

impl LobSwitches {
    /// Action for a column of the given source type
    pub fn action(&self, data_type: &str) -> ColumnAction {
        match TypeResolver::lob_kind(data_type) {
            LobKind::Plain => ColumnAction::Copy,
            LobKind::Binary if self.blobs => ColumnAction::Copy,
            LobKind::Character if self.clobs => ColumnAction::Copy,
            LobKind::Xml if self.xml => ColumnAction::SerializeXml,
            LobKind::Binary | LobKind::Character | LobKind::Xml | LobKind::Unsupported => {
                ColumnAction::Null
            }
        }
    }
}

impl From<&MigrateConfig> for LobSwitches {
    fn from(config: &MigrateConfig) -> Self {
        Self {
            blobs: config.blobs,
            clobs: config.clobs,
            xml: config.xml,
        }
    }
}

/// Per-table copy plan: one action per column, in column order
#[derive(Debug)]
pub struct TablePlan<'a> {
    table: &'a TableMetadata,
    actions: Vec<ColumnAction>,
}

impl<'a> TablePlan<'a> {
    pub fn new(table: &'a TableMetadata, switches: LobSwitches) -> Self {
        let actions = table
            .columns
            .iter()
            .map(|c| switches.action(&c.data_type))
            .collect();
        Self { table, actions }
    }

    pub fn table(&self) -> &TableMetadata {
        self.table
    }

    pub fn actions(&self) -> &[ColumnAction] {
        &self.actions
    }

    /// Columns paired with their actions
    pub fn columns(&self) -> impl Iterator<Item = (&ColumnMetadata, ColumnAction)> {
        self.table.columns.iter().zip(self.actions.iter().copied())
    }

    /// SELECT reading this table from `owner`.
    ///
    /// Nulled columns are projected as `NULL` so their LOBs are never
    /// fetched. With `limited`, the row limit is bound as `:1`.
    pub fn select_sql(&self, owner: &str, limited: bool) -> String {
        let projection = self
            .columns()
            .map(|(column, action)| {
                let name = quote_ident(&column.name);
                match action {
                    ColumnAction::Copy => name,
                    ColumnAction::SerializeXml => {
                        format!("XMLSERIALIZE(CONTENT {} AS CLOB) AS {}", name, name)
                    }
                    ColumnAction::Null => format!("NULL AS {}", name),
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!(
            "SELECT {} FROM {}",
            projection,
            source_object(owner, &self.table.name)
        );
        if limited {
            sql.push_str(" WHERE ROWNUM <= :1");
        }
        sql
    }

    /// Apply null substitution to one fetched row
    pub fn convert_row(&self, row: Vec<Value>) -> Vec<Value> {
        row.into_iter()
            .zip(self.actions.iter())
            .map(|(value, action)| match action {
                ColumnAction::Null => Value::Null,
                ColumnAction::Copy | ColumnAction::SerializeXml => value,
            })
            .collect()
    }
}

/// Settings shared by every table copy
#[derive(Debug, Clone)]
pub struct TransferOptions {
    pub owner: String,
    pub row_limit: Option<u64>,
    pub name_case: NameCase,
    pub progress_interval: u64,
}

impl From<&MigrateConfig> for TransferOptions {
    fn from(config: &MigrateConfig) -> Self {
        Self {
            owner: config.owner(),
            row_limit: config.row_limit,
            name_case: config.name_case,
            progress_interval: config.progress_interval.max(1),
        }
    }
}

/// Copy every row of one table inside a single SQLite transaction.
///
/// Any read or write error rolls the table back and is returned.
pub fn copy_table<S: Source>(
    source: &S,
    target: &mut SqliteTarget,
    plan: &TablePlan<'_>,
    options: &TransferOptions,
) -> Result<u64> {
    let table = plan.table();
    let select = plan.select_sql(&options.owner, options.row_limit.is_some());
    let insert = ddl::insert_sql(table, options.name_case);
    debug!("Copying {} with: {}", table.name, select);

    let mut query = Query::new(&select);
    if let Some(limit) = options.row_limit {
        query = query.bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }

    let result = target.in_transaction(|tx| {
        let mut statement = tx.prepare_insert(&insert)?;
        let mut copied = 0u64;
        query.for_each_row(source, |row| {
            statement.insert(&plan.convert_row(row))?;
            copied += 1;
            if copied % options.progress_interval == 0 {
                info!("{}: {} rows copied", table.name, copied);
            }
            Ok(())
        })
    });

    result.map_err(|source| MigrateError::CopyTable {
        table: table.name.clone(),
        source,
    })
}
