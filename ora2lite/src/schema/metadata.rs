//! Metadata structures for an introspected Oracle schema

use serde::{Deserialize, Serialize};

/// Whether a relation is a table or a view materialized as a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Table,
    View,
}

/// Metadata for a table (or view) to migrate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Table name as stored in the dictionary
    pub name: String,

    /// Table or view
    pub kind: TableKind,

    /// Columns in `COLUMN_ID` order
    pub columns: Vec<ColumnMetadata>,

    /// Primary key (if any)
    pub primary_key: Option<PrimaryKey>,

    /// Unique key constraints
    pub unique_keys: Vec<UniqueKey>,

    /// Foreign key constraints
    pub foreign_keys: Vec<ForeignKeyMetadata>,

    /// Indexes not backing a key constraint
    pub indexes: Vec<IndexMetadata>,
}

/// Metadata for a column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name
    pub name: String,

    /// Source data type as reported by the dictionary (e.g. "VARCHAR2", "TIMESTAMP(6)")
    pub data_type: String,

    /// Whether the column is nullable
    pub nullable: bool,

    /// Length in bytes
    pub data_length: Option<i64>,

    /// Decimal precision for NUMBER, binary precision for FLOAT
    pub data_precision: Option<i64>,

    /// Digits right of the decimal point
    pub data_scale: Option<i64>,

    /// Default value expression (if any)
    pub default_value: Option<String>,
}

/// Primary key definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryKey {
    /// Constraint name
    pub name: String,

    /// Columns in the primary key (in order)
    pub columns: Vec<String>,
}

/// Unique key definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueKey {
    /// Constraint name
    pub name: String,

    /// Columns in the key (in order)
    pub columns: Vec<String>,
}

/// Referential action taken when a parent row is deleted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDelete {
    #[default]
    NoAction,
    Cascade,
    SetNull,
}

impl OnDelete {
    /// Parse a `DELETE_RULE` value from `ALL_CONSTRAINTS`
    pub fn from_delete_rule(rule: Option<&str>) -> Self {
        match rule.map(str::trim) {
            Some(r) if r.eq_ignore_ascii_case("CASCADE") => OnDelete::Cascade,
            Some(r) if r.eq_ignore_ascii_case("SET NULL") => OnDelete::SetNull,
            _ => OnDelete::NoAction,
        }
    }

    /// SQL clause, empty for the default action
    pub fn as_sql(&self) -> &'static str {
        match self {
            OnDelete::NoAction => "",
            OnDelete::Cascade => " ON DELETE CASCADE",
            OnDelete::SetNull => " ON DELETE SET NULL",
        }
    }
}

/// Foreign key constraint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKeyMetadata {
    /// Constraint name
    pub name: String,

    /// Referencing columns in this table (in order)
    pub columns: Vec<String>,

    /// Referenced table name
    pub referenced_table: String,

    /// Referenced columns, matched to `columns` by position
    pub referenced_columns: Vec<String>,

    /// Delete rule
    pub on_delete: OnDelete,
}

/// Metadata for an index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// Index name
    pub name: String,

    /// Columns in the index (in order)
    pub columns: Vec<String>,

    /// Whether this is a unique index
    pub unique: bool,
}

impl TableMetadata {
    /// Create an empty table descriptor
    pub fn new(name: impl Into<String>, kind: TableKind) -> Self {
        Self {
            name: name.into(),
            kind,
            columns: Vec::new(),
            primary_key: None,
            unique_keys: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check if the given column list is exactly the primary key
    pub fn is_primary_key(&self, columns: &[String]) -> bool {
        self.primary_key
            .as_ref()
            .map(|pk| pk.columns == columns)
            .unwrap_or(false)
    }

    /// Check if an index is backed by the primary key or a unique key,
    /// either by constraint name or by identical column list
    pub fn is_key_index(&self, index: &IndexMetadata) -> bool {
        let pk_name = self
            .primary_key
            .as_ref()
            .is_some_and(|pk| pk.name == index.name);

        pk_name
            || self.is_primary_key(&index.columns)
            || self
                .unique_keys
                .iter()
                .any(|uk| uk.name == index.name || uk.columns == index.columns)
    }

    /// Check if every column of an index is a real table column
    pub fn has_columns(&self, columns: &[String]) -> bool {
        !columns.is_empty() && columns.iter().all(|c| self.get_column(c).is_some())
    }
}

impl ColumnMetadata {
    /// Create a column with only a name and source type
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            data_length: None,
            data_precision: None,
            data_scale: None,
            default_value: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emp() -> TableMetadata {
        let mut table = TableMetadata::new("EMP", TableKind::Table);
        table.columns = vec![
            ColumnMetadata::new("EMPNO", "NUMBER"),
            ColumnMetadata::new("ENAME", "VARCHAR2"),
            ColumnMetadata::new("DEPTNO", "NUMBER"),
        ];
        table.primary_key = Some(PrimaryKey {
            name: "PK_EMP".into(),
            columns: vec!["EMPNO".into()],
        });
        table.unique_keys = vec![UniqueKey {
            name: "UK_EMP_ENAME".into(),
            columns: vec!["ENAME".into()],
        }];
        table
    }

    fn index(name: &str, columns: &[&str]) -> IndexMetadata {
        IndexMetadata {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            unique: false,
        }
    }

    #[test]
    fn test_is_key_index() {
        let table = emp();
        assert!(table.is_key_index(&index("PK_EMP", &["EMPNO"])));
        assert!(table.is_key_index(&index("SYS_C0012", &["ENAME"])));
        assert!(!table.is_key_index(&index("EMP_DEPT_IX", &["DEPTNO"])));
        assert!(!table.is_key_index(&index("EMP_IX2", &["EMPNO", "DEPTNO"])));
    }

    #[test]
    fn test_has_columns() {
        let table = emp();
        assert!(table.has_columns(&["DEPTNO".into(), "ENAME".into()]));
        assert!(!table.has_columns(&["SYS_NC00004$".into()]));
        assert!(!table.has_columns(&[]));
    }

    #[test]
    fn test_is_primary_key() {
        let table = emp();
        assert!(table.is_primary_key(&["EMPNO".into()]));
        assert!(!table.is_primary_key(&["EMPNO".into(), "DEPTNO".into()]));
        assert!(!TableMetadata::new("T", TableKind::Table).is_primary_key(&["ID".into()]));
    }

    #[test]
    fn test_delete_rule() {
        assert_eq!(OnDelete::from_delete_rule(Some("CASCADE")), OnDelete::Cascade);
        assert_eq!(OnDelete::from_delete_rule(Some("SET NULL")), OnDelete::SetNull);
        assert_eq!(OnDelete::from_delete_rule(Some("NO ACTION")), OnDelete::NoAction);
        assert_eq!(OnDelete::from_delete_rule(None), OnDelete::NoAction);
        assert_eq!(OnDelete::Cascade.as_sql(), " ON DELETE CASCADE");
    }
}
