//! SQLite DDL generation

use crate::config::{MigrateConfig, NameCase};
use crate::mapping::{
    target_ident, target_ident_list, translate_default, SqliteType, TypeResolver,
};
use crate::schema::{ColumnMetadata, IndexMetadata, TableMetadata};
use crate::transfer::{ColumnAction, LobSwitches};

/// Options that shape generated DDL
#[derive(Debug, Clone, Copy, Default)]
pub struct DdlOptions {
    /// Declare primary, unique and foreign keys
    pub keys: bool,
    pub name_case: NameCase,
    pub lobs: LobSwitches,
}

impl From<&MigrateConfig> for DdlOptions {
    fn from(config: &MigrateConfig) -> Self {
        Self {
            keys: config.keys,
            name_case: config.name_case,
            lobs: LobSwitches::from(config),
        }
    }
}

/// Generate `CREATE TABLE` for a table.
///
/// Columns whose values are replaced by NULL lose their NOT NULL
/// constraint.
pub fn create_table_sql(table: &TableMetadata, options: &DdlOptions) -> String {
    let case = options.name_case;
    let mut definitions: Vec<String> = table
        .columns
        .iter()
        .map(|c| column_definition(c, options))
        .collect();

    if options.keys {
        if let Some(pk) = &table.primary_key {
            definitions.push(format!("PRIMARY KEY ({})", target_ident_list(&pk.columns, case)));
        }
        for uk in &table.unique_keys {
            definitions.push(format!("UNIQUE ({})", target_ident_list(&uk.columns, case)));
        }
        for fk in &table.foreign_keys {
            definitions.push(format!(
                "FOREIGN KEY ({}) REFERENCES {} ({}){}",
                target_ident_list(&fk.columns, case),
                target_ident(&fk.referenced_table, case),
                target_ident_list(&fk.referenced_columns, case),
                fk.on_delete.as_sql()
            ));
        }
    }

    format!(
        "CREATE TABLE {} (\n    {}\n)",
        target_ident(&table.name, case),
        definitions.join(",\n    ")
    )
}

fn column_definition(column: &ColumnMetadata, options: &DdlOptions) -> String {
    let mut definition = target_ident(&column.name, options.name_case);

    let declared = TypeResolver::resolve(column);
    if declared != SqliteType::Untyped {
        definition.push(' ');
        definition.push_str(declared.as_str());
    }

    let nulled = options.lobs.action(&column.data_type) == ColumnAction::Null;
    if !column.nullable && !nulled {
        definition.push_str(" NOT NULL");
    }

    if let Some(default) = column.default_value.as_deref().and_then(translate_default) {
        definition.push_str(" DEFAULT ");
        definition.push_str(&default);
    }

    definition
}

/// Generate `CREATE [UNIQUE] INDEX` for an index of `table`
pub fn create_index_sql(table: &TableMetadata, index: &IndexMetadata, case: NameCase) -> String {
    format!(
        "CREATE {}INDEX {} ON {} ({})",
        if index.unique { "UNIQUE " } else { "" },
        target_ident(&index.name, case),
        target_ident(&table.name, case),
        target_ident_list(&index.columns, case)
    )
}

/// Generate the positional `INSERT` used to load a table
pub fn insert_sql(table: &TableMetadata, case: NameCase) -> String {
    let columns: Vec<String> = table.columns.iter().map(|c| c.name.clone()).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        target_ident(&table.name, case),
        target_ident_list(&columns, case),
        placeholders.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ForeignKeyMetadata, OnDelete, PrimaryKey, TableKind, UniqueKey};
    use ora2lite_db::SqliteTarget;

    fn emp() -> TableMetadata {
        let mut table = TableMetadata::new("EMP", TableKind::Table);
        table.columns = vec![
            ColumnMetadata {
                nullable: false,
                data_precision: Some(4),
                data_scale: Some(0),
                ..ColumnMetadata::new("EMPNO", "NUMBER")
            },
            ColumnMetadata::new("ENAME", "VARCHAR2"),
            ColumnMetadata {
                default_value: Some("SYSDATE".into()),
                ..ColumnMetadata::new("HIREDATE", "DATE")
            },
            ColumnMetadata {
                data_precision: Some(7),
                data_scale: Some(2),
                ..ColumnMetadata::new("SAL", "NUMBER")
            },
            ColumnMetadata {
                nullable: false,
                ..ColumnMetadata::new("RESUME", "CLOB")
            },
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
        table.foreign_keys = vec![ForeignKeyMetadata {
            name: "FK_DEPTNO".into(),
            columns: vec!["DEPTNO".into()],
            referenced_table: "DEPT".into(),
            referenced_columns: vec!["DEPTNO".into()],
            on_delete: OnDelete::SetNull,
        }];
        table
    }

    #[test]
    fn test_create_table_without_keys() {
        let sql = create_table_sql(&emp(), &DdlOptions::default());
        assert_eq!(
            sql,
            "CREATE TABLE \"EMP\" (\n    \
             \"EMPNO\" INTEGER NOT NULL,\n    \
             \"ENAME\" TEXT,\n    \
             \"HIREDATE\" TEXT DEFAULT CURRENT_TIMESTAMP,\n    \
             \"SAL\" NUMERIC,\n    \
             \"RESUME\" TEXT,\n    \
             \"DEPTNO\"\n)"
        );
    }

    #[test]
    fn test_create_table_with_keys() {
        let options = DdlOptions {
            keys: true,
            lobs: LobSwitches {
                clobs: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let sql = create_table_sql(&emp(), &options);
        assert!(sql.contains("\"RESUME\" TEXT NOT NULL"));
        assert!(sql.contains("PRIMARY KEY (\"EMPNO\")"));
        assert!(sql.contains("UNIQUE (\"ENAME\")"));
        assert!(sql.contains(
            "FOREIGN KEY (\"DEPTNO\") REFERENCES \"DEPT\" (\"DEPTNO\") ON DELETE SET NULL"
        ));
    }

    #[test]
    fn test_name_case() {
        let options = DdlOptions {
            name_case: NameCase::Lower,
            ..Default::default()
        };
        let table = emp();
        assert!(create_table_sql(&table, &options).starts_with("CREATE TABLE \"emp\" (\n    \"empno\""));
        assert_eq!(
            insert_sql(&table, NameCase::Lower),
            "INSERT INTO \"emp\" (\"empno\", \"ename\", \"hiredate\", \"sal\", \"resume\", \"deptno\") \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
        );
    }

    #[test]
    fn test_create_index_sql() {
        let table = emp();
        let index = IndexMetadata {
            name: "EMP_NAME_IX".into(),
            columns: vec!["ENAME".into(), "DEPTNO".into()],
            unique: true,
        };
        assert_eq!(
            create_index_sql(&table, &index, NameCase::Preserve),
            "CREATE UNIQUE INDEX \"EMP_NAME_IX\" ON \"EMP\" (\"ENAME\", \"DEPTNO\")"
        );
    }

    #[test]
    fn test_generated_ddl_runs_on_sqlite() {
        let mut dept = TableMetadata::new("DEPT", TableKind::Table);
        dept.columns = vec![ColumnMetadata::new("DEPTNO", "NUMBER")];
        dept.primary_key = Some(PrimaryKey {
            name: "PK_DEPT".into(),
            columns: vec!["DEPTNO".into()],
        });
        let options = DdlOptions {
            keys: true,
            ..Default::default()
        };

        let target = SqliteTarget::open_in_memory().unwrap();
        target.execute_batch(&create_table_sql(&dept, &options)).unwrap();
        target.execute_batch(&create_table_sql(&emp(), &options)).unwrap();
        target
            .execute_batch(&insert_sql(&dept, NameCase::Preserve).replace("?1", "10"))
            .unwrap();
    }
}
