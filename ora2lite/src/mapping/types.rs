//! Oracle to SQLite type mapping

use tracing::warn;

use crate::schema::ColumnMetadata;

/// Column types declared in the SQLite file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqliteType {
    Integer,
    Real,
    Numeric,
    Text,
    Blob,
    /// No declared type (BLOB affinity): each value keeps the storage class
    /// it is written with
    Untyped,
}

impl SqliteType {
    /// Get the type name used in DDL
    pub fn as_str(&self) -> &'static str {
        match self {
            SqliteType::Integer => "INTEGER",
            SqliteType::Real => "REAL",
            SqliteType::Numeric => "NUMERIC",
            SqliteType::Text => "TEXT",
            SqliteType::Blob => "BLOB",
            SqliteType::Untyped => "",
        }
    }
}

impl std::fmt::Display for SqliteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqliteType::Untyped => f.write_str("(untyped)"),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Large-object class of a source type, which decides whether its
/// contents are copied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobKind {
    /// Not a large object
    Plain,
    /// BLOB, LONG RAW
    Binary,
    /// CLOB, NCLOB, LONG
    Character,
    /// XMLTYPE
    Xml,
    /// BFILE (external file locator)
    Unsupported,
}

/// Widest NUMBER precision whose values always fit an i64
const INTEGER_DIGITS: i64 = 18;

/// Widest NUMBER precision a REAL holds without rounding
const REAL_DIGITS: i64 = 15;

/// Normalized Oracle type name to SQLite type
const TYPE_MAP: &[(&str, SqliteType)] = &[
    // Character
    ("CHAR", SqliteType::Text),
    ("NCHAR", SqliteType::Text),
    ("VARCHAR", SqliteType::Text),
    ("VARCHAR2", SqliteType::Text),
    ("NVARCHAR2", SqliteType::Text),
    ("CLOB", SqliteType::Text),
    ("NCLOB", SqliteType::Text),
    ("LONG", SqliteType::Text),
    ("XMLTYPE", SqliteType::Text),
    ("JSON", SqliteType::Text),
    ("ROWID", SqliteType::Text),
    ("UROWID", SqliteType::Text),
    // Date/time, stored as ISO-8601 text
    ("DATE", SqliteType::Text),
    ("TIMESTAMP", SqliteType::Text),
    ("TIMESTAMP WITH TIME ZONE", SqliteType::Text),
    ("TIMESTAMP WITH LOCAL TIME ZONE", SqliteType::Text),
    ("INTERVAL DAY TO SECOND", SqliteType::Text),
    ("INTERVAL YEAR TO MONTH", SqliteType::Text),
    // Numeric
    ("NUMBER", SqliteType::Numeric),
    ("DECIMAL", SqliteType::Numeric),
    ("NUMERIC", SqliteType::Numeric),
    ("INTEGER", SqliteType::Integer),
    ("INT", SqliteType::Integer),
    ("SMALLINT", SqliteType::Integer),
    ("BOOLEAN", SqliteType::Integer),
    ("FLOAT", SqliteType::Real),
    ("BINARY_FLOAT", SqliteType::Real),
    ("BINARY_DOUBLE", SqliteType::Real),
    ("REAL", SqliteType::Real),
    ("DOUBLE PRECISION", SqliteType::Real),
    // Binary
    ("RAW", SqliteType::Blob),
    ("LONG RAW", SqliteType::Blob),
    ("BLOB", SqliteType::Blob),
    ("BFILE", SqliteType::Blob),
];

/// Resolve Oracle data types to SQLite types
pub struct TypeResolver;

impl TypeResolver {
    /// Get the SQLite type for a column.
    ///
    /// `NUMBER` columns are refined by precision (see [`Self::resolve_number`]);
    /// everything else follows [`Self::lookup`].
    pub fn resolve(column: &ColumnMetadata) -> SqliteType {
        let type_name = normalize_type_name(&column.data_type);

        if type_name == "NUMBER" {
            return Self::resolve_number(column);
        }

        Self::lookup(&type_name).unwrap_or_else(|| {
            warn!(
                "Unknown type {} for column {}, using TEXT",
                column.data_type, column.name
            );
            SqliteType::Text
        })
    }

    /// SQLite turns numeric text stored under INTEGER or NUMERIC affinity
    /// into REAL, keeping 15 significant digits. A `NUMBER` column is only
    /// declared with one of them when its precision bounds every value:
    ///
    /// - scale 0 and at most 18 digits: `INTEGER`
    /// - at most 15 digits: `NUMERIC`
    /// - unconstrained or wider: untyped, so values too wide for INTEGER or
    ///   REAL stay exact text
    pub fn resolve_number(column: &ColumnMetadata) -> SqliteType {
        match (column.data_precision, column.data_scale) {
            (Some(p), Some(0)) if p <= INTEGER_DIGITS => SqliteType::Integer,
            (Some(p), _) if p <= REAL_DIGITS => SqliteType::Numeric,
            _ => SqliteType::Untyped,
        }
    }

    /// Look up a source type name in the mapping table
    pub fn lookup(data_type: &str) -> Option<SqliteType> {
        let type_name = normalize_type_name(data_type);
        TYPE_MAP
            .iter()
            .find(|(name, _)| *name == type_name)
            .map(|(_, ty)| *ty)
    }

    /// Classify a source type name by large-object class
    pub fn lob_kind(data_type: &str) -> LobKind {
        match normalize_type_name(data_type).as_str() {
            "BLOB" | "LONG RAW" => LobKind::Binary,
            "CLOB" | "NCLOB" | "LONG" => LobKind::Character,
            "XMLTYPE" => LobKind::Xml,
            "BFILE" => LobKind::Unsupported,
            _ => LobKind::Plain,
        }
    }
}

/// Upper-case, drop parenthesized arguments and collapse whitespace:
/// `timestamp(6) with time zone` becomes `TIMESTAMP WITH TIME ZONE`.
pub fn normalize_type_name(data_type: &str) -> String {
    let mut stripped = String::with_capacity(data_type.len());
    let mut depth = 0usize;
    for ch in data_type.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => stripped.push(ch),
            _ => {}
        }
    }

    let type_name = stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    // User-defined types come back schema-qualified, e.g. SYS.XMLTYPE
    match type_name.rsplit_once('.') {
        Some((_, name)) => name.to_string(),
        None => type_name,
    }
}
