//! Default configuration values - single source of truth

/// Default include tables pattern (all tables)
pub const INCLUDE_TABLES: &str = "*";

/// Default exclude tables pattern (none)
pub const EXCLUDE_TABLES: &str = "";

/// Default output file
pub const OUTPUT_FILE: &str = "./output.db";

/// Whether views are materialized as tables by default
pub const VIEWS: bool = false;

/// Whether BLOB / LONG RAW contents are copied by default
pub const BLOBS: bool = false;

/// Whether CLOB / NCLOB / LONG contents are copied by default
pub const CLOBS: bool = false;

/// Whether XMLTYPE contents are copied by default
pub const XML: bool = false;

/// Whether indices are created by default
pub const INDICES: bool = false;

/// Whether primary, unique and foreign keys are created by default
pub const KEYS: bool = false;

/// Rows fetched from Oracle per round trip
pub const FETCH_SIZE: u32 = 500;

/// Rows between progress log lines while copying a table
pub const PROGRESS_INTERVAL: u64 = 100_000;

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;
