//! ora2lite: Migrate an Oracle schema and its data into a SQLite file
//!
//! This crate provides both a CLI tool and a library. A run is a single
//! linear pipeline:
//!
//! 1. connect to Oracle and replace the output file with a fresh database
//! 2. introspect the owner's tables (and views) from the data dictionary
//! 3. create every table in SQLite, mapping Oracle types to
//!    `INTEGER`/`REAL`/`NUMERIC`/`TEXT`/`BLOB`
//! 4. copy rows table by table, one transaction per table, storing NULL for
//!    large objects whose switch is off
//! 5. create indices, warning about (and skipping) any that fail
//!
//! # Programmatic Usage
//!
//! ```rust,ignore
//! let report = ora2lite::MigrationBuilder::new("scott", "tiger", "//localhost:1521/FREEPDB1")
//!     .output("scott.db")
//!     .clobs()
//!     .keys()
//!     .indices()
//!     .migrate()?;
//!
//! println!("{} rows copied", report.rows);
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! ora2lite --user scott --dsn //localhost:1521/FREEPDB1 --output scott.db --keys --indices
//! ```

pub mod config;
pub mod ddl;
pub mod error;
pub mod mapping;
pub mod schema;
pub mod transfer;

#[cfg(test)]
mod testing;

use std::collections::HashSet;
use std::path::Path;
use std::time::{Duration, Instant};

use ora2lite_db::{OracleSource, Source, SqliteTarget};
use tracing::{debug, info, warn};

pub use config::{MigrateConfig, NameCase};
pub use error::{MigrateError, Result};

use ddl::DdlOptions;
use schema::{CatalogOptions, TableKind, TableMetadata};
use transfer::{LobSwitches, TablePlan, TransferOptions};

/// Outcome of a migration run
#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    /// Tables created from Oracle tables
    pub tables: usize,
    /// Tables created from Oracle views
    pub views: usize,
    /// Rows copied across all tables
    pub rows: u64,
    /// Indices created
    pub indices_created: usize,
    /// Indices that failed and were skipped
    pub indices_failed: usize,
    /// DDL executed against the target, in order
    pub statements: Vec<String>,
    pub duration: Duration,
}

/// Main entry point: connect to Oracle, migrate, disconnect
pub fn migrate(config: &MigrateConfig) -> Result<MigrationReport> {
    config.validate()?;

    let source = connect(config)?;
    let report = run(&source, config)?;
    source.close()?;

    Ok(report)
}

/// Open the source connection described by `config`
pub fn connect(config: &MigrateConfig) -> Result<OracleSource> {
    info!("Connecting to {} as {}", config.dsn, config.user);
    let source = OracleSource::builder(&config.user, &config.password, &config.dsn)
        .fetch_size(config.fetch_size)
        .connect()?;

    match source.server_version() {
        Ok(version) => info!("Connected to Oracle {}", version),
        Err(e) => debug!("Could not read server version: {}", e),
    }
    Ok(source)
}

/// Run the migration pipeline against an open source.
///
/// In dry-run mode the DDL is executed against an in-memory database and no
/// rows are copied.
pub fn run<S: Source>(source: &S, config: &MigrateConfig) -> Result<MigrationReport> {
    let started = Instant::now();
    let mut report = MigrationReport::default();

    let mut target = if config.dry_run {
        info!("Dry run: using an in-memory database");
        SqliteTarget::open_in_memory()?
    } else {
        info!("Creating {}", config.output.display());
        SqliteTarget::create(&config.output)?
    };

    let tables = load_tables(source, config)?;
    mapping::check_target_names(&tables, config.name_case)?;

    let ddl_options = DdlOptions::from(config);
    for table in &tables {
        let sql = ddl::create_table_sql(table, &ddl_options);
        target
            .execute_batch(&sql)
            .map_err(|source| MigrateError::CreateTable {
                table: table.name.clone(),
                source,
            })?;
        report.statements.push(sql);

        match table.kind {
            TableKind::Table => report.tables += 1,
            TableKind::View => report.views += 1,
        }
    }
    info!("Created {} tables", tables.len());

    if !config.dry_run {
        let switches = LobSwitches::from(config);
        let options = TransferOptions::from(config);
        for table in &tables {
            let plan = TablePlan::new(table, switches);
            let copied = transfer::copy_table(source, &mut target, &plan, &options)?;
            info!("Copied {} rows into {}", copied, table.name);
            report.rows += copied;
        }
    }

    if config.indices {
        for table in &tables {
            for index in &table.indexes {
                let sql = ddl::create_index_sql(table, index, config.name_case);
                match target.execute_batch(&sql) {
                    Ok(()) => {
                        report.indices_created += 1;
                        report.statements.push(sql);
                    }
                    Err(e) => {
                        warn!("Failed to create index {} on {}: {}", index.name, table.name, e);
                        report.indices_failed += 1;
                    }
                }
            }
        }
    }

    target.close()?;
    report.duration = started.elapsed();

    info!(
        "Migration complete: {} tables, {} views, {} rows in {:.2}s",
        report.tables,
        report.views,
        report.rows,
        report.duration.as_secs_f64()
    );
    Ok(report)
}

/// Introspect the schema and narrow it to the tables this run migrates
pub fn load_tables<S: Source>(source: &S, config: &MigrateConfig) -> Result<Vec<TableMetadata>> {
    let tables = schema::load_schema(source, &CatalogOptions::from(config))?;
    let found = tables.len();

    let mut tables = filter_tables(tables, &config.include_tables, &config.exclude_tables);
    debug!(
        "After filtering: {} of {} tables (include={}, exclude={})",
        tables.len(),
        found,
        config.include_tables,
        config.exclude_tables
    );
    if tables.is_empty() {
        warn!("No tables to migrate in schema {}", config.owner());
    }

    schema::prune_foreign_keys(&mut tables);
    Ok(tables)
}

/// Filter tables based on include/exclude lists (case-insensitive)
fn filter_tables(tables: Vec<TableMetadata>, include: &str, exclude: &str) -> Vec<TableMetadata> {
    let include_all = include.trim() == "*" || include.trim().is_empty();
    let include_set: HashSet<String> = if include_all {
        HashSet::new()
    } else {
        include.split(',').map(|s| s.trim().to_uppercase()).collect()
    };
    let exclude_set: HashSet<String> = exclude
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    tables
        .into_iter()
        .filter(|t| {
            let name = t.name.to_uppercase();
            let included = include_all || include_set.contains(&name);
            let excluded = exclude_set.contains(&name);
            included && !excluded
        })
        .collect()
}

/// Builder for programmatic migrations
pub struct MigrationBuilder {
    config: MigrateConfig,
}

impl MigrationBuilder {
    /// Create a new builder with Oracle credentials and connect string
    pub fn new(user: &str, password: &str, dsn: &str) -> Self {
        Self {
            config: MigrateConfig {
                user: user.to_string(),
                password: password.to_string(),
                dsn: dsn.to_string(),
                ..Default::default()
            },
        }
    }

    /// Migrate another owner's schema
    pub fn schema(mut self, owner: &str) -> Self {
        self.config.schema = Some(owner.to_string());
        self
    }

    /// Set the SQLite file to create
    pub fn output(mut self, path: impl AsRef<Path>) -> Self {
        self.config.output = path.as_ref().to_path_buf();
        self
    }

    /// Set tables to include
    pub fn include_tables(mut self, tables: &[&str]) -> Self {
        self.config.include_tables = tables.join(",");
        self
    }

    /// Set tables to exclude
    pub fn exclude_tables(mut self, tables: &[&str]) -> Self {
        self.config.exclude_tables = tables.join(",");
        self
    }

    /// Materialize views as tables
    pub fn views(mut self) -> Self {
        self.config.views = true;
        self
    }

    /// Copy BLOB and LONG RAW contents
    pub fn blobs(mut self) -> Self {
        self.config.blobs = true;
        self
    }

    /// Copy CLOB, NCLOB and LONG contents
    pub fn clobs(mut self) -> Self {
        self.config.clobs = true;
        self
    }

    /// Copy XMLTYPE contents
    pub fn xml(mut self) -> Self {
        self.config.xml = true;
        self
    }

    /// Create indices
    pub fn indices(mut self) -> Self {
        self.config.indices = true;
        self
    }

    /// Declare primary, unique and foreign keys
    pub fn keys(mut self) -> Self {
        self.config.keys = true;
        self
    }

    /// Copy at most `limit` rows per table
    pub fn row_limit(mut self, limit: u64) -> Self {
        self.config.row_limit = Some(limit);
        self
    }

    /// Rows fetched per Oracle round trip
    pub fn fetch_size(mut self, rows: u32) -> Self {
        self.config.fetch_size = rows;
        self
    }

    /// Set the identifier spelling in the target
    pub fn name_case(mut self, case: NameCase) -> Self {
        self.config.name_case = case;
        self
    }

    /// Enable dry run mode (introspect and validate DDL without writing a file)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    /// Get the configuration built so far
    pub fn config(&self) -> &MigrateConfig {
        &self.config
    }

    /// Connect to Oracle and run the migration
    pub fn migrate(self) -> Result<MigrationReport> {
        migrate(&self.config)
    }

    /// Run the migration against an already open source
    pub fn run<S: Source>(self, source: &S) -> Result<MigrationReport> {
        self.config.validate()?;
        run(source, &self.config)
    }
}
