//! CLI entry point for ora2lite

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ora2lite::config::{MigrateConfig, NameCase};
use ora2lite::mapping::TypeResolver;
use ora2lite::{MigrateError, MigrationReport};

#[derive(Parser)]
#[command(name = "ora2lite")]
#[command(about = "Migrate an Oracle schema and its data into a SQLite database file")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Oracle user name
    #[arg(short, long)]
    user: Option<String>,

    /// Oracle password
    #[arg(short, long, env = "ORA2LITE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Oracle connect string, e.g. //host:1521/service or a TNS alias
    #[arg(short, long)]
    dsn: Option<String>,

    /// Schema owner to migrate (defaults to the user)
    #[arg(short, long)]
    schema: Option<String>,

    /// SQLite file to create (replaced if it exists)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Materialize views as tables
    #[arg(long)]
    views: bool,

    /// Copy BLOB and LONG RAW contents
    #[arg(long)]
    blobs: bool,

    /// Copy CLOB, NCLOB and LONG contents
    #[arg(long)]
    clobs: bool,

    /// Copy XMLTYPE contents as text
    #[arg(long)]
    xml: bool,

    /// Create indices
    #[arg(long)]
    indices: bool,

    /// Declare primary, unique and foreign keys
    #[arg(long)]
    keys: bool,

    /// Copy at most this many rows per table
    #[arg(long, value_name = "ROWS")]
    limit: Option<u64>,

    /// Only migrate these tables
    #[arg(long, value_delimiter = ',')]
    tables: Vec<String>,

    /// Skip these tables
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Identifier spelling in SQLite: preserve, lower or snake
    #[arg(long)]
    name_case: Option<NameCase>,

    /// Rows fetched per Oracle round trip
    #[arg(long, value_name = "ROWS")]
    fetch_size: Option<u32>,

    /// Dry run - introspect and print DDL without writing a file
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate schema and data (default)
    Migrate,
    /// Inspect schema (show introspected tables for debugging)
    Inspect {
        /// Print tables as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            match e.downcast_ref::<MigrateError>() {
                Some(err) if err.is_usage_error() => {
                    eprintln!();
                    eprintln!("{}", Cli::command().render_usage());
                    ExitCode::from(2)
                }
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = MigrateConfig::load(cli.config.as_deref())?;

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    apply_overrides(&mut config, &cli);

    match &cli.command {
        Some(Commands::Inspect { json }) => inspect_schema(&config, *json),
        Some(Commands::Migrate) | None => run_migration(&config),
    }
}

/// Apply CLI overrides
fn apply_overrides(config: &mut MigrateConfig, cli: &Cli) {
    if let Some(user) = &cli.user {
        config.user = user.clone();
    }
    if let Some(password) = &cli.password {
        config.password = password.clone();
    }
    if let Some(dsn) = &cli.dsn {
        config.dsn = dsn.clone();
    }
    if let Some(schema) = &cli.schema {
        config.schema = Some(schema.clone());
    }
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if !cli.tables.is_empty() {
        config.include_tables = cli.tables.join(",");
    }
    if !cli.exclude.is_empty() {
        config.exclude_tables = cli.exclude.join(",");
    }
    if let Some(limit) = cli.limit {
        config.row_limit = Some(limit);
    }
    if let Some(case) = cli.name_case {
        config.name_case = case;
    }
    if let Some(rows) = cli.fetch_size {
        config.fetch_size = rows;
    }

    config.views |= cli.views;
    config.blobs |= cli.blobs;
    config.clobs |= cli.clobs;
    config.xml |= cli.xml;
    config.indices |= cli.indices;
    config.keys |= cli.keys;
    config.dry_run |= cli.dry_run;
}

fn run_migration(config: &MigrateConfig) -> Result<()> {
    info!("Migrating schema {} to {:?}", config.owner(), config.output);
    let report = ora2lite::migrate(config)?;

    if config.dry_run {
        println!("Dry run mode - would execute:");
        for statement in &report.statements {
            println!("{};", statement);
            println!();
        }
        println!("To execute, run without --dry-run");
        return Ok(());
    }

    print_summary(config, &report);
    Ok(())
}

fn print_summary(config: &MigrateConfig, report: &MigrationReport) {
    println!();
    println!("Migration Summary");
    println!("=================");
    println!("Schema: {}", config.owner());
    println!("Output: {}", config.output.display());
    println!("Tables created: {}", report.tables);
    if config.views {
        println!("Views materialized: {}", report.views);
    }
    println!("Rows copied: {}", report.rows);
    if config.indices {
        println!("Indices created: {}", report.indices_created);
        println!("Indices failed: {}", report.indices_failed);
    }
    println!("Duration: {:.2}s", report.duration.as_secs_f64());
}

fn inspect_schema(config: &MigrateConfig, json: bool) -> Result<()> {
    config.validate()?;
    let source = ora2lite::connect(config)?;
    let tables = ora2lite::load_tables(&source, config)?;
    source.close()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tables)?);
        return Ok(());
    }

    println!("Introspected {} tables:\n", tables.len());
    for table in &tables {
        println!("Table: {} ({:?})", table.name, table.kind);
        println!("  Columns:");
        for col in &table.columns {
            let nullable = if col.nullable { "NULL" } else { "NOT NULL" };
            println!(
                "    - {} {} -> {} {}",
                col.name,
                col.data_type,
                TypeResolver::resolve(col),
                nullable
            );
            if let Some(default) = &col.default_value {
                println!("      DEFAULT {}", default);
            }
        }
        if let Some(pk) = &table.primary_key {
            println!("  Primary Key: {} {:?}", pk.name, pk.columns);
        }
        for uk in &table.unique_keys {
            println!("  Unique Key: {} {:?}", uk.name, uk.columns);
        }
        if !table.indexes.is_empty() {
            println!("  Indexes:");
            for idx in &table.indexes {
                let unique = if idx.unique { "UNIQUE " } else { "" };
                println!("    - {}INDEX {} ({:?})", unique, idx.name, idx.columns);
            }
        }
        if !table.foreign_keys.is_empty() {
            println!("  Foreign Keys:");
            for fk in &table.foreign_keys {
                println!(
                    "    - {} {:?} -> {}{:?}",
                    fk.name, fk.columns, fk.referenced_table, fk.referenced_columns
                );
            }
        }
        println!();
    }

    Ok(())
}
