//! Configuration settings for ora2lite

use config::{Config, Environment, File};
use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::defaults;
use crate::error::{MigrateError, Result};

/// How source identifiers are spelled in the SQLite file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameCase {
    /// Keep the dictionary spelling (usually upper case)
    #[default]
    Preserve,
    /// Lower-case every identifier
    Lower,
    /// snake_case every identifier
    Snake,
}

impl NameCase {
    /// Apply this policy to a source identifier.
    pub fn apply(&self, name: &str) -> String {
        match self {
            NameCase::Preserve => name.to_string(),
            NameCase::Lower => name.to_lowercase(),
            NameCase::Snake => name.to_snake_case(),
        }
    }
}

impl FromStr for NameCase {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(NameCase::Preserve),
            "lower" => Ok(NameCase::Lower),
            "snake" => Ok(NameCase::Snake),
            other => Err(format!(
                "unknown name case '{}' (expected preserve, lower or snake)",
                other
            )),
        }
    }
}

/// Main configuration struct for a migration run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrateConfig {
    /// Oracle user name
    #[serde(default)]
    pub user: String,

    /// Oracle password
    #[serde(default, skip_serializing)]
    pub password: String,

    /// Oracle connect string (Easy Connect, TNS alias or descriptor)
    #[serde(default)]
    pub dsn: String,

    /// Schema owner to migrate (defaults to the user)
    #[serde(default)]
    pub schema: Option<String>,

    /// SQLite file to create; an existing file is replaced
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Tables to include (comma-separated, or "*" for all)
    #[serde(default = "default_include_tables")]
    pub include_tables: String,

    /// Tables to exclude (comma-separated)
    #[serde(default = "default_exclude_tables")]
    pub exclude_tables: String,

    /// Materialize views as tables
    #[serde(default = "default_views")]
    pub views: bool,

    /// Copy BLOB and LONG RAW contents (NULL otherwise)
    #[serde(default = "default_blobs")]
    pub blobs: bool,

    /// Copy CLOB, NCLOB and LONG contents (NULL otherwise)
    #[serde(default = "default_clobs")]
    pub clobs: bool,

    /// Copy XMLTYPE contents as text (NULL otherwise)
    #[serde(default = "default_xml")]
    pub xml: bool,

    /// Create indices after the data is loaded
    #[serde(default = "default_indices")]
    pub indices: bool,

    /// Declare primary, unique and foreign keys
    #[serde(default = "default_keys")]
    pub keys: bool,

    /// Copy at most this many rows per table
    #[serde(default)]
    pub row_limit: Option<u64>,

    /// Rows fetched per Oracle round trip
    #[serde(default = "default_fetch_size")]
    pub fetch_size: u32,

    /// Rows between progress log lines
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,

    /// Identifier spelling in the target
    #[serde(default)]
    pub name_case: NameCase,

    /// Dry run mode - introspect and print DDL without writing a file
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

// Default value functions for serde
fn default_output() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_FILE)
}
fn default_include_tables() -> String {
    defaults::INCLUDE_TABLES.to_string()
}
fn default_exclude_tables() -> String {
    defaults::EXCLUDE_TABLES.to_string()
}
fn default_views() -> bool {
    defaults::VIEWS
}
fn default_blobs() -> bool {
    defaults::BLOBS
}
fn default_clobs() -> bool {
    defaults::CLOBS
}
fn default_xml() -> bool {
    defaults::XML
}
fn default_indices() -> bool {
    defaults::INDICES
}
fn default_keys() -> bool {
    defaults::KEYS
}
fn default_fetch_size() -> u32 {
    defaults::FETCH_SIZE
}
fn default_progress_interval() -> u64 {
    defaults::PROGRESS_INTERVAL
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            password: String::new(),
            dsn: String::new(),
            schema: None,
            output: default_output(),
            include_tables: default_include_tables(),
            exclude_tables: default_exclude_tables(),
            views: default_views(),
            blobs: default_blobs(),
            clobs: default_clobs(),
            xml: default_xml(),
            indices: default_indices(),
            keys: default_keys(),
            row_limit: None,
            fetch_size: default_fetch_size(),
            progress_interval: default_progress_interval(),
            name_case: NameCase::default(),
            dry_run: default_dry_run(),
            log_level: None,
        }
    }
}

impl MigrateConfig {
    /// Schema owner whose objects are migrated, upper-cased as the
    /// dictionary stores it.
    pub fn owner(&self) -> String {
        self.schema
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.user)
            .trim()
            .to_uppercase()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MigrateConfig = toml::from_str(&content).map_err(|e| {
            MigrateError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name("ora2lite").required(false));
        }

        // ORA2LITE_PASSWORD, ORA2LITE_DSN, ORA2LITE_ROW_LIMIT, ...
        builder = builder.add_source(Environment::with_prefix("ORA2LITE").try_parsing(true));

        let config: MigrateConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.user.trim().is_empty() {
            return Err(MigrateError::ValidationError("user is required".into()));
        }

        if self.dsn.trim().is_empty() {
            return Err(MigrateError::ValidationError(
                "dsn (Oracle connect string) is required".into(),
            ));
        }

        if !self.dry_run && self.output.as_os_str().is_empty() {
            return Err(MigrateError::ValidationError("output is required".into()));
        }

        if self.fetch_size == 0 {
            return Err(MigrateError::ValidationError(
                "fetch_size must be at least 1".into(),
            ));
        }

        if self.progress_interval == 0 {
            return Err(MigrateError::ValidationError(
                "progress_interval must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MigrateConfig::default();
        assert_eq!(config.include_tables, "*");
        assert!(!config.blobs);
        assert!(!config.clobs);
        assert!(!config.xml);
        assert_eq!(config.fetch_size, 500);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_validation_missing_user() {
        let config = MigrateConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_missing_dsn() {
        let config = MigrateConfig {
            user: "scott".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("dsn"));
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_owner_defaults_to_user() {
        let mut config = MigrateConfig {
            user: "scott".into(),
            ..Default::default()
        };
        assert_eq!(config.owner(), "SCOTT");

        config.schema = Some("hr".into());
        assert_eq!(config.owner(), "HR");
    }

    #[test]
    fn test_config_from_toml() {
        let toml_content = r#"
            user = "scott"
            dsn = "//localhost:1521/FREEPDB1"
            output = "scott.db"
            clobs = true
            row_limit = 1000
            name_case = "snake"
            log_level = "debug"
        "#;
        let config: MigrateConfig = toml::from_str(toml_content).unwrap();
        assert!(config.clobs);
        assert!(!config.blobs);
        assert_eq!(config.row_limit, Some(1000));
        assert_eq!(config.name_case, NameCase::Snake);
        assert_eq!(config.log_level, Some("debug".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ora2lite.toml");
        std::fs::write(&path, "user = \"hr\"\ndsn = \"orcl\"\nkeys = true\n").unwrap();

        let config = MigrateConfig::from_file(&path).unwrap();
        assert_eq!(config.user, "hr");
        assert!(config.keys);
        assert!(!config.indices);
    }

    #[test]
    fn test_name_case() {
        assert_eq!(NameCase::Preserve.apply("ORDER_ITEMS"), "ORDER_ITEMS");
        assert_eq!(NameCase::Lower.apply("ORDER_ITEMS"), "order_items");
        assert_eq!(NameCase::Snake.apply("OrderItems"), "order_items");
        assert_eq!("Lower".parse::<NameCase>().unwrap(), NameCase::Lower);
        assert!("camel".parse::<NameCase>().is_err());
    }
}
