//! Configuration for a migration run

pub mod defaults;
mod settings;

pub use settings::{MigrateConfig, NameCase};
