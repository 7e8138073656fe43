//! Configuration data structures for megagraph.
//!
//! Defines the YAML config format: database location, which object types
//! are Mega types, and the default log filter. Every field has a default so
//! a partial (or empty) file is valid.

use serde::{Deserialize, Serialize};

use crate::observability::DEFAULT_LOG_FILTER;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration.
///
/// Loaded from a YAML file, then environment variables, then CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MegaGraphConfig {
    /// Config format version (currently "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub mega: MegaConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for MegaGraphConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            database: DatabaseConfig::default(),
            mega: MegaConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Where the relationship database lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite path, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Object types that may be related to objects of their own type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MegaConfig {
    #[serde(default = "default_mega_types")]
    pub types: Vec<String>,
}

impl Default for MegaConfig {
    fn default() -> Self {
        Self {
            types: default_mega_types(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_version() -> String {
    "1.0".to_string()
}

fn default_db_path() -> String {
    "megagraph.db".to_string()
}

fn default_mega_types() -> Vec<String> {
    vec!["Program".to_string()]
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
