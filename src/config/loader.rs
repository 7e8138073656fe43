//! Multi-source config loading: YAML file, then environment overrides.

use std::path::Path;

use crate::config::schema::MegaGraphConfig;
use crate::error::{MegaGraphError, Result};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "megagraph.yaml";

pub const ENV_DB_PATH: &str = "MEGAGRAPH_DB";
pub const ENV_MEGA_TYPES: &str = "MEGAGRAPH_MEGA_TYPES";

/// Load configuration.
///
/// An explicit `path` must exist. Without one, `megagraph.yaml` in the
/// working directory is used if present, defaults otherwise. Environment
/// overrides are applied last.
pub fn load_config(path: Option<&Path>) -> Result<MegaGraphConfig> {
    let config = match path {
        Some(p) => read_config_file(p)?,
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if fallback.is_file() {
                read_config_file(fallback)?
            } else {
                MegaGraphConfig::default()
            }
        }
    };
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Parse a YAML config file.
pub fn read_config_file(path: &Path) -> Result<MegaGraphConfig> {
    let text = std::fs::read_to_string(path)?;
    let config: MegaGraphConfig = serde_yaml::from_str(&text)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Apply `MEGAGRAPH_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(mut config: MegaGraphConfig, lookup: F) -> Result<MegaGraphConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(ENV_DB_PATH) {
        config.database.path = path;
    }
    if let Some(raw) = lookup(ENV_MEGA_TYPES) {
        let types: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
        if types.is_empty() {
            return Err(MegaGraphError::Config(format!(
                "{ENV_MEGA_TYPES} is set but lists no types"
            )));
        }
        config.mega.types = types;
    }
    Ok(config)
}
