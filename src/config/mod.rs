//! Configuration management - application settings, tier limits, and the
//! database layer.

/// Database connection and table creation
pub mod database;

use crate::{
    core::limits::LimitConfig,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Default reaction debounce window in milliseconds.
const DEFAULT_DEBOUNCE_MS: u64 = 750;

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,
    /// Tier limits, from config.toml or built-in defaults
    pub limits: LimitConfig,
    /// Reaction debounce window in milliseconds
    pub debounce_ms: u64,
}

/// On-disk shape of config.toml. Every section is optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    limits: Option<LimitConfig>,
    #[serde(default)]
    reconciler: Option<ReconcilerConfig>,
}

#[derive(Debug, Deserialize)]
struct ReconcilerConfig {
    debounce_ms: Option<u64>,
}

/// Loads the application configuration from the environment and, when
/// present, `config.toml` (overridable via `CONFIG_PATH`).
///
/// A missing config file is not an error; built-in defaults apply. A file
/// that exists but fails to parse is an error, since silently ignoring it
/// would run the bot with limits the operator did not intend.
pub fn load_app_configuration() -> Result<AppConfig> {
    let database_url = database::get_database_url();

    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let file = load_file_config(&path)?;

    let limits = file.limits.unwrap_or_default();
    let debounce_ms = file
        .reconciler
        .and_then(|r| r.debounce_ms)
        .unwrap_or(DEFAULT_DEBOUNCE_MS);

    info!(database_url, debounce_ms, "configuration loaded");
    Ok(AppConfig {
        database_url,
        limits,
        debounce_ms,
    })
}

fn load_file_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(FileConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("failed to read {}: {e}", path.display()),
    })?;
    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("failed to parse {}: {e}", path.display()),
    })
}
