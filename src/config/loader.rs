//! Configuration loading and discovery for `tokensync.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::SyncConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "tokensync.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse tokensync.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
    /// File key or access token not provided
    #[error("{} not found in environment variables or arguments. Set them in your shell or a .env file", .0.join(" and "))]
    MissingCredentials(Vec<&'static str>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Read published instead of local variables
    pub published: Option<bool>,
    /// Enable or disable write-back
    pub write_back: Option<bool>,
    /// Override API host
    pub host: Option<String>,
}

/// Find tokensync.toml by walking up from the current working directory.
///
/// # Returns
/// - `Some(path)` if a tokensync.toml file is found
/// - `None` if no config file is found
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find tokensync.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a tokensync.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns a default
/// configuration.
///
/// Output paths are taken as written, relative to the working directory.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("design/tokensync.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<SyncConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("Loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<SyncConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: SyncConfig = toml::from_str(&contents)?;
    check(&config)?;
    Ok(config)
}

fn check(config: &SyncConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(())
}

/// Configuration used when no tokensync.toml is found.
pub fn default_config() -> SyncConfig {
    SyncConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The merged
/// result is validated again.
pub fn merge_cli_overrides(config: &mut SyncConfig, overrides: &CliOverrides) -> Result<(), ConfigError> {
    if let Some(ref out) = overrides.out {
        config.output.dir = out.clone();
    }

    if let Some(published) = overrides.published {
        config.remote.published = published;
    }

    if let Some(write_back) = overrides.write_back {
        config.remote.write_back = write_back;
    }

    if let Some(ref host) = overrides.host {
        config.remote.host = host.clone();
    }

    check(config)
}
