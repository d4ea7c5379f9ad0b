//! Configuration schema types for `tokensync.toml`
//!
//! Defines the structure and validation rules for a token sync project.

use crate::output::{OutputPaths, DEFAULT_CSS_FILE, DEFAULT_JS_FILE, DEFAULT_OUT_DIR};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default Figma REST API host.
pub const DEFAULT_HOST: &str = "https://api.figma.com";

/// Remote variable store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// API base URL, without trailing path
    #[serde(default = "default_host")]
    pub host: String,
    /// Read published variables instead of local ones
    #[serde(default)]
    pub published: bool,
    /// Send audit corrections back to Figma
    #[serde(default = "default_true")]
    pub write_back: bool,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self { host: default_host(), published: false, write_back: true }
    }
}

/// Artifact output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for artifacts and snapshots
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Stylesheet file name
    #[serde(default = "default_css_file")]
    pub css_file: String,
    /// JS module file name
    #[serde(default = "default_js_file")]
    pub js_file: String,
    /// Write raw response and payload snapshots for debugging
    #[serde(default = "default_true")]
    pub snapshots: bool,
}

fn default_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUT_DIR)
}

fn default_css_file() -> String {
    DEFAULT_CSS_FILE.to_string()
}

fn default_js_file() -> String {
    DEFAULT_JS_FILE.to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            css_file: default_css_file(),
            js_file: default_js_file(),
            snapshots: true,
        }
    }
}

impl OutputConfig {
    pub fn paths(&self) -> OutputPaths {
        OutputPaths::new(&self.dir, &self.css_file, &self.js_file)
    }
}

/// Complete tokensync.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "output.css_file")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tokensync.toml: '{}' {}", self.field, self.message)
    }
}

fn is_bare_file_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

impl SyncConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        let host = self.remote.host.trim();
        if !(host.starts_with("https://") || host.starts_with("http://")) {
            errors.push(ConfigValidationError {
                field: "remote.host".to_string(),
                message: "must be an http(s) URL".to_string(),
            });
        }

        if self.output.dir.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "output.dir".to_string(),
                message: "must be a non-empty path".to_string(),
            });
        }

        for (field, name) in
            [("output.css_file", &self.output.css_file), ("output.js_file", &self.output.js_file)]
        {
            if !is_bare_file_name(name) {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "must be a file name without directories".to_string(),
                });
            }
        }

        if self.output.css_file == self.output.js_file {
            errors.push(ConfigValidationError {
                field: "output.js_file".to_string(),
                message: "must differ from output.css_file".to_string(),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Host without trailing slashes.
    pub fn host(&self) -> &str {
        self.remote.host.trim().trim_end_matches('/')
    }
}
