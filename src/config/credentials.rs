//! Figma file key and personal access token

use super::loader::ConfigError;
use std::fmt;

/// Environment variable holding the Figma file key.
pub const FILE_KEY_VAR: &str = "FIGMA_FILE_KEY";
/// Environment variable holding the personal access token.
pub const TOKEN_VAR: &str = "FIGMA_PAT";

/// Credentials for one Figma file.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub file_key: String,
    pub token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("file_key", &self.file_key)
            .field("token", &"<redacted>")
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Credentials {
    /// Build credentials, requiring both parts to be present and non-blank.
    pub fn new(file_key: Option<String>, token: Option<String>) -> Result<Self, ConfigError> {
        match (non_empty(file_key), non_empty(token)) {
            (Some(file_key), Some(token)) => Ok(Self { file_key, token }),
            (file_key, token) => {
                let mut missing = Vec::new();
                if file_key.is_none() {
                    missing.push(FILE_KEY_VAR);
                }
                if token.is_none() {
                    missing.push(TOKEN_VAR);
                }
                Err(ConfigError::MissingCredentials(missing))
            }
        }
    }
}
