//! Top-level error type for a sync run

use crate::color::ColorError;
use crate::config::ConfigError;
use crate::export::ExportError;
use crate::naming::NamingError;
use crate::output::OutputError;
use crate::remote::RemoteError;
use crate::resolve::ResolveError;
use thiserror::Error;

/// Any failure that aborts a run.
///
/// Every variant is fatal: once one is returned no artifact is written.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("variable names must be unique. Please rename one of the '{0}' variables in Figma")]
    DuplicateName(String),

    #[error("new Figma variable resolvedType '{resolved_type}' found on '{variable}'. This script needs to be updated to handle it")]
    UnknownResolvedType { variable: String, resolved_type: String },

    #[error("variable '{variable}' in mode '{mode}' is typed {expected} but holds a {found} value")]
    SchemaDrift { variable: String, mode: String, expected: String, found: String },

    #[error("the following variables are aliased to variables that no longer exist. Please fix them in Figma: {}", .0.join(", "))]
    BrokenAlias(Vec<String>),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("invalid color on '{variable}': {source}")]
    InvalidColor {
        variable: String,
        #[source]
        source: ColorError,
    },

    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error("failed to fetch variables from Figma: {0}")]
    RemoteFetch(#[source] RemoteError),

    #[error("failed to write variables to Figma: {0}")]
    RemoteWrite(#[source] RemoteError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    pub(crate) fn invalid_color(variable: &str, source: ColorError) -> Self {
        SyncError::InvalidColor { variable: variable.to_string(), source }
    }
}
