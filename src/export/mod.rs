//! Artifact exporters for design tokens.
//!
//! A [`TokenTable`] is built once from the audited variables and then
//! rendered by each exporter:
//!
//! - **CSS**: `design-tokens.css`, custom properties on `:root`
//! - **JS**: `designTokens.js`, a frozen ES module with getters per mode
//!
//! # Example
//!
//! ```ignore
//! use tokensync::export::{render_artifacts, ExportOptions, TokenTable};
//!
//! let table = TokenTable::build(&response.meta, &report.ramps)?;
//! let artifacts = render_artifacts(&table, &ExportOptions::default())?;
//! ```

pub mod css;
pub mod js;
pub mod tokens;

pub use css::CssExporter;
pub use js::JsExporter;
pub use tokens::{PrimitiveToken, PrimitiveValue, SemanticToken, TokenTable};

use crate::color::ColorError;
use crate::naming::NamingError;
use crate::resolve::ResolveError;
use thiserror::Error;

/// Common error type for export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Token name cannot be turned into a CSS name
    #[error("naming error: {0}")]
    Naming(#[from] NamingError),
    /// Alias could not be followed to a primitive
    #[error("alias error: {0}")]
    Resolve(#[from] ResolveError),
    /// Literal color could not be rendered
    #[error("invalid color on '{variable}': {source}")]
    Color {
        variable: String,
        #[source]
        source: ColorError,
    },
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Default location the JS usage banner tells consumers to import from.
pub const DEFAULT_JS_IMPORT_PATH: &str = "generated/designTokens.js";

/// Options for export operations.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Module path shown in the JS usage banner
    pub js_import_path: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { js_import_path: DEFAULT_JS_IMPORT_PATH.to_string() }
    }
}

/// Trait for export format implementations.
pub trait Exporter {
    /// Render the token table to a string.
    fn export_to_string(&self, tokens: &TokenTable, options: &ExportOptions) -> Result<String>;

    /// Get the format name for this exporter.
    fn format_name(&self) -> &'static str;

    /// Get the default file extension for this format.
    fn extension(&self) -> &'static str;
}

/// Render a FLOAT the way JavaScript prints a number.
///
/// Shortest round-trip digits; exponent form below `1e-6` and from `1e21`
/// up (`1e-7`, `1.5e+21`), plain decimals otherwise.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude < 1e-6 || magnitude >= 1e21 {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }
    value.to_string()
}

/// Rendered contents of both artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub css: String,
    pub js: String,
}

/// Render both artifacts from one token table.
pub fn render_artifacts(tokens: &TokenTable, options: &ExportOptions) -> Result<Artifacts> {
    Ok(Artifacts {
        css: CssExporter::new().export_to_string(tokens, options)?,
        js: JsExporter::new().export_to_string(tokens, options)?,
    })
}
