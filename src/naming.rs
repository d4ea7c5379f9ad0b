//! CSS custom-property naming for design tokens
//!
//! A token is addressed by a group (a mode name such as `Light Mode`, or the
//! [`PRIMITIVE`] marker) and its Figma variable name:
//!
//! ```
//! use tokensync::naming::{css_name, css_var};
//!
//! assert_eq!(css_name("Light Mode", "Brand/Primary").unwrap(), "--DT-Light-Mode-Brand-Primary");
//! assert_eq!(css_var("Light Mode", "Brand/Primary").unwrap(), "var(--DT-Light-Mode-Brand-Primary)");
//! ```

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Prefix applied to every generated custom property.
pub const NAMESPACE: &str = "DT-";

/// Group used for primitive (non-aliased) tokens.
pub const PRIMITIVE: &str = "__primitive";

/// Error type for name derivation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// Group or variable name was empty
    #[error("missing argument(s): group '{group}' and variable name '{name}' are both required")]
    MissingArgument { group: String, name: String },
}

fn non_word() -> &'static Regex {
    static NON_WORD: OnceLock<Regex> = OnceLock::new();
    NON_WORD.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]").expect("static pattern is valid"))
}

/// Build the custom-property name for a token.
///
/// Every character outside `[A-Za-z0-9_]` becomes `-`, so `Brand/Primary`
/// in `Light Mode` becomes `--DT-Light-Mode-Brand-Primary`.
///
/// # Errors
///
/// Returns `NamingError::MissingArgument` if either argument is empty.
pub fn css_name(group: &str, name: &str) -> Result<String, NamingError> {
    if group.is_empty() || name.is_empty() {
        return Err(NamingError::MissingArgument { group: group.to_string(), name: name.to_string() });
    }

    let raw = format!("--{}{}-{}", NAMESPACE, group, name);
    Ok(non_word().replace_all(&raw, "-").into_owned())
}

/// Build the `var(...)` reference for a token.
pub fn css_var(group: &str, name: &str) -> Result<String, NamingError> {
    Ok(format!("var({})", css_name(group, name)?))
}
