//! Stylesheet export.
//!
//! All tokens become custom properties on `:root`. Semantic tokens come
//! first, one block per mode, each pointing at a primitive through `var()`.
//! Primitives follow under a banner discouraging their direct use.
//!
//! # Example Output
//!
//! ```css
//! :root {
//!     --DT-Light-Mode-Brand-Primary: var(--DT-__primitive-Cobalt-50);
//!     --DT-__primitive-Cobalt-50: #006492;
//! }
//! ```
//!
//! Boolean tokens have no CSS meaning and are left out.

use crate::export::{format_number, ExportOptions, Exporter, PrimitiveValue, Result, TokenTable};
use crate::naming::{css_name, css_var, NAMESPACE, PRIMITIVE};

/// Stylesheet exporter.
#[derive(Debug, Default)]
pub struct CssExporter;

impl CssExporter {
    pub fn new() -> Self {
        Self
    }
}

fn css_line(group: &str, name: &str, value: &str) -> Result<String> {
    Ok(format!("    {}: {};", css_name(group, name)?, value))
}

impl Exporter for CssExporter {
    fn export_to_string(&self, tokens: &TokenTable, _options: &ExportOptions) -> Result<String> {
        let mut out = format!(
            ":root {{\n\n    /*\n        Case-Sensitive! Call these like: background-color: var(--{}Light-Mode-Brand-Primary); \n    */\n",
            NAMESPACE
        );

        for (mode, semantic) in tokens.modes() {
            let lines = semantic
                .iter()
                .map(|token| css_line(mode, &token.name, &css_var(PRIMITIVE, &token.primitive)?))
                .collect::<Result<Vec<_>>>()?;
            out.push_str(&lines.join("\n"));
            out.push('\n');
        }

        let mut primitive_lines = Vec::with_capacity(tokens.primitives().len());
        for token in tokens.primitives() {
            let value = match &token.value {
                PrimitiveValue::Color(hex) => hex.clone(),
                PrimitiveValue::Float(number) => format_number(*number),
                PrimitiveValue::String(text) => text.clone(),
                PrimitiveValue::Boolean(_) => continue,
            };
            primitive_lines.push(css_line(PRIMITIVE, &token.name, &value)?);
        }

        out.push_str(&format!(
            "\n    /*\n        Don't use these! Use a property from above instead. If you absolutely have to use one of these, please discuss with the UX team so they can update their designs.\n        To temporarily unblock yourself, you could call one of these like var(--{}{}-Cobalt-70);\n    */\n",
            NAMESPACE, PRIMITIVE
        ));
        out.push_str(&primitive_lines.join("\n"));
        out.push_str("\n}");

        Ok(out)
    }

    fn format_name(&self) -> &'static str {
        "css"
    }

    fn extension(&self) -> &'static str {
        "css"
    }
}
