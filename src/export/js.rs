//! JavaScript module export.
//!
//! Produces an ES module whose default export is a frozen `DESIGN_TOKENS`
//! object. Each mode is an object of getters returning the primitive it
//! aliases, so the values stay in sync with `__primitive`:
//!
//! ```js
//! const DESIGN_TOKENS = {
//!     'Light Mode': {
//!         get 'Brand/Primary'() {return DESIGN_TOKENS.__primitive['Cobalt/50'];}
//!     },
//!     __primitive: {
//!         'Cobalt/50': '#006492'
//!     }
//! }
//! ```

use crate::export::{format_number, ExportOptions, Exporter, PrimitiveValue, Result, TokenTable};
use crate::naming::PRIMITIVE;

/// Name of the exported object.
pub const JS_OBJECT_NAME: &str = "DESIGN_TOKENS";

/// JavaScript module exporter.
#[derive(Debug, Default)]
pub struct JsExporter;

impl JsExporter {
    pub fn new() -> Self {
        Self
    }
}

/// Quote `value` as a single-quoted JS string literal.
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn js_value(value: &PrimitiveValue) -> String {
    match value {
        PrimitiveValue::Color(hex) => js_string(hex),
        PrimitiveValue::Float(number) => format_number(*number),
        PrimitiveValue::String(text) => js_string(text),
        PrimitiveValue::Boolean(flag) => flag.to_string(),
    }
}

impl Exporter for JsExporter {
    fn export_to_string(&self, tokens: &TokenTable, options: &ExportOptions) -> Result<String> {
        let mut out = format!(
            "\"use strict\";\n\n/*\n    Import these at the top of your file like this:\n        import designTokens from '{}';\n    then you can call them like this:\n        const someColor = designTokens['Light Mode']['Brand/Primary'];\n */\nconst {} = {{\n",
            options.js_import_path, JS_OBJECT_NAME
        );

        for (mode, semantic) in tokens.modes() {
            let lines: Vec<String> = semantic
                .iter()
                .map(|token| {
                    format!(
                        "        get {}() {{return {}.{}[{}];}}",
                        js_string(&token.name),
                        JS_OBJECT_NAME,
                        PRIMITIVE,
                        js_string(&token.primitive)
                    )
                })
                .collect();
            out.push_str(&format!("\n    {}: {{\n{}\n    }},\n", js_string(mode), lines.join(",\n")));
        }

        let primitive_lines: Vec<String> = tokens
            .primitives()
            .iter()
            .map(|token| format!("        {}: {}", js_string(&token.name), js_value(&token.value)))
            .collect();

        out.push_str(&format!(
            "\n    /*\n        Don't use these! Use a property from above instead.\n        If you absolutely have to use one of these, please discuss with the UX team so they can update their designs.\n        To temporarily unblock yourself, you could call one of these like designTokens.{}['Cobalt/70'];\n    */\n    {}: {{\n{}\n    }}\n}}\nexport default {};\n\n",
            PRIMITIVE,
            PRIMITIVE,
            primitive_lines.join(",\n"),
            JS_OBJECT_NAME
        ));

        out.push_str(&format!(
            "// Prevent adding or deleting properties on this object because they won't be in sync w/ Figma or the generated CSS file.\nObject.freeze({});\nObject.freeze({}.{});",
            JS_OBJECT_NAME, JS_OBJECT_NAME, PRIMITIVE
        ));
        for (mode, _) in tokens.modes() {
            out.push_str(&format!("\nObject.freeze({}[{}]);", JS_OBJECT_NAME, js_string(mode)));
        }

        Ok(out)
    }

    fn format_name(&self) -> &'static str {
        "js"
    }

    fn extension(&self) -> &'static str {
        "js"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::audit;
    use crate::models::VariablesResponse;

    const FIXTURE: &str = include_str!("../../tests/fixtures/variables_response.json");

    fn render() -> String {
        let meta = serde_json::from_str::<VariablesResponse>(FIXTURE).unwrap().meta;
        let report = audit(&meta).unwrap();
        let table = TokenTable::build(&meta, &report.ramps).unwrap();
        JsExporter::new().export_to_string(&table, &ExportOptions::default()).unwrap()
    }

    fn render_with_spacing(value: f64) -> String {
        let mut raw: serde_json::Value = serde_json::from_str(FIXTURE).unwrap();
        raw["meta"]["variables"]["VariableID:1:5"]["valuesByMode"]["1:0"] = serde_json::json!(value);
        let meta = serde_json::from_value::<VariablesResponse>(raw).unwrap().meta;
        let report = audit(&meta).unwrap();
        let table = TokenTable::build(&meta, &report.ramps).unwrap();
        JsExporter::new().export_to_string(&table, &ExportOptions::default()).unwrap()
    }

    #[test]
    fn test_float_rendering() {
        assert!(render_with_spacing(0.5).contains("        'Spacing/Medium': 0.5,\n"));
        assert!(render_with_spacing(0.0000001).contains("        'Spacing/Medium': 1e-7,\n"));
        assert!(render_with_spacing(1e21).contains("        'Spacing/Medium': 1e+21,\n"));
    }

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string("Brand/Primary"), "'Brand/Primary'");
        assert_eq!(js_string("Kid's Mode"), "'Kid\\'s Mode'");
        assert_eq!(js_string("a\\b\nc"), "'a\\\\b\\nc'");
    }

    #[test]
    fn test_header_and_modes() {
        let js = render();
        assert!(js.starts_with("\"use strict\";\n\n/*\n    Import these at the top of your file like this:\n        import designTokens from 'generated/designTokens.js';\n"));
        assert!(js.contains(
            "const DESIGN_TOKENS = {\n\n    'Light Mode': {\n        get 'Brand/Primary'() {return DESIGN_TOKENS.__primitive['Cobalt/50'];},\n        get 'Surface/Background'() {return DESIGN_TOKENS.__primitive['Basic/White'];}\n    },\n"
        ));
        assert!(js.contains("\n    'Dark Mode': {\n"));
    }

    #[test]
    fn test_primitive_values() {
        let js = render();
        assert!(js.contains("    __primitive: {\n        'Cobalt/10': '#CCE0E9',\n"));
        assert!(js.contains("        'Spacing/Medium': 16,\n"));
        assert!(js.contains("        'Font/Family': 'Inter',\n"));
        assert!(js.contains("        'Feature/Rounded': true\n    }\n}\nexport default DESIGN_TOKENS;\n"));
    }

    #[test]
    fn test_freezes_every_object() {
        let js = render();
        assert!(js.ends_with(
            "Object.freeze(DESIGN_TOKENS);\nObject.freeze(DESIGN_TOKENS.__primitive);\nObject.freeze(DESIGN_TOKENS['Light Mode']);\nObject.freeze(DESIGN_TOKENS['Dark Mode']);"
        ));
    }

    #[test]
    fn test_import_path_option() {
        let options = ExportOptions { js_import_path: "dist/tokens.js".to_string() };
        let js = JsExporter::new().export_to_string(&TokenTable::default(), &options).unwrap();
        assert!(js.contains("import designTokens from 'dist/tokens.js';"));
    }
}
