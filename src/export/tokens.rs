//! Token table shared by the CSS and JS exporters

use super::{ExportError, Result};
use crate::color::to_css_hex;
use crate::models::{ModeValue, ResolvedType, Variable, VariablesMeta};
use crate::ramp::{is_base_name, is_ramp_member, ramp_base_name, ColorRamps};
use crate::resolve::AliasGraph;
use indexmap::IndexMap;

/// A mode-specific token pointing at a primitive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticToken {
    pub name: String,
    /// Name of the primitive the alias chain ends at
    pub primitive: String,
}

/// Literal value of a primitive token
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    /// Hex color (`#RRGGBB` or `#RRGGBBAA`)
    Color(String),
    Float(f64),
    String(String),
    /// Rendered in JS only
    Boolean(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveToken {
    pub name: String,
    pub value: PrimitiveValue,
}

/// Immutable table of everything the artifacts contain.
///
/// Semantic tokens are grouped by mode display name in first-encounter
/// order. Primitive tokens follow variable order with colors first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenTable {
    semantic: IndexMap<String, Vec<SemanticToken>>,
    primitives: Vec<PrimitiveToken>,
}

impl TokenTable {
    /// Build the table from audited variables and their ramps.
    pub fn build(meta: &VariablesMeta, ramps: &ColorRamps) -> Result<Self> {
        let graph = AliasGraph::new(meta);
        let mut table = TokenTable::default();

        let mut variables: Vec<&Variable> = graph.variables().collect();
        variables.sort_by_key(|v| !v.is_color());

        for variable in variables {
            table.add_semantic(&graph, variable)?;
            table.add_primitive(variable, ramps)?;
        }

        Ok(table)
    }

    fn add_semantic(&mut self, graph: &AliasGraph<'_>, variable: &Variable) -> Result<()> {
        for (mode_id, value) in &variable.values_by_mode {
            if !value.is_alias() {
                continue;
            }
            let resolved = graph.resolve(&variable.id, mode_id)?;
            self.semantic
                .entry(graph.mode_label(mode_id).to_string())
                .or_default()
                .push(SemanticToken {
                    name: variable.name.clone(),
                    primitive: resolved.variable.name.clone(),
                });
        }
        Ok(())
    }

    /// Only the left-most mode of a primitive is exported.
    fn add_primitive(&mut self, variable: &Variable, ramps: &ColorRamps) -> Result<()> {
        let Some((mode_id, value)) = variable.left_most() else {
            return Ok(());
        };

        match (&variable.resolved_type, value) {
            (_, ModeValue::Alias(_)) => {}
            (ResolvedType::Color, ModeValue::Color(color)) => {
                if is_base_name(&variable.name) {
                    let ramp = ramp_base_name(&variable.name).and_then(|base| ramps.get(base, mode_id));
                    for entry in ramp.into_iter().flat_map(|ramp| ramp.iter()) {
                        self.push_primitive(&entry.name, PrimitiveValue::Color(entry.hex.clone()));
                    }
                } else if !is_ramp_member(&variable.name) {
                    let hex = to_css_hex(color).map_err(|source| ExportError::Color {
                        variable: variable.name.clone(),
                        source,
                    })?;
                    self.push_primitive(&variable.name, PrimitiveValue::Color(hex));
                }
            }
            (ResolvedType::Float, ModeValue::Float(number)) => {
                self.push_primitive(&variable.name, PrimitiveValue::Float(*number));
            }
            (ResolvedType::String, ModeValue::String(text)) => {
                self.push_primitive(&variable.name, PrimitiveValue::String(text.clone()));
            }
            (ResolvedType::Boolean, ModeValue::Boolean(flag)) => {
                self.push_primitive(&variable.name, PrimitiveValue::Boolean(*flag));
            }
            _ => {
                log::warn!(
                    "Skipping '{}': {} value does not match type {}",
                    variable.name,
                    value.kind_name(),
                    variable.resolved_type
                );
            }
        }
        Ok(())
    }

    fn push_primitive(&mut self, name: &str, value: PrimitiveValue) {
        self.primitives.push(PrimitiveToken { name: name.to_string(), value });
    }

    /// Semantic groups as (mode name, tokens), in first-encounter order.
    pub fn modes(&self) -> impl Iterator<Item = (&str, &[SemanticToken])> {
        self.semantic.iter().map(|(mode, tokens)| (mode.as_str(), tokens.as_slice()))
    }

    pub fn semantic(&self, mode_name: &str) -> Option<&[SemanticToken]> {
        self.semantic.get(mode_name).map(Vec::as_slice)
    }

    pub fn primitives(&self) -> &[PrimitiveToken] {
        &self.primitives
    }

    pub fn primitive(&self, name: &str) -> Option<&PrimitiveValue> {
        self.primitives.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    pub fn is_empty(&self) -> bool {
        self.semantic.is_empty() && self.primitives.is_empty()
    }
}
