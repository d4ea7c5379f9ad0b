//! Alias graph over a fetched variable set
//!
//! Figma variables hold either literal values or aliases to other variables,
//! per mode. This module provides:
//! - Classification of each mode value as literal or alias
//! - Mode id to mode name lookup across collections
//! - Detection of aliases whose target no longer exists
//! - Transitive resolution of alias chains with cycle detection

use crate::models::{ModeValue, Variable, VariablesMeta};
use indexmap::IndexMap;
use std::collections::HashSet;
use thiserror::Error;

/// Error type for alias resolution failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Variable id is not part of the fetched set
    #[error("unknown variable id '{0}'")]
    UnknownVariable(String),
    /// Alias points at a variable id that does not exist
    #[error("variable '{variable}' is aliased to missing variable id '{target}'")]
    BrokenAlias { variable: String, target: String },
    /// Alias chain loops back on itself
    #[error("circular alias: {}", .0.join(" -> "))]
    Circular(Vec<String>),
    /// Mode has no value on the variable
    #[error("variable '{variable}' has no value for mode '{mode}'")]
    MissingMode { variable: String, mode: String },
}

/// Maximum alias chain length to follow before giving up.
const MAX_ALIAS_DEPTH: usize = 100;

/// How a single mode value is defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind<'a> {
    /// A literal value held by the variable itself
    Literal(&'a ModeValue),
    /// A reference to the variable with this id
    Alias(&'a str),
}

impl<'a> ValueKind<'a> {
    pub fn of(value: &'a ModeValue) -> Self {
        match value {
            ModeValue::Alias(alias) => ValueKind::Alias(&alias.id),
            literal => ValueKind::Literal(literal),
        }
    }
}

/// The end of an alias chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<'a> {
    /// Variable that holds the literal
    pub variable: &'a Variable,
    /// Mode of `variable` the literal was read from
    pub mode_id: &'a str,
    pub value: &'a ModeValue,
}

/// An alias whose target id is not among the known variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenAlias {
    pub variable: String,
    pub mode_id: String,
    pub target: String,
}

/// Read-only view over the variables and collections of one fetch.
#[derive(Debug, Clone)]
pub struct AliasGraph<'a> {
    meta: &'a VariablesMeta,
    mode_names: IndexMap<&'a str, &'a str>,
}

impl<'a> AliasGraph<'a> {
    /// Build the graph and the mode name table.
    pub fn new(meta: &'a VariablesMeta) -> Self {
        let mut mode_names = IndexMap::new();
        for collection in meta.variable_collections.values() {
            for mode in &collection.modes {
                mode_names.insert(mode.mode_id.as_str(), mode.name.as_str());
            }
        }
        Self { meta, mode_names }
    }

    /// Variables in API order.
    pub fn variables(&self) -> impl Iterator<Item = &'a Variable> {
        self.meta.variables.values()
    }

    pub fn variable(&self, id: &str) -> Option<&'a Variable> {
        self.meta.variables.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.meta.variables.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.meta.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meta.variables.is_empty()
    }

    /// Display name of a mode, if any collection declares it.
    pub fn mode_name(&self, mode_id: &str) -> Option<&'a str> {
        self.mode_names.get(mode_id).copied()
    }

    /// Display name of a mode, falling back to the id itself.
    pub fn mode_label<'b>(&self, mode_id: &'b str) -> &'b str
    where
        'a: 'b,
    {
        match self.mode_name(mode_id) {
            Some(name) => name,
            None => {
                log::warn!("Mode '{}' is not declared by any collection, using its id as name", mode_id);
                mode_id
            }
        }
    }

    /// Aliases of `variable` whose targets are missing, in mode order.
    pub fn broken_aliases(&self, variable: &Variable) -> Vec<BrokenAlias> {
        variable
            .values_by_mode
            .iter()
            .filter_map(|(mode_id, value)| match ValueKind::of(value) {
                ValueKind::Alias(target) if !self.contains(target) => Some(BrokenAlias {
                    variable: variable.name.clone(),
                    mode_id: mode_id.clone(),
                    target: target.to_string(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Follow aliases from `variable_id` in `mode_id` down to a literal.
    ///
    /// When a target does not carry the requested mode (it belongs to another
    /// collection), its left-most value is used instead.
    pub fn resolve(&self, variable_id: &str, mode_id: &str) -> Result<Resolved<'a>, ResolveError> {
        let variable = self
            .variable(variable_id)
            .ok_or_else(|| ResolveError::UnknownVariable(variable_id.to_string()))?;
        let (mode_id, value) = variable
            .values_by_mode
            .get_key_value(mode_id)
            .map(|(mode, value)| (mode.as_str(), value))
            .ok_or_else(|| ResolveError::MissingMode {
                variable: variable.name.clone(),
                mode: mode_id.to_string(),
            })?;

        let mut visited = HashSet::new();
        visited.insert(variable.id.as_str());
        self.resolve_internal(variable, mode_id, value, &mut visited, vec![variable.name.clone()])
    }

    fn resolve_internal(
        &self,
        variable: &'a Variable,
        mode_id: &'a str,
        value: &'a ModeValue,
        visited: &mut HashSet<&'a str>,
        chain: Vec<String>,
    ) -> Result<Resolved<'a>, ResolveError> {
        let target_id = match ValueKind::of(value) {
            ValueKind::Literal(literal) => {
                return Ok(Resolved { variable, mode_id, value: literal });
            }
            ValueKind::Alias(target_id) => target_id,
        };

        if chain.len() > MAX_ALIAS_DEPTH {
            return Err(ResolveError::Circular(chain));
        }

        let target = self.variable(target_id).ok_or_else(|| ResolveError::BrokenAlias {
            variable: variable.name.clone(),
            target: target_id.to_string(),
        })?;

        let mut chain = chain;
        chain.push(target.name.clone());
        if !visited.insert(target.id.as_str()) {
            return Err(ResolveError::Circular(chain));
        }

        let (next_mode, next_value) = match target.values_by_mode.get_key_value(mode_id) {
            Some((mode, value)) => (mode.as_str(), value),
            None => target.left_most().ok_or_else(|| ResolveError::MissingMode {
                variable: target.name.clone(),
                mode: mode_id.to_string(),
            })?,
        };

        self.resolve_internal(target, next_mode, next_value, visited, chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(value: serde_json::Value) -> VariablesMeta {
        serde_json::from_value(value).unwrap()
    }

    fn sample() -> VariablesMeta {
        meta(json!({
            "variableCollections": {
                "c:prim": {"id": "c:prim", "name": "Primitives", "modes": [{"modeId": "p:0", "name": "Value"}]},
                "c:sem": {"id": "c:sem", "name": "Semantic", "modes": [
                    {"modeId": "s:light", "name": "Light Mode"},
                    {"modeId": "s:dark", "name": "Dark Mode"}
                ]}
            },
            "variables": {
                "v:white": {"id": "v:white", "name": "Basic/White", "variableCollectionId": "c:prim",
                    "resolvedType": "COLOR", "valuesByMode": {"p:0": {"r": 1, "g": 1, "b": 1, "a": 1}}},
                "v:black": {"id": "v:black", "name": "Basic/Black", "variableCollectionId": "c:prim",
                    "resolvedType": "COLOR", "valuesByMode": {"p:0": {"r": 0, "g": 0, "b": 0, "a": 1}}},
                "v:bg": {"id": "v:bg", "name": "Surface/Background", "variableCollectionId": "c:sem",
                    "resolvedType": "COLOR", "valuesByMode": {
                        "s:light": {"type": "VARIABLE_ALIAS", "id": "v:white"},
                        "s:dark": {"type": "VARIABLE_ALIAS", "id": "v:black"}
                    }},
                "v:card": {"id": "v:card", "name": "Surface/Card", "variableCollectionId": "c:sem",
                    "resolvedType": "COLOR", "valuesByMode": {
                        "s:light": {"type": "VARIABLE_ALIAS", "id": "v:bg"},
                        "s:dark": {"type": "VARIABLE_ALIAS", "id": "v:gone"}
                    }}
            }
        }))
    }

    #[test]
    fn test_mode_names() {
        let meta = sample();
        let graph = AliasGraph::new(&meta);
        assert_eq!(graph.mode_name("s:light"), Some("Light Mode"));
        assert_eq!(graph.mode_name("nope"), None);
        assert_eq!(graph.mode_label("nope"), "nope");
    }

    #[test]
    fn test_value_kind() {
        let meta = sample();
        let graph = AliasGraph::new(&meta);
        let bg = graph.variable("v:bg").unwrap();
        assert_eq!(ValueKind::of(&bg.values_by_mode["s:light"]), ValueKind::Alias("v:white"));
        let white = graph.variable("v:white").unwrap();
        assert!(matches!(ValueKind::of(&white.values_by_mode["p:0"]), ValueKind::Literal(_)));
    }

    #[test]
    fn test_broken_aliases() {
        let meta = sample();
        let graph = AliasGraph::new(&meta);
        assert!(graph.broken_aliases(graph.variable("v:bg").unwrap()).is_empty());

        let broken = graph.broken_aliases(graph.variable("v:card").unwrap());
        assert_eq!(
            broken,
            vec![BrokenAlias {
                variable: "Surface/Card".to_string(),
                mode_id: "s:dark".to_string(),
                target: "v:gone".to_string()
            }]
        );
    }

    #[test]
    fn test_resolve_across_collections() {
        let meta = sample();
        let graph = AliasGraph::new(&meta);
        let resolved = graph.resolve("v:bg", "s:dark").unwrap();
        assert_eq!(resolved.variable.name, "Basic/Black");
        assert_eq!(resolved.mode_id, "p:0");
    }

    #[test]
    fn test_resolve_chain() {
        let meta = sample();
        let graph = AliasGraph::new(&meta);
        let resolved = graph.resolve("v:card", "s:light").unwrap();
        assert_eq!(resolved.variable.name, "Basic/White");
        assert!(resolved.value.as_color().is_some());
    }

    #[test]
    fn test_resolve_literal_is_itself() {
        let meta = sample();
        let graph = AliasGraph::new(&meta);
        let resolved = graph.resolve("v:white", "p:0").unwrap();
        assert_eq!(resolved.variable.id, "v:white");
    }

    #[test]
    fn test_resolve_errors() {
        let meta = sample();
        let graph = AliasGraph::new(&meta);
        assert!(matches!(graph.resolve("v:card", "s:dark"), Err(ResolveError::BrokenAlias { .. })));
        assert!(matches!(graph.resolve("v:nope", "s:dark"), Err(ResolveError::UnknownVariable(_))));
        assert!(matches!(graph.resolve("v:bg", "p:0"), Err(ResolveError::MissingMode { .. })));
    }

    #[test]
    fn test_resolve_cycle() {
        let meta = meta(json!({
            "variables": {
                "a": {"id": "a", "name": "A", "variableCollectionId": "c", "resolvedType": "COLOR",
                    "valuesByMode": {"m": {"type": "VARIABLE_ALIAS", "id": "b"}}},
                "b": {"id": "b", "name": "B", "variableCollectionId": "c", "resolvedType": "COLOR",
                    "valuesByMode": {"m": {"type": "VARIABLE_ALIAS", "id": "a"}}}
            }
        }));
        let graph = AliasGraph::new(&meta);
        let err = graph.resolve("a", "m").unwrap_err();
        assert_eq!(err, ResolveError::Circular(vec!["A".into(), "B".into(), "A".into()]));
        assert_eq!(err.to_string(), "circular alias: A -> B -> A");
    }
}
