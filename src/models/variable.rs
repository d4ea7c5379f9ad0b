//! Figma variable, collection and mode types as returned by the REST API.

use crate::color::Rgba;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The type every mode value of a variable resolves to.
///
/// Unknown strings are kept in `Unknown` so the caller can report them
/// instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResolvedType {
    Color,
    Float,
    String,
    Boolean,
    Unknown(String),
}

impl ResolvedType {
    pub fn as_str(&self) -> &str {
        match self {
            ResolvedType::Color => "COLOR",
            ResolvedType::Float => "FLOAT",
            ResolvedType::String => "STRING",
            ResolvedType::Boolean => "BOOLEAN",
            ResolvedType::Unknown(other) => other,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ResolvedType::Unknown(_))
    }
}

impl From<String> for ResolvedType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "COLOR" => ResolvedType::Color,
            "FLOAT" => ResolvedType::Float,
            "STRING" => ResolvedType::String,
            "BOOLEAN" => ResolvedType::Boolean,
            _ => ResolvedType::Unknown(value),
        }
    }
}

impl From<ResolvedType> for String {
    fn from(value: ResolvedType) -> Self {
        match value {
            ResolvedType::Unknown(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker for the `type` field of an alias value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AliasKind {
    #[serde(rename = "VARIABLE_ALIAS")]
    VariableAlias,
}

/// A reference from one variable's mode value to another variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableAlias {
    #[serde(rename = "type")]
    pub kind: AliasKind,
    /// Id of the target variable
    pub id: String,
}

impl VariableAlias {
    pub fn to(id: impl Into<String>) -> Self {
        Self { kind: AliasKind::VariableAlias, id: id.into() }
    }
}

/// A variable's value in one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModeValue {
    Alias(VariableAlias),
    Color(Rgba),
    Boolean(bool),
    Float(f64),
    String(String),
    /// Any shape Figma may add later; rejected by the audit with the variable's name
    Unknown(serde_json::Value),
}

impl ModeValue {
    pub fn is_alias(&self) -> bool {
        matches!(self, ModeValue::Alias(_))
    }

    pub fn as_alias(&self) -> Option<&VariableAlias> {
        match self {
            ModeValue::Alias(alias) => Some(alias),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<&Rgba> {
        match self {
            ModeValue::Color(color) => Some(color),
            _ => None,
        }
    }

    /// Short description used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ModeValue::Alias(_) => "alias",
            ModeValue::Color(_) => "color",
            ModeValue::Boolean(_) => "boolean",
            ModeValue::Float(_) => "number",
            ModeValue::String(_) => "string",
            ModeValue::Unknown(_) => "unrecognized",
        }
    }
}

impl From<Rgba> for ModeValue {
    fn from(color: Rgba) -> Self {
        ModeValue::Color(color)
    }
}

/// Per-platform code syntax. Only `WEB` is audited; the others pass through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSyntax {
    #[serde(rename = "WEB", skip_serializing_if = "Option::is_none", default)]
    pub web: Option<String>,
    #[serde(rename = "ANDROID", skip_serializing_if = "Option::is_none", default)]
    pub android: Option<String>,
    #[serde(rename = "iOS", skip_serializing_if = "Option::is_none", default)]
    pub ios: Option<String>,
}

impl CodeSyntax {
    pub fn web(value: impl Into<String>) -> Self {
        Self { web: Some(value.into()), ..Default::default() }
    }
}

/// A Figma variable (design token).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: String,
    pub name: String,
    pub variable_collection_id: String,
    pub resolved_type: ResolvedType,
    /// Mode id -> value, in the order the API returned them
    pub values_by_mode: IndexMap<String, ModeValue>,
    #[serde(default)]
    pub code_syntax: CodeSyntax,
    #[serde(default)]
    pub hidden_from_publishing: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Variable {
    /// The first mode in API order and its value.
    ///
    /// This "left-most" mode decides whether a variable is a primitive or a
    /// semantic alias and which mode name goes into its code syntax.
    pub fn left_most(&self) -> Option<(&str, &ModeValue)> {
        self.values_by_mode.first().map(|(mode, value)| (mode.as_str(), value))
    }

    /// True if the left-most value is a literal (not an alias).
    pub fn is_primitive(&self) -> bool {
        self.left_most().is_some_and(|(_, value)| !value.is_alias())
    }

    pub fn is_color(&self) -> bool {
        self.resolved_type == ResolvedType::Color
    }
}

/// A mode of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    pub mode_id: String,
    pub name: String,
}

/// A collection of variables sharing a set of modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCollection {
    pub id: String,
    pub name: String,
    pub modes: Vec<Mode>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default_mode_id: Option<String>,
}

/// The `meta` object of a variables response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariablesMeta {
    #[serde(default)]
    pub variables: IndexMap<String, Variable>,
    #[serde(default)]
    pub variable_collections: IndexMap<String, VariableCollection>,
}

/// A successful `GET /v1/files/:key/variables/*` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariablesResponse {
    pub status: u16,
    #[serde(default)]
    pub error: bool,
    pub meta: VariablesMeta,
}
