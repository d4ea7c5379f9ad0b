//! Write-back payload for `POST /v1/files/:key/variables`.

use super::variable::{CodeSyntax, ModeValue, ResolvedType};
use crate::naming::{css_var, NamingError};
use serde::Serialize;

/// Scope given to variables created by the audit.
pub const ALL_SCOPES: &str = "ALL_SCOPES";

/// Kind of variable change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeAction {
    #[serde(rename = "CREATE")]
    Create,
    #[serde(rename = "UPDATE")]
    Update,
}

/// One entry of the payload's `variables` list.
///
/// Fields left as `None` are omitted from the request so Figma leaves them
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableChange {
    pub action: ChangeAction,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_collection_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_type: Option<ResolvedType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_from_publishing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_syntax: Option<CodeSyntax>,
}

/// Properties for a variable to be created.
///
/// Unset options fall back to hidden, all scopes, and a `WEB` code syntax
/// derived from `mode_name` and `name`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewVariable {
    pub name: String,
    /// Group used to derive the default code syntax
    pub mode_name: String,
    pub variable_collection_id: String,
    pub resolved_type: Option<ResolvedType>,
    pub description: Option<String>,
    pub hidden_from_publishing: Option<bool>,
    pub scopes: Option<Vec<String>>,
    pub code_syntax: Option<CodeSyntax>,
}

impl VariableChange {
    /// Build a CREATE change with every default filled in.
    pub fn create(temp_id: impl Into<String>, new: &NewVariable) -> Result<Self, NamingError> {
        let code_syntax = match &new.code_syntax {
            Some(syntax) => syntax.clone(),
            None => CodeSyntax::web(css_var(&new.mode_name, &new.name)?),
        };

        Ok(Self {
            action: ChangeAction::Create,
            id: temp_id.into(),
            name: Some(new.name.clone()),
            variable_collection_id: Some(new.variable_collection_id.clone()),
            resolved_type: new.resolved_type.clone(),
            description: new.description.clone(),
            hidden_from_publishing: Some(new.hidden_from_publishing.unwrap_or(true)),
            scopes: Some(new.scopes.clone().unwrap_or_else(|| vec![ALL_SCOPES.to_string()])),
            code_syntax: Some(code_syntax),
        })
    }

    fn update(id: impl Into<String>) -> Self {
        Self {
            action: ChangeAction::Update,
            id: id.into(),
            name: None,
            variable_collection_id: None,
            resolved_type: None,
            description: None,
            hidden_from_publishing: None,
            scopes: None,
            code_syntax: None,
        }
    }

    /// UPDATE that only replaces the code syntax.
    pub fn update_code_syntax(id: impl Into<String>, code_syntax: CodeSyntax) -> Self {
        Self { code_syntax: Some(code_syntax), ..Self::update(id) }
    }

    /// UPDATE that only sets "hide from publishing".
    pub fn update_hidden(id: impl Into<String>, hidden: bool) -> Self {
        Self { hidden_from_publishing: Some(hidden), ..Self::update(id) }
    }
}

/// One entry of the payload's `variableModeValues` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableModeValue {
    pub variable_id: String,
    pub mode_id: String,
    pub value: ModeValue,
}

impl VariableModeValue {
    pub fn new(
        variable_id: impl Into<String>,
        mode_id: impl Into<String>,
        value: impl Into<ModeValue>,
    ) -> Self {
        Self { variable_id: variable_id.into(), mode_id: mode_id.into(), value: value.into() }
    }
}

/// Corrections queued by the audit, sent to Figma as one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WritePayload {
    pub variables: Vec<VariableChange>,
    pub variable_mode_values: Vec<VariableModeValue>,
}

impl WritePayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.variable_mode_values.is_empty()
    }

    /// Total number of queued records.
    pub fn len(&self) -> usize {
        self.variables.len() + self.variable_mode_values.len()
    }

    pub fn push_change(&mut self, change: VariableChange) {
        self.variables.push(change);
    }

    pub fn push_value(&mut self, value: VariableModeValue) {
        self.variable_mode_values.push(value);
    }
}

/// Generates ids for variables created within one payload.
///
/// Figma maps these temporary ids to real ones when the payload is applied.
#[derive(Debug, Clone, Default)]
pub struct TempIds {
    last: u32,
}

impl TempIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> String {
        self.last += 1;
        format!("tempId-{}", self.last)
    }
}
