//! Data models for Figma variables and the write-back payload

mod payload;
mod variable;

// Re-export all public types
pub use payload::{
    ChangeAction, NewVariable, TempIds, VariableChange, VariableModeValue, WritePayload, ALL_SCOPES,
};
pub use variable::{
    AliasKind, CodeSyntax, Mode, ModeValue, ResolvedType, Variable, VariableAlias,
    VariableCollection, VariablesMeta, VariablesResponse,
};
