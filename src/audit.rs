//! Audit of a fetched variable set against the derived "correct" state
//!
//! The audit runs two passes over the variables in API order:
//!
//! 1. Integrity checks (unique names, known types, literal shapes, no broken
//!    or circular aliases) while generating a color ramp for every `/50`
//!    base color.
//! 2. Reconciliation: missing ramp steps, wrong ramp colors, wrong `WEB`
//!    code syntax and visible-when-published variables are turned into
//!    findings plus corrections queued in a [`WritePayload`].
//!
//! Pass 1 failures are fatal. Pass 2 never fails on data, it only reports.

use crate::color::to_css_hex;
use crate::error::SyncError;
use crate::models::{
    ModeValue, NewVariable, ResolvedType, TempIds, Variable, VariableChange, VariableModeValue,
    VariablesMeta, WritePayload,
};
use crate::naming::{css_var, PRIMITIVE};
use crate::ramp::{
    generate_ramp, is_base_name, is_ramp_member, ramp_base_name, step_name, ColorRamps, RAMP_STEPS,
};
use crate::resolve::AliasGraph;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Category of a non-fatal mismatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// A ramp step has no variable; a CREATE is queued
    MissingRampStep,
    /// A ramp member's color differs from the derived one
    IncorrectColor,
    /// `codeSyntax.WEB` is absent or wrong
    IncorrectCodeSyntax,
    /// Variable is not hidden from publishing
    NotHidden,
    /// A ramp member could not be checked because no ramp exists for it
    RampUnavailable,
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingKind::MissingRampStep => write!(f, "missing_ramp_step"),
            FindingKind::IncorrectColor => write!(f, "incorrect_color"),
            FindingKind::IncorrectCodeSyntax => write!(f, "incorrect_code_syntax"),
            FindingKind::NotHidden => write!(f, "not_hidden"),
            FindingKind::RampUnavailable => write!(f, "ramp_unavailable"),
        }
    }
}

/// A mismatch found by the audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    /// Name of the variable concerned
    pub variable: String,
    /// Human-readable description of the mismatch and its correction
    pub message: String,
}

impl Finding {
    fn new(kind: FindingKind, variable: &str, message: String) -> Self {
        Self { kind, variable: variable.to_string(), message }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Result of auditing one fetched variable set
#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    /// Ramps for every base color, per mode with a literal value
    pub ramps: ColorRamps,
    /// Corrections to send back to Figma
    pub payload: WritePayload,
    /// Every mismatch, in the order it was found
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of findings of a given kind.
    pub fn count(&self, kind: FindingKind) -> usize {
        self.findings.iter().filter(|f| f.kind == kind).count()
    }
}

/// Run both audit passes over `meta`.
///
/// # Errors
///
/// Returns the first fatal integrity error of pass 1. Broken aliases are
/// collected over the whole set and reported together.
pub fn audit(meta: &VariablesMeta) -> Result<AuditReport, SyncError> {
    let graph = AliasGraph::new(meta);
    let ramps = check_variables(&graph)?;
    let mut auditor = Reconciler::new(&graph, &ramps);
    auditor.run()?;
    let Reconciler { payload, findings, .. } = auditor;
    Ok(AuditReport { ramps, payload, findings })
}

/// Pass 1: integrity gates and ramp generation.
pub fn check_variables(graph: &AliasGraph<'_>) -> Result<ColorRamps, SyncError> {
    let mut names = HashSet::new();
    let mut ramps = ColorRamps::new();
    let mut broken = Vec::new();

    for variable in graph.variables() {
        if !names.insert(variable.name.as_str()) {
            return Err(SyncError::DuplicateName(variable.name.clone()));
        }

        if !variable.resolved_type.is_known() {
            return Err(SyncError::UnknownResolvedType {
                variable: variable.name.clone(),
                resolved_type: variable.resolved_type.to_string(),
            });
        }

        check_literal_shapes(variable)?;

        if variable.is_primitive() && variable.is_color() && is_base_name(&variable.name) {
            if let Some(base_name) = ramp_base_name(&variable.name) {
                for (mode_id, value) in &variable.values_by_mode {
                    if let ModeValue::Color(color) = value {
                        let ramp = generate_ramp(color, base_name)
                            .map_err(|e| SyncError::invalid_color(&variable.name, e))?;
                        ramps.insert(mode_id, ramp);
                    }
                }
            }
        }

        for alias in graph.broken_aliases(variable) {
            log::error!(
                "'{}' (mode: {}) is aliased to missing variable '{}'",
                alias.variable,
                graph.mode_label(&alias.mode_id),
                alias.target
            );
            broken.push(alias.variable);
        }
    }

    if !broken.is_empty() {
        return Err(SyncError::BrokenAlias(broken));
    }

    check_alias_chains(graph)?;
    Ok(ramps)
}

/// Every alias must resolve to a literal in each of its modes.
fn check_alias_chains(graph: &AliasGraph<'_>) -> Result<(), SyncError> {
    for variable in graph.variables() {
        for (mode_id, value) in &variable.values_by_mode {
            if value.is_alias() {
                graph.resolve(&variable.id, mode_id)?;
            }
        }
    }
    Ok(())
}

/// Every literal must have the shape its `resolvedType` promises.
fn check_literal_shapes(variable: &Variable) -> Result<(), SyncError> {
    for (mode_id, value) in &variable.values_by_mode {
        let matches = match (&variable.resolved_type, value) {
            (_, ModeValue::Alias(_)) => true,
            (ResolvedType::Color, ModeValue::Color(_)) => true,
            (ResolvedType::Float, ModeValue::Float(_)) => true,
            (ResolvedType::String, ModeValue::String(_)) => true,
            (ResolvedType::Boolean, ModeValue::Boolean(_)) => true,
            _ => false,
        };
        if !matches {
            return Err(SyncError::SchemaDrift {
                variable: variable.name.clone(),
                mode: mode_id.clone(),
                expected: variable.resolved_type.to_string(),
                found: value.kind_name().to_string(),
            });
        }
    }
    Ok(())
}

/// Pass 2 state
struct Reconciler<'g, 'a> {
    graph: &'g AliasGraph<'a>,
    ramps: &'g ColorRamps,
    names: HashSet<&'a str>,
    temp_ids: TempIds,
    payload: WritePayload,
    findings: Vec<Finding>,
}

impl<'g, 'a> Reconciler<'g, 'a> {
    fn new(graph: &'g AliasGraph<'a>, ramps: &'g ColorRamps) -> Self {
        Self {
            graph,
            ramps,
            names: graph.variables().map(|v| v.name.as_str()).collect(),
            temp_ids: TempIds::new(),
            payload: WritePayload::new(),
            findings: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<(), SyncError> {
        let graph = self.graph;
        for variable in graph.variables() {
            if variable.is_primitive() && variable.is_color() && is_ramp_member(&variable.name) {
                if is_base_name(&variable.name) {
                    self.add_missing_steps(variable)?;
                } else {
                    self.check_member_colors(variable)?;
                }
            }
            self.check_code_syntax(variable)?;
            self.check_hidden(variable);
        }
        Ok(())
    }

    fn report(&mut self, finding: Finding) {
        log::warn!("{}", finding);
        self.findings.push(finding);
    }

    /// Queue a CREATE plus per-mode values for every step the base lacks.
    fn add_missing_steps(&mut self, base: &Variable) -> Result<(), SyncError> {
        let (Some(base_name), Some((left_mode, _))) = (ramp_base_name(&base.name), base.left_most())
        else {
            return Ok(());
        };
        let ramps = self.ramps;
        let Some(left_ramp) = ramps.get(base_name, left_mode) else {
            return Ok(());
        };

        for step in RAMP_STEPS {
            let name = step_name(base_name, step);
            if self.names.contains(name.as_str()) {
                continue;
            }
            let Some(entry) = left_ramp.step(step) else {
                continue;
            };

            self.report(Finding::new(
                FindingKind::MissingRampStep,
                &name,
                format!("Missing tint/shade in Figma will be added. [{}] \"{}\"", name, entry.hex),
            ));

            let temp_id = self.temp_ids.next_id();
            let new = NewVariable {
                name: name.clone(),
                mode_name: PRIMITIVE.to_string(),
                variable_collection_id: base.variable_collection_id.clone(),
                resolved_type: Some(ResolvedType::Color),
                ..Default::default()
            };
            self.payload.push_change(VariableChange::create(temp_id.clone(), &new)?);

            for mode_id in base.values_by_mode.keys() {
                match ramps.get(base_name, mode_id).and_then(|ramp| ramp.step(step)) {
                    Some(entry) => {
                        let value = VariableModeValue::new(temp_id.as_str(), mode_id.as_str(), entry.color);
                        self.payload.push_value(value);
                    }
                    None => self.ramp_unavailable(&name, mode_id),
                }
            }
        }
        Ok(())
    }

    /// Compare each literal mode value of a tint/shade with its derived color.
    fn check_member_colors(&mut self, member: &Variable) -> Result<(), SyncError> {
        let ramps = self.ramps;
        for (mode_id, value) in &member.values_by_mode {
            let ModeValue::Color(actual) = value else {
                continue;
            };
            let Some(expected) = ramps.entry(&member.name, mode_id) else {
                self.ramp_unavailable(&member.name, mode_id);
                continue;
            };

            let actual_hex =
                to_css_hex(actual).map_err(|e| SyncError::invalid_color(&member.name, e))?;
            if actual_hex != expected.hex {
                let message = format!(
                    "Incorrect color value in Figma will be replaced. [{}] (mode: {}) \"{}\" -> \"{}\"",
                    member.name,
                    self.graph.mode_label(mode_id),
                    actual_hex,
                    expected.hex
                );
                let value = VariableModeValue::new(member.id.as_str(), mode_id.as_str(), expected.color);
                self.report(Finding::new(FindingKind::IncorrectColor, &member.name, message));
                self.payload.push_value(value);
            }
        }
        Ok(())
    }

    fn ramp_unavailable(&mut self, name: &str, mode_id: &str) {
        let message = format!(
            "No color ramp for [{}] (mode: {}), its value was left unchecked",
            name,
            self.graph.mode_label(mode_id)
        );
        self.report(Finding::new(FindingKind::RampUnavailable, name, message));
    }

    fn check_code_syntax(&mut self, variable: &Variable) -> Result<(), SyncError> {
        let group = match variable.left_most() {
            Some((mode_id, value)) if value.is_alias() => self.graph.mode_label(mode_id),
            _ => PRIMITIVE,
        };
        let expected = css_var(group, &variable.name)?;

        let current = variable.code_syntax.web.as_deref().filter(|web| !web.is_empty());
        if current == Some(expected.as_str()) {
            return Ok(());
        }

        let shown = current.map_or_else(|| "<empty>".to_string(), |web| format!("\"{}\"", web));
        self.report(Finding::new(
            FindingKind::IncorrectCodeSyntax,
            &variable.name,
            format!(
                "Incorrect syntax value in Figma will be replaced. [{}] {} -> \"{}\"",
                variable.name, shown, expected
            ),
        ));

        let mut code_syntax = variable.code_syntax.clone();
        code_syntax.web = Some(expected);
        self.payload.push_change(VariableChange::update_code_syntax(variable.id.as_str(), code_syntax));
        Ok(())
    }

    fn check_hidden(&mut self, variable: &Variable) {
        if variable.hidden_from_publishing {
            return;
        }
        self.report(Finding::new(
            FindingKind::NotHidden,
            &variable.name,
            format!(
                "Incorrect \"Hide from publishing\" option in Figma will be replaced. [{}] \"false\" -> \"true\"",
                variable.name
            ),
        ));
        self.payload.push_change(VariableChange::update_hidden(variable.id.as_str(), true));
    }
}
