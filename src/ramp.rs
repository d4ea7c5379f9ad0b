//! Color ramps: nine tints and shades derived from a base color
//!
//! A ramp is named after its base color. The base lives at step 50 and the
//! other steps are mixed toward white (10-40) or black (60-90):
//!
//! | step | mix            |
//! |------|----------------|
//! | 10   | 80% white      |
//! | 20   | 60% white      |
//! | 30   | 40% white      |
//! | 40   | 20% white      |
//! | 50   | base color     |
//! | 60   | 20% black      |
//! | 70   | 40% black      |
//! | 80   | 60% black      |
//! | 90   | 80% black      |

use crate::color::{mix, to_css_hex, ColorError, Rgba, BLACK, WHITE};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

/// Separator between a ramp's base name and its step number.
pub const STEP_DELIMITER: char = '/';

/// Step of the base color within a ramp.
pub const BASE_STEP: u8 = 50;

/// All ramp steps, lightest first.
pub const RAMP_STEPS: [u8; 9] = [10, 20, 30, 40, 50, 60, 70, 80, 90];

fn step_suffix() -> &'static Regex {
    static STEP_SUFFIX: OnceLock<Regex> = OnceLock::new();
    STEP_SUFFIX.get_or_init(|| Regex::new(r"/\d{2}$").expect("static pattern is valid"))
}

/// True if `name` ends in `/50`, i.e. it defines a ramp's base color.
pub fn is_base_name(name: &str) -> bool {
    name.ends_with("/50")
}

/// True if `name` ends in `/` followed by exactly two digits.
pub fn is_ramp_member(name: &str) -> bool {
    step_suffix().is_match(name)
}

/// Strip the two-digit step suffix from a ramp member name.
///
/// Returns `None` if the name has no step suffix.
///
/// ```
/// use tokensync::ramp::ramp_base_name;
///
/// assert_eq!(ramp_base_name("Brand/Cobalt/70"), Some("Brand/Cobalt"));
/// assert_eq!(ramp_base_name("White"), None);
/// ```
pub fn ramp_base_name(name: &str) -> Option<&str> {
    step_suffix().find(name).map(|m| &name[..m.start()])
}

/// Name of a ramp member, e.g. `Cobalt/30`.
pub fn step_name(base_name: &str, step: u8) -> String {
    format!("{}{}{}", base_name, STEP_DELIMITER, step)
}

/// One derived color of a ramp
#[derive(Debug, Clone, PartialEq)]
pub struct RampEntry {
    /// Full variable name, e.g. `Cobalt/30`
    pub name: String,
    /// Ramp step (10-90)
    pub step: u8,
    /// Derived color
    pub color: Rgba,
    /// Hex rendering of `color`
    pub hex: String,
}

/// The nine derived entries for one base color in one mode
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    base_name: String,
    entries: Vec<RampEntry>,
}

impl ColorRamp {
    /// Name the ramp was generated for (without step suffix).
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Look up an entry by its full variable name.
    pub fn get(&self, name: &str) -> Option<&RampEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Look up an entry by step number.
    pub fn step(&self, step: u8) -> Option<&RampEntry> {
        self.entries.iter().find(|e| e.step == step)
    }

    /// Entries from lightest (10) to darkest (90).
    pub fn iter(&self) -> impl Iterator<Item = &RampEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mix target and percentage for a ramp step.
fn step_mix(step: u8) -> (Rgba, f64) {
    if step > BASE_STEP {
        (BLACK, f64::from(step - BASE_STEP) * 2.0)
    } else {
        (WHITE, 100.0 - f64::from(step) * 2.0)
    }
}

/// Generate the nine ramp entries for `base`.
///
/// # Errors
///
/// Returns `ColorError::InvalidChannel` if `base` has a channel outside
/// `0.0..=1.0`.
///
/// # Examples
///
/// ```
/// use tokensync::color::Rgba;
/// use tokensync::ramp::generate_ramp;
///
/// let cobalt = Rgba::new(0.0, 0.3921568691730499, 0.572549045085907, 1.0);
/// let ramp = generate_ramp(&cobalt, "Cobalt").unwrap();
/// assert_eq!(ramp.get("Cobalt/10").unwrap().hex, "#CCE0E9");
/// assert_eq!(ramp.get("Cobalt/80").unwrap().hex, "#00283A");
/// ```
pub fn generate_ramp(base: &Rgba, base_name: &str) -> Result<ColorRamp, ColorError> {
    base.validate()?;

    let mut entries = Vec::with_capacity(RAMP_STEPS.len());
    for step in RAMP_STEPS {
        let color = if step == BASE_STEP {
            *base
        } else {
            let (target, percent) = step_mix(step);
            mix(base, &target, percent)?
        };
        entries.push(RampEntry {
            name: step_name(base_name, step),
            step,
            hex: to_css_hex(&color)?,
            color,
        });
    }

    Ok(ColorRamp { base_name: base_name.to_string(), entries })
}

/// All ramps of a run, keyed by base name and then mode id.
#[derive(Debug, Clone, Default)]
pub struct ColorRamps {
    ramps: IndexMap<String, IndexMap<String, ColorRamp>>,
}

impl ColorRamps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the ramp of `base_name` for `mode_id`, replacing any previous one.
    pub fn insert(&mut self, mode_id: &str, ramp: ColorRamp) {
        self.ramps
            .entry(ramp.base_name.clone())
            .or_default()
            .insert(mode_id.to_string(), ramp);
    }

    pub fn get(&self, base_name: &str, mode_id: &str) -> Option<&ColorRamp> {
        self.ramps.get(base_name).and_then(|modes| modes.get(mode_id))
    }

    /// Derived entry for a full member name (e.g. `Cobalt/30`) in a mode.
    pub fn entry(&self, member_name: &str, mode_id: &str) -> Option<&RampEntry> {
        let base = ramp_base_name(member_name)?;
        self.get(base, mode_id)?.get(member_name)
    }

    pub fn contains(&self, base_name: &str) -> bool {
        self.ramps.contains_key(base_name)
    }

    /// Number of base colors with at least one ramp.
    pub fn len(&self) -> usize {
        self.ramps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ramps.is_empty()
    }

    pub fn base_names(&self) -> impl Iterator<Item = &String> {
        self.ramps.keys()
    }
}
