//! Color math for Figma color values
//!
//! Figma stores colors as `{r, g, b, a}` with every channel in `0.0..=1.0`.
//! This module converts them to CSS strings and mixes them linearly:
//! - Hex: `#RRGGBB`, plus `AA` when the alpha is not 1
//! - Functional: `rgb(R G B / A)`
//! - Mix: the same linear blend as SASS `mix()`, alpha untouched

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for color conversion and mixing failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    /// A channel is NaN or outside `0.0..=1.0`
    #[error("invalid color channel '{channel}' = {value}, required: {{ r: 0-1, g: 0-1, b: 0-1[, a: 0-1] }}")]
    InvalidChannel { channel: char, value: f64 },
    /// Mix percentage is NaN or outside `0..=100`
    #[error("percent must be between 0-100, but received '{0}'")]
    InvalidPercent(f64),
}

/// Output notation for [`to_css_color`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssColorFormat {
    /// `rgb(R G B / A)` with integer channels and the alpha as given
    Rgb,
    /// `#RRGGBB` or `#RRGGBBAA`
    Hex,
}

/// A Figma color with decimal channels.
///
/// The alpha channel is optional on the wire and defaults to fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

/// Pure white, the tint target for ramp steps below 50.
pub const WHITE: Rgba = Rgba { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

/// Pure black, the shade target for ramp steps above 50.
pub const BLACK: Rgba = Rgba { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

impl Rgba {
    /// Create a color with an explicit alpha.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Check that every channel, alpha included, lies in `0.0..=1.0`.
    pub fn validate(&self) -> Result<(), ColorError> {
        for (channel, value) in [('r', self.r), ('g', self.g), ('b', self.b), ('a', self.a)] {
            check_unit(channel, value)?;
        }
        Ok(())
    }

    /// Hex notation, see [`to_css_hex`].
    pub fn to_hex(&self) -> Result<String, ColorError> {
        to_css_hex(self)
    }
}

fn check_unit(channel: char, value: f64) -> Result<f64, ColorError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ColorError::InvalidChannel { channel, value })
    }
}

/// Convert a decimal channel (0-1) to an integer channel (0-255).
///
/// # Examples
///
/// ```
/// use tokensync::color::to_int_channel;
///
/// assert_eq!(to_int_channel(0.5).unwrap(), 128);
/// assert!(to_int_channel(1.5).is_err());
/// ```
pub fn to_int_channel(value: f64) -> Result<u8, ColorError> {
    let value = check_unit('x', value)?;
    Ok((value * 255.0).round() as u8)
}

/// Convert a decimal channel (0-1) to two uppercase hex digits.
pub fn to_hex_channel(value: f64) -> Result<String, ColorError> {
    Ok(format!("{:02X}", to_int_channel(value)?))
}

/// Render a color in the requested CSS notation.
///
/// # Errors
///
/// Returns `ColorError::InvalidChannel` if any channel is outside `0.0..=1.0`.
pub fn to_css_color(color: &Rgba, format: CssColorFormat) -> Result<String, ColorError> {
    color.validate()?;

    match format {
        CssColorFormat::Rgb => Ok(format!(
            "rgb({} {} {} / {})",
            to_int_channel(color.r)?,
            to_int_channel(color.g)?,
            to_int_channel(color.b)?,
            color.a
        )),
        CssColorFormat::Hex => {
            let alpha = if color.a != 1.0 { to_hex_channel(color.a)? } else { String::new() };
            Ok(format!(
                "#{}{}{}{}",
                to_hex_channel(color.r)?,
                to_hex_channel(color.g)?,
                to_hex_channel(color.b)?,
                alpha
            ))
        }
    }
}

/// Render `rgb(R G B / A)`.
pub fn to_css_rgba(color: &Rgba) -> Result<String, ColorError> {
    to_css_color(color, CssColorFormat::Rgb)
}

/// Render `#RRGGBB`, or `#RRGGBBAA` when the alpha is not 1.
///
/// # Examples
///
/// ```
/// use tokensync::color::{to_css_hex, Rgba};
///
/// assert_eq!(to_css_hex(&Rgba::rgb(0.5, 0.6, 0.4)).unwrap(), "#809966");
/// assert_eq!(to_css_hex(&Rgba::new(0.5, 0.6, 0.4, 0.5)).unwrap(), "#80996680");
/// ```
pub fn to_css_hex(color: &Rgba) -> Result<String, ColorError> {
    to_css_color(color, CssColorFormat::Hex)
}

/// Mix `target` into `base` by `percent` (0-100).
///
/// Each color channel becomes `percent / 100 * (target - base) + base`.
/// The alpha of `base` is carried over unchanged; the alpha of `target` is
/// ignored.
///
/// # Examples
///
/// ```
/// use tokensync::color::{mix, Rgba, BLACK, WHITE};
///
/// let gray = mix(&WHITE, &BLACK, 60.0).unwrap();
/// assert_eq!(gray, Rgba::rgb(0.4, 0.4, 0.4));
/// ```
pub fn mix(base: &Rgba, target: &Rgba, percent: f64) -> Result<Rgba, ColorError> {
    base.validate()?;
    for (channel, value) in [('r', target.r), ('g', target.g), ('b', target.b)] {
        check_unit(channel, value)?;
    }
    if !(0.0..=100.0).contains(&percent) {
        return Err(ColorError::InvalidPercent(percent));
    }

    // A full mix must land exactly on the target, which the formula does not
    // guarantee in floating point.
    let blend = |from: f64, to: f64| {
        if percent == 100.0 {
            to
        } else {
            percent / 100.0 * (to - from) + from
        }
    };
    Ok(Rgba {
        r: blend(base.r, target.r),
        g: blend(base.g, target.g),
        b: blend(base.b, target.b),
        a: base.a,
    })
}
