//! Formatted distance labels.

use std::fmt;

use vantage_core::{Point, TokenId};

/// Format a rounded distance with exactly `precision` decimals and units.
///
/// ```
/// assert_eq!(vantage_measure::format_distance(7.0, 1, "ft"), "7.0 ft");
/// assert_eq!(vantage_measure::format_distance(12.345, 0, ""), "12");
/// ```
pub fn format_distance(value: f64, precision: u32, units: &str) -> String {
    let digits = precision as usize;
    if units.is_empty() {
        format!("{value:.digits$}")
    } else {
        format!("{value:.digits$} {units}")
    }
}

/// A distance label between two tokens, ready for the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceLabel {
    /// Token measured from.
    pub from: TokenId,
    /// Token measured to; the label is drawn near it.
    pub to: TokenId,
    /// Where to anchor the label in pixel space.
    pub anchor: Point,
    /// Rounded distance including the static offset.
    pub value: f64,
    /// Formatted distance text.
    pub text: String,
    /// Cover bonus reported by the active ruleset, if it has an opinion.
    pub cover: Option<f64>,
}

impl DistanceLabel {
    /// Label for `value`, formatted with `precision` digits and `units`.
    pub fn new(from: TokenId, to: TokenId, anchor: Point, value: f64, precision: u32, units: &str) -> Self {
        Self {
            from,
            to,
            anchor,
            value,
            text: format_distance(value, precision, units),
            cover: None,
        }
    }

    /// Attach a cover bonus.
    pub fn with_cover(mut self, cover: Option<f64>) -> Self {
        self.cover = cover;
        self
    }
}

impl fmt::Display for DistanceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cover {
            Some(bonus) if bonus >= 0.0 => write!(f, "{} (cover +{bonus})", self.text),
            Some(bonus) => write!(f, "{} (cover {bonus})", self.text),
            None => f.write_str(&self.text),
        }
    }
}
