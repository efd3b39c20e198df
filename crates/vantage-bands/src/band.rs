//! Range bands, their styles, and normalization.

use std::fmt;
use std::sync::Arc;

use tracing::warn;
use vantage_measure::MeasureFn;

/// Visual style of one band.
///
/// Colors are `0xRRGGBB`; alphas are in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandStyle {
    /// Fill color.
    pub fill_color: u32,
    /// Fill opacity.
    pub fill_alpha: f64,
    /// Outline color.
    pub line_color: u32,
    /// Outline width in pixels.
    pub line_width: f64,
    /// Outline opacity.
    pub line_alpha: f64,
    /// Pixels to inset each highlighted cell so adjacent bands stay
    /// visually distinct.
    pub shrink: f64,
}

impl BandStyle {
    /// Solid style in one color with the default alphas.
    pub const fn solid(color: u32) -> Self {
        Self {
            fill_color: color,
            fill_alpha: 0.1,
            line_color: color,
            line_width: 2.0,
            line_alpha: 0.8,
            shrink: 0.0,
        }
    }

    /// Green, yellow, red: near, mid, far.
    pub fn default_palette() -> Vec<BandStyle> {
        vec![
            Self::solid(0x2e_cc_40),
            Self::solid(0xff_dc_00),
            Self::solid(0xff_41_36),
        ]
    }

    /// Whether every alpha is in `[0, 1]` and sizes are non-negative.
    pub fn is_valid(&self) -> bool {
        let unit = 0.0..=1.0;
        unit.contains(&self.fill_alpha)
            && unit.contains(&self.line_alpha)
            && self.line_width >= 0.0
            && self.shrink >= 0.0
    }
}

impl Default for BandStyle {
    fn default() -> Self {
        Self::solid(0xff_ff_ff)
    }
}

/// One range threshold around a token.
#[derive(Clone)]
pub struct RangeBand {
    /// Outer edge of the band, in scene units.
    pub threshold: f64,
    /// Explicit style; `None` takes the palette entry at the band's index.
    pub style: Option<BandStyle>,
    /// Measurement used to decide membership in this band only; `None`
    /// uses the pass-wide measurement.
    pub measure: Option<MeasureFn>,
}

impl RangeBand {
    /// A band with palette styling.
    pub const fn new(threshold: f64) -> Self {
        Self {
            threshold,
            style: None,
            measure: None,
        }
    }

    /// A band with an explicit style.
    pub const fn styled(threshold: f64, style: BandStyle) -> Self {
        Self {
            threshold,
            style: Some(style),
            measure: None,
        }
    }

    /// Same band measured with its own path function.
    pub fn with_measure(mut self, measure: MeasureFn) -> Self {
        self.measure = Some(measure);
        self
    }

    /// Resolve the style, falling back to `palette[index % len]`.
    pub fn resolved_style(&self, index: usize, palette: &[BandStyle]) -> BandStyle {
        match self.style {
            Some(style) => style,
            None if palette.is_empty() => BandStyle::default(),
            None => palette[index % palette.len()],
        }
    }
}

impl PartialEq for RangeBand {
    fn eq(&self, other: &Self) -> bool {
        let same_measure = match (&self.measure, &other.measure) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.threshold == other.threshold && self.style == other.style && same_measure
    }
}

impl fmt::Debug for RangeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeBand")
            .field("threshold", &self.threshold)
            .field("style", &self.style)
            .field("measure", &self.measure.is_some())
            .finish()
    }
}

/// Sort bands ascending by threshold and merge duplicates.
///
/// Non-finite and negative thresholds are dropped with a warning. The
/// sort is stable, so when two bands share a threshold the one given
/// first survives.
pub fn normalize_bands(bands: &[RangeBand]) -> Vec<RangeBand> {
    let mut out: Vec<RangeBand> = bands
        .iter()
        .filter(|band| {
            let ok = band.threshold.is_finite() && band.threshold >= 0.0;
            if !ok {
                warn!(threshold = band.threshold, "dropping malformed range band");
            }
            ok
        })
        .cloned()
        .collect();
    out.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
    out.dedup_by(|next, kept| next.threshold == kept.threshold);
    out
}
