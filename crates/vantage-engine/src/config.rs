//! Overlay configuration, validation, and error types.
//!
//! [`OverlayConfig`] is constructed once by the host and threaded through
//! every pass as an explicit value. [`validate()`](OverlayConfig::validate)
//! checks it before the engine accepts it.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use vantage_bands::{BandStyle, PlanOptions};
use vantage_measure::MeasureOptions;

/// Largest supported rounding precision, in decimal digits.
pub const MAX_PRECISION: u32 = 10;

/// Longest accepted debounce quantum.
pub const MAX_DEBOUNCE: Duration = Duration::from_secs(5);

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`OverlayConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Precision exceeds [`MAX_PRECISION`].
    InvalidPrecision {
        /// The configured precision.
        value: u32,
    },
    /// Static offset is NaN or infinite.
    InvalidOffset {
        /// The invalid value.
        value: f64,
    },
    /// Debounce quantum exceeds [`MAX_DEBOUNCE`].
    InvalidDebounce {
        /// The configured quantum.
        value: Duration,
    },
    /// Window scale is non-finite or below 1.
    InvalidWindowScale {
        /// The invalid value.
        value: f64,
    },
    /// The style palette has no entries.
    EmptyPalette,
    /// A palette entry has an alpha outside `[0, 1]` or a negative size.
    InvalidStyle {
        /// Palette index of the bad entry.
        index: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPrecision { value } => {
                write!(f, "precision {value} exceeds maximum of {MAX_PRECISION} digits")
            }
            Self::InvalidOffset { value } => write!(f, "offset must be finite, got {value}"),
            Self::InvalidDebounce { value } => {
                write!(f, "debounce {value:?} exceeds maximum of {MAX_DEBOUNCE:?}")
            }
            Self::InvalidWindowScale { value } => {
                write!(f, "window_scale must be finite and at least 1, got {value}")
            }
            Self::EmptyPalette => write!(f, "style palette is empty"),
            Self::InvalidStyle { index } => write!(f, "palette entry {index} is out of range"),
        }
    }
}

impl Error for ConfigError {}

// ── OverlayConfig ──────────────────────────────────────────────────

/// Settings for labels, measurement, and range highlighting.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayConfig {
    /// Decimal digits kept when rounding distances. Default: 1.
    pub precision: u32,
    /// Static amount added to every displayed distance. Default: 0.
    pub offset: f64,
    /// Minimum spacing between recomputes of one token. Default: 150 ms.
    pub debounce: Duration,
    /// Compare token vertical extents when measuring. Default: true.
    pub volumetric: bool,
    /// Measure in grid spaces on gridded scenes. Default: true.
    pub grid_spaces: bool,
    /// Search window radius as a multiple of the largest band. Default: 1.5.
    pub window_scale: f64,
    /// Draw gridless bands as ellipses for every token. Default: false.
    pub treat_as_round: bool,
    /// Show bands and labels while a token is hovered. Default: true.
    pub show_on_hover: bool,
    /// Show bands while a token is controlled. Default: true.
    pub show_on_control: bool,
    /// Styles for bands that do not carry their own.
    pub palette: Vec<BandStyle>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            precision: 1,
            offset: 0.0,
            debounce: Duration::from_millis(150),
            volumetric: true,
            grid_spaces: true,
            window_scale: 1.5,
            treat_as_round: false,
            show_on_hover: true,
            show_on_control: true,
            palette: BandStyle::default_palette(),
        }
    }
}

impl OverlayConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.precision > MAX_PRECISION {
            return Err(ConfigError::InvalidPrecision {
                value: self.precision,
            });
        }
        if !self.offset.is_finite() {
            return Err(ConfigError::InvalidOffset { value: self.offset });
        }
        if self.debounce > MAX_DEBOUNCE {
            return Err(ConfigError::InvalidDebounce {
                value: self.debounce,
            });
        }
        if !self.window_scale.is_finite() || self.window_scale < 1.0 {
            return Err(ConfigError::InvalidWindowScale {
                value: self.window_scale,
            });
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if let Some(index) = self.palette.iter().position(|s| !s.is_valid()) {
            return Err(ConfigError::InvalidStyle { index });
        }
        Ok(())
    }

    /// Distance options for labels and queries.
    pub fn measure_options(&self) -> MeasureOptions {
        MeasureOptions {
            grid_spaces: self.grid_spaces,
            origin_footprint: None,
            precision: self.precision,
            offset: self.offset,
            volumetric: self.volumetric,
            measure_override: None,
        }
    }

    /// Planner options for one pass.
    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            measure: self.measure_options(),
            window_scale: self.window_scale,
            treat_as_round: self.treat_as_round,
            use_symmetry: true,
            palette: self.palette.clone(),
        }
    }
}
