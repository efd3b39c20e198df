//! Per-query measurement options.

use std::fmt;
use std::sync::Arc;

use vantage_core::{ElevationInterval, Footprint, Point};
use vantage_grid::GridTopology;

/// Caller-supplied path measurement.
///
/// Receives the active topology and the two (already elevation-projected)
/// pixel points and returns a distance in scene units. When set on
/// [`MeasureOptions`] it replaces [`GridTopology::measure_path`] for that
/// query; elevation projection, rounding, and offset still apply.
pub type MeasureFn = Arc<dyn Fn(&dyn GridTopology, Point, Point) -> f64 + Send + Sync>;

/// Options threaded through every distance query.
#[derive(Clone)]
pub struct MeasureOptions {
    /// Snap endpoints to cells and apply the topology's counting rule.
    pub grid_spaces: bool,
    /// Footprint of the origin when it is a token rather than a point.
    pub origin_footprint: Option<Footprint>,
    /// Decimal digits kept by rounding.
    pub precision: u32,
    /// Static amount added after rounding.
    pub offset: f64,
    /// Compare vertical token extents instead of bare elevations.
    pub volumetric: bool,
    /// Replacement for the provider's path measurement.
    pub measure_override: Option<MeasureFn>,
}

impl Default for MeasureOptions {
    fn default() -> Self {
        Self {
            grid_spaces: true,
            origin_footprint: None,
            precision: 1,
            offset: 0.0,
            volumetric: true,
            measure_override: None,
        }
    }
}

impl fmt::Debug for MeasureOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasureOptions")
            .field("grid_spaces", &self.grid_spaces)
            .field("origin_footprint", &self.origin_footprint)
            .field("precision", &self.precision)
            .field("offset", &self.offset)
            .field("volumetric", &self.volumetric)
            .field("measure_override", &self.measure_override.is_some())
            .finish()
    }
}

impl MeasureOptions {
    /// Same options with the origin treated as a token of `footprint`.
    pub fn with_origin_footprint(mut self, footprint: Footprint) -> Self {
        self.origin_footprint = Some(footprint);
        self
    }

    /// Same options with a measurement override installed.
    pub fn with_override(mut self, measure: MeasureFn) -> Self {
        self.measure_override = Some(measure);
        self
    }

    /// Options for raw membership tests: no offset, everything else kept.
    pub fn without_offset(&self) -> Self {
        Self {
            offset: 0.0,
            ..self.clone()
        }
    }
}

/// One side of a distance query, as seen vertically.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Endpoint {
    /// A bare point at an elevation.
    Point(f64),
    /// A token occupying a vertical interval.
    Token(ElevationInterval),
}

impl Endpoint {
    /// Build the vertical endpoint for `point`.
    ///
    /// Tokens get an interval only when `volumetric` is set; otherwise
    /// their elevation is treated as a bare point.
    pub fn resolve(
        grid: &dyn GridTopology,
        point: Point,
        footprint: Option<&Footprint>,
        volumetric: bool,
    ) -> Self {
        match footprint {
            Some(fp) if volumetric => {
                Self::Token(fp.vertical_interval(point.elevation, grid.distance()))
            }
            _ => Self::Point(point.elevation),
        }
    }

    /// Vertical separation in scene units; zero when the extents overlap.
    pub fn vertical_gap(&self, other: &Endpoint) -> f64 {
        match (self, other) {
            (Self::Point(a), Self::Point(b)) => (a - b).abs(),
            (Self::Point(e), Self::Token(t)) | (Self::Token(t), Self::Point(e)) => t.probe(*e),
            (Self::Token(a), Self::Token(b)) => a.vertical_gap(b),
        }
    }
}
