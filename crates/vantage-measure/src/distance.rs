//! The grid distance engine.
//!
//! Every query runs the same pipeline:
//!
//! 1. Resolve both ends to vertical [`Endpoint`]s and take their gap.
//! 2. If the gap is non-zero, push the target outward along the planar
//!    direction so the new planar length is `hypot(planar, gap)`.
//! 3. Measure with the provider (or the caller's override).
//! 4. Round to the configured precision, then add the static offset.
//!
//! Topology rules (diagonals, hex distance) never appear here.

use vantage_core::{Footprint, Point, TokenSnapshot};
use vantage_geom::token_closest_points;
use vantage_grid::GridTopology;

use crate::options::{Endpoint, MeasureOptions};

/// Distance from `origin` to `target` in scene units.
///
/// `target_footprint` marks the target as a token; the origin is a token
/// when [`MeasureOptions::origin_footprint`] is set.
///
/// # Examples
///
/// ```
/// use vantage_core::Point;
/// use vantage_grid::{DiagonalRule, SquareGrid};
/// use vantage_measure::{measure_distance, MeasureOptions};
///
/// let grid = SquareGrid::new(100.0, 5.0, "ft", 1000.0, 1000.0, DiagonalRule::Equidistant).unwrap();
/// let d = measure_distance(
///     &grid,
///     Point::new(50.0, 50.0),
///     Point::new(350.0, 50.0),
///     None,
///     &MeasureOptions::default(),
/// );
/// assert_eq!(d, 15.0);
/// ```
pub fn measure_distance(
    grid: &dyn GridTopology,
    origin: Point,
    target: Point,
    target_footprint: Option<&Footprint>,
    options: &MeasureOptions,
) -> f64 {
    let raw = measure_raw(grid, origin, target, target_footprint, options);
    round_to_precision(raw, options.precision) + options.offset
}

/// Distance between two tokens, measured between their closest points.
///
/// The origin token's footprint overrides any set on `options`.
pub fn measure_tokens(
    grid: &dyn GridTopology,
    origin: &TokenSnapshot,
    target: &TokenSnapshot,
    options: &MeasureOptions,
) -> f64 {
    let (pa, pb) = token_closest_points(grid, origin, target);
    let options = options.clone().with_origin_footprint(origin.footprint);
    measure_distance(grid, pa, pb, Some(&target.footprint), &options)
}

/// Unrounded distance: elevation projection plus path measurement.
pub fn measure_raw(
    grid: &dyn GridTopology,
    origin: Point,
    target: Point,
    target_footprint: Option<&Footprint>,
    options: &MeasureOptions,
) -> f64 {
    let from = Endpoint::resolve(grid, origin, options.origin_footprint.as_ref(), options.volumetric);
    let to = Endpoint::resolve(grid, target, target_footprint, options.volumetric);
    let gap = from.vertical_gap(&to);
    let target = if gap > 0.0 {
        volumetric_target(origin, target, grid.units_to_pixels(gap))
    } else {
        target
    };
    match &options.measure_override {
        Some(measure) => measure(grid, origin, target),
        None => grid.measure_path(origin, target, options.grid_spaces),
    }
}

/// Planar stand-in for `target` that folds a vertical gap (in pixels) into
/// horizontal distance.
///
/// The result lies on the ray from `origin` through `target` at distance
/// `hypot(planar, gap_px)`. Coincident points project along `+x`.
pub fn volumetric_target(origin: Point, target: Point, gap_px: f64) -> Point {
    let dx = target.x - origin.x;
    let dy = target.y - origin.y;
    let angle = dy.atan2(dx);
    let len = dx.hypot(dy).hypot(gap_px);
    Point::new(origin.x + len * angle.cos(), origin.y + len * angle.sin())
        .at_elevation(target.elevation)
}

/// `round(value · 10^precision) / 10^precision`.
///
/// Non-finite values pass through unchanged.
pub fn round_to_precision(value: f64, precision: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(precision.min(15) as i32);
    (value * scale).round() / scale
}
