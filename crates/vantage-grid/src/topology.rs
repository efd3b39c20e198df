//! The [`GridTopology`] trait: the grid topology provider seam.

use std::fmt;

use smallvec::SmallVec;
use vantage_core::{Bounds, Footprint, GridInstanceId, Point};

/// The closed set of grid kinds a scene can use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridKind {
    /// No discrete cells; distances and shapes are continuous.
    Gridless,
    /// Square cells.
    Square,
    /// Hexagonal cells (row or column staggered).
    Hex,
}

impl GridKind {
    /// Whether the scene quantizes positions to cells.
    pub fn is_gridded(self) -> bool {
        !matches!(self, Self::Gridless)
    }
}

/// A cell address: `i` is the row, `j` the column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridOffset {
    /// Row.
    pub i: i32,
    /// Column.
    pub j: i32,
}

impl GridOffset {
    /// Offset at row `i`, column `j`.
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }
}

impl fmt::Display for GridOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.i, self.j)
    }
}

/// Occupied cells of a footprint. Twelve inline slots cover every hex
/// table entry and square footprints up to 3×3 without allocating.
pub type Occupancy = SmallVec<[GridOffset; 12]>;

/// Grid topology provider.
///
/// Reports the grid kind, cell size, scene distance per cell, row/column
/// conversions, and the path-measurement primitive. The measurement
/// engine never reimplements topology math: diagonal conventions, hex
/// cube distance, and grid-less Euclidean rules all live behind
/// [`measure_path`](Self::measure_path).
///
/// # Object Safety
///
/// Designed for use as `&dyn GridTopology`; the engine holds the active
/// scene's provider as `Box<dyn GridTopology>`.
pub trait GridTopology: Send + Sync + 'static {
    /// Which kind of grid this is.
    fn kind(&self) -> GridKind;

    /// Cell size in pixels (distance between adjacent cell centers).
    fn size(&self) -> f64;

    /// Scene distance covered by one cell, in [`units`](Self::units).
    fn distance(&self) -> f64;

    /// Scene distance unit label, e.g. `"ft"`.
    fn units(&self) -> &str;

    /// Scene extent as `(rows, cols)`.
    fn dimensions(&self) -> (i32, i32);

    /// Cell containing a pixel point.
    fn offset_of(&self, point: Point) -> GridOffset;

    /// Pixel center of a cell.
    fn center_of(&self, offset: GridOffset) -> Point;

    /// Pixel top-left corner of a cell's bounding box.
    fn top_left_of(&self, offset: GridOffset) -> Point;

    /// Distance in scene units between two pixel points.
    ///
    /// With `grid_spaces` the points are snapped to their cells and the
    /// topology's cell-counting rule applies; otherwise the raw Euclidean
    /// pixel distance is converted to scene units.
    fn measure_path(&self, a: Point, b: Point, grid_spaces: bool) -> f64;

    /// Cells occupied by a placeable with the given bounds and footprint.
    ///
    /// Default implementation subdivides the bounds uniformly into
    /// `ceil(width) × ceil(height)` sub-cells and snaps each sub-cell
    /// center. Backends may override with exact tables.
    fn occupied_offsets(&self, bounds: &Bounds, footprint: &Footprint) -> Occupancy {
        uniform_occupancy(self, bounds, footprint)
    }

    /// Whether distances depend only on `|Δrow|` and `|Δcol|`, so cell
    /// sets may be mirrored across a token's row and column axes.
    fn is_axis_symmetric(&self) -> bool {
        false
    }

    /// Unique instance identifier for this topology object.
    fn instance_id(&self) -> GridInstanceId;

    /// Pixels per scene unit (`size / distance`).
    fn pixels_per_unit(&self) -> f64 {
        self.size() / self.distance()
    }

    /// Convert scene units to pixels.
    fn units_to_pixels(&self, units: f64) -> f64 {
        units * self.pixels_per_unit()
    }

    /// Convert pixels to scene units.
    fn pixels_to_units(&self, pixels: f64) -> f64 {
        pixels / self.pixels_per_unit()
    }
}

/// Uniform subdivision occupancy shared by every backend.
pub(crate) fn uniform_occupancy<G: GridTopology + ?Sized>(
    grid: &G,
    bounds: &Bounds,
    footprint: &Footprint,
) -> Occupancy {
    let cols = subdivisions(footprint.width);
    let rows = subdivisions(footprint.height);
    let step_x = bounds.width / cols as f64;
    let step_y = bounds.height / rows as f64;
    let mut out = Occupancy::new();
    for r in 0..rows {
        for c in 0..cols {
            let p = Point::new(
                bounds.x + (c as f64 + 0.5) * step_x,
                bounds.y + (r as f64 + 0.5) * step_y,
            );
            let offset = grid.offset_of(p);
            if !out.contains(&offset) {
                out.push(offset);
            }
        }
    }
    out
}

/// Number of sub-cells along one footprint axis; fractional sizes round
/// up and anything below one cell still occupies one.
fn subdivisions(units: f64) -> u32 {
    if !units.is_finite() || units <= 1.0 {
        1
    } else {
        // Tolerate float noise such as 2.0000000001.
        (units - 1e-6).ceil() as u32
    }
}
