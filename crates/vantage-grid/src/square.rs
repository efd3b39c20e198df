//! Square grid with configurable diagonal movement cost.

use crate::error::GridError;
use crate::scene::SceneParams;
use crate::topology::{GridKind, GridOffset, GridTopology};
use vantage_core::{GridInstanceId, Point};

/// How diagonal steps are counted on a square grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum DiagonalRule {
    /// Every diagonal costs one cell (Chebyshev).
    #[default]
    Equidistant,
    /// Diagonals cost √2 cells (Euclidean between centers).
    Exact,
    /// Diagonals cost 1.5 cells.
    Approximate,
    /// Diagonals are two orthogonal steps (Manhattan).
    Rectilinear,
    /// Diagonals alternate 1, 2, 1, 2, ... cells.
    Alternating1,
    /// Diagonals alternate 2, 1, 2, 1, ... cells.
    Alternating2,
}

impl DiagonalRule {
    /// Cell count for a move of `dr` rows and `dc` columns.
    pub fn cells(self, dr: u32, dc: u32) -> f64 {
        let diagonal = dr.min(dc) as f64;
        let straight = (dr.max(dc) - dr.min(dc)) as f64;
        match self {
            Self::Equidistant => straight + diagonal,
            Self::Exact => straight + diagonal * std::f64::consts::SQRT_2,
            Self::Approximate => straight + diagonal * 1.5,
            Self::Rectilinear => straight + diagonal * 2.0,
            Self::Alternating1 => straight + diagonal + (diagonal / 2.0).floor(),
            Self::Alternating2 => straight + diagonal + (diagonal / 2.0).ceil(),
        }
    }
}

/// A square-celled scene.
///
/// Offset `[i, j]` is row `i`, column `j`; cell `[0, 0]` has its top-left
/// corner at the scene origin. Grid-space distance counts cells under the
/// configured [`DiagonalRule`], which depends only on `|Δi|` and `|Δj|`,
/// so the grid is axis-symmetric.
///
/// # Examples
///
/// ```
/// use vantage_core::Point;
/// use vantage_grid::{DiagonalRule, GridOffset, GridTopology, SquareGrid};
///
/// let grid = SquareGrid::new(100.0, 5.0, "ft", 1000.0, 1000.0, DiagonalRule::Equidistant).unwrap();
/// assert_eq!(grid.dimensions(), (10, 10));
/// assert_eq!(grid.offset_of(Point::new(250.0, 150.0)), GridOffset::new(1, 2));
///
/// // Three columns right, one row down: three cells under the 1-1-1 rule.
/// let a = grid.center_of(GridOffset::new(0, 0));
/// let b = grid.center_of(GridOffset::new(1, 3));
/// assert_eq!(grid.measure_path(a, b, true), 15.0);
/// ```
#[derive(Debug, Clone)]
pub struct SquareGrid {
    params: SceneParams,
    rule: DiagonalRule,
}

impl SquareGrid {
    /// Create a square grid covering a `width_px × height_px` scene.
    ///
    /// Returns `Err` if the cell size or distance is not finite and
    /// positive, the scene is empty, or the extent overflows `i32`.
    pub fn new(
        size: f64,
        distance: f64,
        units: &str,
        width_px: f64,
        height_px: f64,
        rule: DiagonalRule,
    ) -> Result<Self, GridError> {
        let params = SceneParams::new(size, distance, units, width_px, height_px, size, size)?;
        Ok(Self { params, rule })
    }

    /// Diagonal rule.
    pub fn diagonal_rule(&self) -> DiagonalRule {
        self.rule
    }
}

impl GridTopology for SquareGrid {
    fn kind(&self) -> GridKind {
        GridKind::Square
    }

    fn size(&self) -> f64 {
        self.params.size
    }

    fn distance(&self) -> f64 {
        self.params.distance
    }

    fn units(&self) -> &str {
        &self.params.units
    }

    fn dimensions(&self) -> (i32, i32) {
        (self.params.rows, self.params.cols)
    }

    fn offset_of(&self, point: Point) -> GridOffset {
        let s = self.params.size;
        GridOffset::new((point.y / s).floor() as i32, (point.x / s).floor() as i32)
    }

    fn center_of(&self, offset: GridOffset) -> Point {
        let s = self.params.size;
        Point::new((offset.j as f64 + 0.5) * s, (offset.i as f64 + 0.5) * s)
    }

    fn top_left_of(&self, offset: GridOffset) -> Point {
        let s = self.params.size;
        Point::new(offset.j as f64 * s, offset.i as f64 * s)
    }

    fn measure_path(&self, a: Point, b: Point, grid_spaces: bool) -> f64 {
        if !grid_spaces {
            return a.distance_to(&b) / self.params.size * self.params.distance;
        }
        let oa = self.offset_of(a);
        let ob = self.offset_of(b);
        let dr = (oa.i - ob.i).unsigned_abs();
        let dc = (oa.j - ob.j).unsigned_abs();
        self.rule.cells(dr, dc) * self.params.distance
    }

    fn is_axis_symmetric(&self) -> bool {
        true
    }

    fn instance_id(&self) -> GridInstanceId {
        self.params.instance_id
    }
}
