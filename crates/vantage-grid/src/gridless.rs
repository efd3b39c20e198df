//! Grid-less scene: continuous Euclidean measurement.

use crate::error::GridError;
use crate::scene::SceneParams;
use crate::topology::{GridKind, GridOffset, GridTopology};
use vantage_core::{GridInstanceId, Point};

/// A scene without discrete cells.
///
/// `size` and `distance` still define the pixel-to-unit scale, and the
/// nominal square cells of that size back row/column conversions, but
/// [`measure_path`](GridTopology::measure_path) is always Euclidean and
/// ignores `grid_spaces`.
#[derive(Debug, Clone)]
pub struct Gridless {
    params: SceneParams,
}

impl Gridless {
    /// Create a grid-less scene of `width_px × height_px`.
    pub fn new(
        size: f64,
        distance: f64,
        units: &str,
        width_px: f64,
        height_px: f64,
    ) -> Result<Self, GridError> {
        let params = SceneParams::new(size, distance, units, width_px, height_px, size, size)?;
        Ok(Self { params })
    }
}

impl GridTopology for Gridless {
    fn kind(&self) -> GridKind {
        GridKind::Gridless
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

    fn measure_path(&self, a: Point, b: Point, _grid_spaces: bool) -> f64 {
        a.distance_to(&b) / self.params.size * self.params.distance
    }

    fn instance_id(&self) -> GridInstanceId {
        self.params.instance_id
    }
}
