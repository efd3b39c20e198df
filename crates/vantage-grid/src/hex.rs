//! Hexagonal grid in offset coordinates (row or column staggered).

use crate::error::GridError;
use crate::scene::SceneParams;
use crate::topology::{uniform_occupancy, GridKind, GridOffset, GridTopology, Occupancy};
use vantage_core::{Bounds, Footprint, GridInstanceId, Point};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Axial `(dq, dr)` occupancy for a size-2 token on a pointy-top grid:
/// the anchor and the two cells below it, meeting at a shared vertex.
const PATTERN_2: [(i32, i32); 3] = [(0, 0), (-1, 1), (0, 1)];

/// Size-3 token: the anchor and its six neighbours.
const PATTERN_3: [(i32, i32); 7] = [(0, 0), (1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Size-4 token: the size-2 triangle plus every cell adjacent to it,
/// symmetric about the triangle's shared vertex.
const PATTERN_4: [(i32, i32); 12] = [
    (0, 0),
    (-1, 1),
    (0, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, 0),
    (-2, 1),
    (-2, 2),
    (-1, 2),
    (1, 1),
    (0, 2),
];

/// Which rows or columns are shifted by half a cell.
///
/// Row layouts use pointy-top hexes, column layouts flat-top hexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HexLayout {
    /// Pointy-top; odd rows shifted right.
    OddRows,
    /// Pointy-top; even rows shifted right.
    EvenRows,
    /// Flat-top; odd columns shifted down.
    OddCols,
    /// Flat-top; even columns shifted down.
    EvenCols,
}

impl HexLayout {
    /// Whether hexes are pointy-topped (row-staggered).
    pub fn is_rows(self) -> bool {
        matches!(self, Self::OddRows | Self::EvenRows)
    }

    fn shifts(self, index: i32) -> bool {
        let odd = index & 1 == 1;
        match self {
            Self::OddRows | Self::OddCols => odd,
            Self::EvenRows | Self::EvenCols => !odd,
        }
    }
}

/// A hexagonal scene.
///
/// `size` is the distance between adjacent cell centers. Offsets are
/// converted to cube coordinates for distance, which is the cube metric
/// `max(|dq|, |dr|, |dq + dr|)`: the hex graph geodesic. Hex grids are not
/// axis-symmetric, so range planning tests every candidate cell.
///
/// # Examples
///
/// ```
/// use vantage_grid::{GridOffset, GridTopology, HexGrid, HexLayout};
///
/// let hex = HexGrid::new(100.0, 5.0, "ft", 2000.0, 2000.0, HexLayout::OddRows).unwrap();
/// let a = hex.center_of(GridOffset::new(2, 2));
/// let b = hex.center_of(GridOffset::new(2, 5));
/// assert_eq!(hex.measure_path(a, b, true), 15.0);
/// assert_eq!(hex.offset_of(b), GridOffset::new(2, 5));
/// ```
#[derive(Debug, Clone)]
pub struct HexGrid {
    params: SceneParams,
    layout: HexLayout,
}

impl HexGrid {
    /// Create a hex grid covering a `width_px × height_px` scene.
    pub fn new(
        size: f64,
        distance: f64,
        units: &str,
        width_px: f64,
        height_px: f64,
        layout: HexLayout,
    ) -> Result<Self, GridError> {
        // Pitch along the staggered axis is 3/4 of the long hex diameter.
        let (row_pitch, col_pitch) = if layout.is_rows() {
            (size * SQRT_3 / 2.0, size)
        } else {
            (size, size * SQRT_3 / 2.0)
        };
        let params = SceneParams::new(
            size, distance, units, width_px, height_px, row_pitch, col_pitch,
        )?;
        Ok(Self { params, layout })
    }

    /// Stagger layout.
    pub fn layout(&self) -> HexLayout {
        self.layout
    }

    /// Hex corner radius in pixels.
    pub fn radius(&self) -> f64 {
        self.params.size / SQRT_3
    }

    /// Convert an offset to axial `(q, r)`.
    pub fn offset_to_axial(&self, o: GridOffset) -> (i32, i32) {
        let (i, j) = (o.i, o.j);
        match self.layout {
            HexLayout::OddRows => (j - (i - (i & 1)) / 2, i),
            HexLayout::EvenRows => (j - (i + (i & 1)) / 2, i),
            HexLayout::OddCols => (j, i - (j - (j & 1)) / 2),
            HexLayout::EvenCols => (j, i - (j + (j & 1)) / 2),
        }
    }

    /// Convert axial `(q, r)` to an offset.
    pub fn axial_to_offset(&self, q: i32, r: i32) -> GridOffset {
        match self.layout {
            HexLayout::OddRows => GridOffset::new(r, q + (r - (r & 1)) / 2),
            HexLayout::EvenRows => GridOffset::new(r, q + (r + (r & 1)) / 2),
            HexLayout::OddCols => GridOffset::new(r + (q - (q & 1)) / 2, q),
            HexLayout::EvenCols => GridOffset::new(r + (q + (q & 1)) / 2, q),
        }
    }

    /// Cube distance in cells between two offsets.
    pub fn cube_distance(&self, a: GridOffset, b: GridOffset) -> i32 {
        let (q1, r1) = self.offset_to_axial(a);
        let (q2, r2) = self.offset_to_axial(b);
        let dq = (q1 - q2).abs();
        let dr = (r1 - r2).abs();
        let ds = ((q1 + r1) - (q2 + r2)).abs();
        dq.max(dr).max(ds)
    }

    /// Occupancy table for integer square footprints up to 4.
    fn pattern(size: u32) -> Option<&'static [(i32, i32)]> {
        match size {
            2 => Some(&PATTERN_2[..]),
            3 => Some(&PATTERN_3[..]),
            4 => Some(&PATTERN_4[..]),
            _ => None,
        }
    }
}

/// Round fractional axial coordinates to the containing hex.
fn axial_round(q: f64, r: f64) -> (i32, i32) {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();
    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();
    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    (rq as i32, rr as i32)
}

impl GridTopology for HexGrid {
    fn kind(&self) -> GridKind {
        GridKind::Hex
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
        // Axial (0, 0) is offset [0, 0] in every layout.
        let origin = self.center_of(GridOffset::new(0, 0));
        let px = point.x - origin.x;
        let py = point.y - origin.y;
        let radius = self.radius();
        let (q, r) = if self.layout.is_rows() {
            ((SQRT_3 / 3.0 * px - py / 3.0) / radius, (2.0 / 3.0 * py) / radius)
        } else {
            ((2.0 / 3.0 * px) / radius, (-px / 3.0 + SQRT_3 / 3.0 * py) / radius)
        };
        let (q, r) = axial_round(q, r);
        self.axial_to_offset(q, r)
    }

    fn center_of(&self, offset: GridOffset) -> Point {
        let size = self.params.size;
        let long = 2.0 * self.radius();
        if self.layout.is_rows() {
            let shift = if self.layout.shifts(offset.i) { 0.5 } else { 0.0 };
            Point::new(
                (offset.j as f64 + 0.5 + shift) * size,
                long / 2.0 + offset.i as f64 * 0.75 * long,
            )
        } else {
            let shift = if self.layout.shifts(offset.j) { 0.5 } else { 0.0 };
            Point::new(
                long / 2.0 + offset.j as f64 * 0.75 * long,
                (offset.i as f64 + 0.5 + shift) * size,
            )
        }
    }

    fn top_left_of(&self, offset: GridOffset) -> Point {
        let c = self.center_of(offset);
        let long = 2.0 * self.radius();
        if self.layout.is_rows() {
            Point::new(c.x - self.params.size / 2.0, c.y - long / 2.0)
        } else {
            Point::new(c.x - long / 2.0, c.y - self.params.size / 2.0)
        }
    }

    fn measure_path(&self, a: Point, b: Point, grid_spaces: bool) -> f64 {
        if !grid_spaces {
            return a.distance_to(&b) / self.params.size * self.params.distance;
        }
        let cells = self.cube_distance(self.offset_of(a), self.offset_of(b));
        cells as f64 * self.params.distance
    }

    fn occupied_offsets(&self, bounds: &Bounds, footprint: &Footprint) -> Occupancy {
        let side = footprint.width.round();
        let tabled = footprint.is_square()
            && (footprint.width - side).abs() < 1e-6
            && (1.0..=4.0).contains(&side);
        if !tabled {
            return uniform_occupancy(self, bounds, footprint);
        }
        let size = side as u32;
        let center = bounds.center();
        let Some(pattern) = Self::pattern(size) else {
            return smallvec::smallvec![self.offset_of(center)];
        };
        // Even sizes are centered on a shared vertex; nudge a quarter
        // cell toward the anchor so the anchor hex contains the probe.
        let quarter = self.radius() / 2.0;
        let probe = match (size % 2 == 0, self.layout.is_rows()) {
            (true, true) => Point::new(center.x, center.y - quarter),
            (true, false) => Point::new(center.x - quarter, center.y),
            (false, _) => center,
        };
        let (aq, ar) = self.offset_to_axial(self.offset_of(probe));
        pattern
            .iter()
            .map(|&(dq, dr)| {
                // Flat-top layouts are the pointy-top pattern mirrored
                // across the diagonal, which swaps the axial axes.
                let (dq, dr) = if self.layout.is_rows() { (dq, dr) } else { (dr, dq) };
                self.axial_to_offset(aq + dq, ar + dr)
            })
            .collect()
    }

    fn instance_id(&self) -> GridInstanceId {
        self.params.instance_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use proptest::prelude::*;

    const LAYOUTS: [HexLayout; 4] = [
        HexLayout::OddRows,
        HexLayout::EvenRows,
        HexLayout::OddCols,
        HexLayout::EvenCols,
    ];

    fn grid(layout: HexLayout) -> HexGrid {
        HexGrid::new(100.0, 5.0, "ft", 2000.0, 2000.0, layout).unwrap()
    }

    // ── Conversions ─────────────────────────────────────────────

    #[test]
    fn axial_round_trip_all_layouts() {
        for layout in LAYOUTS {
            let g = grid(layout);
            for i in -4..6 {
                for j in -4..6 {
                    let o = GridOffset::new(i, j);
                    let (q, r) = g.offset_to_axial(o);
                    assert_eq!(g.axial_to_offset(q, r), o, "{layout:?} {o}");
                }
            }
        }
    }

    #[test]
    fn pixel_round_trip_all_layouts() {
        for layout in LAYOUTS {
            let g = grid(layout);
            for i in -3..6 {
                for j in -3..6 {
                    let o = GridOffset::new(i, j);
                    assert_eq!(g.offset_of(g.center_of(o)), o, "{layout:?} {o}");
                }
            }
        }
    }

    #[test]
    fn adjacent_centers_are_one_size_apart() {
        for layout in LAYOUTS {
            let g = grid(layout);
            let o = GridOffset::new(3, 3);
            let c = g.center_of(o);
            let mut adjacent = 0;
            for di in -1..=1 {
                for dj in -1..=1 {
                    let n = GridOffset::new(3 + di, 3 + dj);
                    if n != o && g.cube_distance(o, n) == 1 {
                        adjacent += 1;
                        let d = c.distance_to(&g.center_of(n));
                        assert!((d - 100.0).abs() < 1e-6, "{layout:?} {n}: {d}");
                    }
                }
            }
            assert_eq!(adjacent, 6, "{layout:?}");
        }
    }

    // ── Distance ────────────────────────────────────────────────

    #[test]
    fn distance_along_a_row() {
        let g = grid(HexLayout::OddRows);
        let a = g.center_of(GridOffset::new(2, 1));
        let b = g.center_of(GridOffset::new(2, 4));
        assert_eq!(g.measure_path(a, b, true), 15.0);
    }

    #[test]
    fn distance_zigzag_rows() {
        let g = grid(HexLayout::OddRows);
        // Straight down four rows from an even row moves two columns' worth
        // of stagger, but each step is still one cell.
        assert_eq!(g.cube_distance(GridOffset::new(0, 2), GridOffset::new(4, 2)), 4);
    }

    #[test]
    fn raw_measurement_is_euclidean() {
        let g = grid(HexLayout::EvenCols);
        let d = g.measure_path(Point::new(0.0, 0.0), Point::new(0.0, 200.0), false);
        assert!((d - 10.0).abs() < 1e-9);
    }

    // ── Occupancy tables ────────────────────────────────────────

    fn token_bounds(g: &HexGrid, anchor: GridOffset, size: f64) -> Bounds {
        // Place the token so its center sits where the table expects:
        // the anchor center for odd sizes, the shared vertex for even.
        let c = g.center_of(anchor);
        let r = g.radius();
        let center = if (size as u32) % 2 == 0 {
            if g.layout().is_rows() {
                Point::new(c.x, c.y + r)
            } else {
                Point::new(c.x + r, c.y)
            }
        } else {
            c
        };
        let px = size * g.size();
        Bounds::new(center.x - px / 2.0, center.y - px / 2.0, px, px)
    }

    #[test]
    fn table_sizes() {
        for layout in LAYOUTS {
            let g = grid(layout);
            for (size, expected) in [(1.0, 1), (2.0, 3), (3.0, 7), (4.0, 12)] {
                let anchor = GridOffset::new(6, 6);
                let cells = g.occupied_offsets(&token_bounds(&g, anchor, size), &Footprint::square(size));
                assert_eq!(cells.len(), expected, "{layout:?} size {size}");
                assert!(cells.contains(&anchor), "{layout:?} size {size}");
            }
        }
    }

    #[test]
    fn size_two_cells_are_mutually_adjacent() {
        for layout in LAYOUTS {
            let g = grid(layout);
            let cells = g.occupied_offsets(
                &token_bounds(&g, GridOffset::new(5, 5), 2.0),
                &Footprint::square(2.0),
            );
            for a in &cells {
                for b in &cells {
                    assert!(g.cube_distance(*a, *b) <= 1, "{layout:?} {a} {b}");
                }
            }
        }
    }

    #[test]
    fn size_three_is_a_disk() {
        let g = grid(HexLayout::EvenRows);
        let anchor = GridOffset::new(4, 4);
        let cells = g.occupied_offsets(&token_bounds(&g, anchor, 3.0), &Footprint::square(3.0));
        assert!(cells.iter().all(|c| g.cube_distance(anchor, *c) <= 1));
    }

    #[test]
    fn oversized_token_falls_back_to_subdivision() {
        let g = grid(HexLayout::OddRows);
        let cells = g.occupied_offsets(
            &Bounds::new(100.0, 100.0, 500.0, 500.0),
            &Footprint::square(5.0),
        );
        assert!(cells.len() > 12);
    }

    // ── Compliance ──────────────────────────────────────────────

    #[test]
    fn compliance_all_layouts() {
        for layout in LAYOUTS {
            compliance::run_full_compliance(&grid(layout));
        }
    }

    proptest! {
        #[test]
        fn cube_distance_is_metric(
            ai in -10i32..10, aj in -10i32..10,
            bi in -10i32..10, bj in -10i32..10,
            ci in -10i32..10, cj in -10i32..10,
        ) {
            for layout in LAYOUTS {
                let g = grid(layout);
                let a = GridOffset::new(ai, aj);
                let b = GridOffset::new(bi, bj);
                let c = GridOffset::new(ci, cj);
                prop_assert_eq!(g.cube_distance(a, a), 0);
                prop_assert_eq!(g.cube_distance(a, b), g.cube_distance(b, a));
                prop_assert!(g.cube_distance(a, c) <= g.cube_distance(a, b) + g.cube_distance(b, c));
            }
        }

        #[test]
        fn offset_of_is_nearest_center(x in 0.0f64..1500.0, y in 0.0f64..1500.0) {
            for layout in LAYOUTS {
                let g = grid(layout);
                let p = Point::new(x, y);
                let o = g.offset_of(p);
                let d = p.distance_to(&g.center_of(o));
                // The containing hex's center is within one corner radius.
                prop_assert!(d <= g.radius() + 1e-6, "{:?} {} {}", layout, o, d);
            }
        }
    }
}
