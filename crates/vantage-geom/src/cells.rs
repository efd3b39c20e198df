//! Grid-snapped closest points between tokens.

use vantage_core::{Point, TokenSnapshot};
use vantage_grid::GridTopology;

use crate::closest::closest;
use crate::shape::Shape;

/// Nearest occupied-cell centers of two tokens on a gridded scene.
///
/// The footprint rectangles give a continuous seed pair. Each token's
/// answer is then the center of its own occupied cell nearest to the
/// other token's seed, so swapping the arguments swaps the outputs.
/// Returned points carry each token's elevation.
pub fn closest_cells(
    grid: &dyn GridTopology,
    a: &TokenSnapshot,
    b: &TokenSnapshot,
) -> (Point, Point) {
    let (seed_a, seed_b) = closest(&Shape::rect(&a.bounds), &Shape::rect(&b.bounds));
    let pa = nearest_occupied_center(grid, a, seed_b).unwrap_or(seed_a);
    let pb = nearest_occupied_center(grid, b, seed_a).unwrap_or(seed_b);
    (pa.at_elevation(a.elevation), pb.at_elevation(b.elevation))
}

/// Closest points between two tokens for the scene's grid kind.
///
/// Gridded scenes snap to occupied cells; gridless scenes use the
/// continuous footprint shapes, honoring each token's round flag.
pub fn token_closest_points(
    grid: &dyn GridTopology,
    a: &TokenSnapshot,
    b: &TokenSnapshot,
) -> (Point, Point) {
    if grid.kind().is_gridded() {
        return closest_cells(grid, a, b);
    }
    let (pa, pb) = closest(
        &Shape::from_bounds(&a.bounds, a.round),
        &Shape::from_bounds(&b.bounds, b.round),
    );
    (pa.at_elevation(a.elevation), pb.at_elevation(b.elevation))
}

fn nearest_occupied_center(
    grid: &dyn GridTopology,
    token: &TokenSnapshot,
    target: Point,
) -> Option<Point> {
    grid.occupied_offsets(&token.bounds, &token.footprint)
        .iter()
        .map(|o| grid.center_of(*o))
        .min_by(|p, q| p.distance_to(&target).total_cmp(&q.distance_to(&target)))
}
