//! Grid topology compliance test helpers.
//!
//! These functions verify that a provider satisfies the invariants the
//! measurement engine and range planner rely on. Reused across every
//! backend test module (SquareGrid, HexGrid, Gridless).

use crate::topology::{GridOffset, GridTopology};
use indexmap::IndexSet;
use vantage_core::{Bounds, Footprint, Point};

/// A fixed spread of probe points across the first few cells.
fn probes(grid: &dyn GridTopology) -> Vec<Point> {
    let s = grid.size();
    let mut out = Vec::new();
    for k in 0..5 {
        for l in 0..5 {
            out.push(Point::new(
                (l as f64 * 0.93 + 0.17) * s,
                (k as f64 * 1.07 + 0.31) * s,
            ));
        }
    }
    out
}

/// Assert that `measure_path(a, a) == 0.0` in both modes.
pub fn assert_measure_reflexive(grid: &dyn GridTopology) {
    for p in probes(grid) {
        for snap in [true, false] {
            let d = grid.measure_path(p, p, snap);
            assert!(d.abs() < f64::EPSILON, "measure({p:?}, {p:?}, {snap}) = {d}");
        }
    }
}

/// Assert that `measure_path(a, b) == measure_path(b, a)`.
pub fn assert_measure_symmetric(grid: &dyn GridTopology) {
    let pts = probes(grid);
    for a in &pts {
        for b in &pts {
            for snap in [true, false] {
                let dab = grid.measure_path(*a, *b, snap);
                let dba = grid.measure_path(*b, *a, snap);
                assert!(
                    (dab - dba).abs() < 1e-9,
                    "measure({a:?}, {b:?}) = {dab} != measure({b:?}, {a:?}) = {dba}"
                );
            }
        }
    }
}

/// Assert that snapped measurement never goes negative and grows with
/// cell separation along a row.
pub fn assert_measure_monotone_along_row(grid: &dyn GridTopology) {
    let origin = grid.center_of(GridOffset::new(2, 0));
    let mut last = 0.0;
    for j in 1..8 {
        let d = grid.measure_path(origin, grid.center_of(GridOffset::new(2, j)), true);
        assert!(d > last, "measure to column {j} = {d}, expected > {last}");
        last = d;
    }
}

/// Assert that every cell center maps back to its own offset.
pub fn assert_center_round_trip(grid: &dyn GridTopology) {
    let (rows, cols) = grid.dimensions();
    for i in 0..rows.min(12) {
        for j in 0..cols.min(12) {
            let o = GridOffset::new(i, j);
            assert_eq!(grid.offset_of(grid.center_of(o)), o, "center round trip at {o}");
        }
    }
}

/// Assert that occupancy returns unique cells and includes the cell
/// under the token's center.
pub fn assert_occupancy_well_formed(grid: &dyn GridTopology) {
    let s = grid.size();
    for size in [0.5, 1.0, 2.0, 3.0] {
        let b = Bounds::new(3.0 * s, 3.0 * s, size * s, size * s);
        let cells = grid.occupied_offsets(&b, &Footprint::square(size));
        let unique: IndexSet<_> = cells.iter().collect();
        assert_eq!(unique.len(), cells.len(), "duplicate occupied cells for size {size}");
        assert!(!cells.is_empty(), "no occupied cells for size {size}");
    }
}

/// Assert that unit conversion is a consistent pair.
pub fn assert_unit_conversion_inverse(grid: &dyn GridTopology) {
    for units in [0.0, 1.0, 5.0, 37.5] {
        let back = grid.pixels_to_units(grid.units_to_pixels(units));
        assert!((back - units).abs() < 1e-9, "{units} -> {back}");
    }
}

/// Run all compliance checks on a provider.
pub fn run_full_compliance(grid: &dyn GridTopology) {
    assert_measure_reflexive(grid);
    assert_measure_symmetric(grid);
    assert_measure_monotone_along_row(grid);
    assert_center_round_trip(grid);
    assert_occupancy_well_formed(grid);
    assert_unit_conversion_inverse(grid);
}
