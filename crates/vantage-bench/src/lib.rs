//! Benchmark scenes and utilities for the Vantage overlay crates.
//!
//! Provides pre-built scenes for benchmarking and examples:
//!
//! - [`battle_map`]: 100x100 square grid, 100 px cells, 5 ft per cell
//! - [`hex_map`]: hex grid of similar extent
//! - [`scatter_tokens`]: deterministic token placement via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use vantage_core::{Bounds, Footprint, TokenId, TokenSnapshot};
use vantage_grid::{DiagonalRule, GridError, HexGrid, HexLayout, SquareGrid};

/// Cell size of every benchmark scene, in pixels.
pub const CELL_PX: f64 = 100.0;

/// Cells per side of every benchmark scene.
pub const CELLS: u32 = 100;

/// A 100x100 square battle map.
pub fn battle_map(rule: DiagonalRule) -> Result<SquareGrid, GridError> {
    let side = CELLS as f64 * CELL_PX;
    SquareGrid::new(CELL_PX, 5.0, "ft", side, side, rule)
}

/// A pointy-top hex map covering the same pixel area as [`battle_map`].
pub fn hex_map() -> Result<HexGrid, GridError> {
    let side = CELLS as f64 * CELL_PX;
    HexGrid::new(CELL_PX, 5.0, "ft", side, side, HexLayout::OddRows)
}

/// Place `n` tokens on a [`CELLS`]-wide square map.
///
/// Sizes are 1 to 3 cells, roughly one in four tokens is round, and
/// elevations are multiples of 5 up to 20. The same seed always yields the
/// same tokens.
pub fn scatter_tokens(n: usize, seed: u64) -> Vec<TokenSnapshot> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|k| {
            let size = rng.random_range(1..=3u32) as f64;
            let max_cell = CELLS - size as u32;
            let col = rng.random_range(0..=max_cell) as f64;
            let row = rng.random_range(0..=max_cell) as f64;
            let elevation = rng.random_range(0..=4u32) as f64 * 5.0;
            let side = size * CELL_PX;
            TokenSnapshot::new(
                TokenId(k as u64),
                Bounds::new(col * CELL_PX, row * CELL_PX, side, side),
                Footprint::square(size),
            )
            .with_elevation(elevation)
            .with_round(rng.random_bool(0.25))
        })
        .collect()
}
