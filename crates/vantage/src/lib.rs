//! Vantage: range highlighting and distance measurement for tabletop grids.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Vantage sub-crates. For most hosts, adding `vantage` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use vantage::prelude::*;
//!
//! // A 20×20 square grid, 100 px cells, 5 ft per cell.
//! let grid = SquareGrid::new(100.0, 5.0, "ft", 2000.0, 2000.0, DiagonalRule::Equidistant).unwrap();
//!
//! let a = TokenSnapshot::new(TokenId(1), Bounds::new(0.0, 0.0, 100.0, 100.0), Footprint::square(1.0));
//! let b = TokenSnapshot::new(TokenId(2), Bounds::new(300.0, 0.0, 100.0, 100.0), Footprint::square(1.0));
//! assert_eq!(measure_tokens(&grid, &a, &b, &MeasureOptions::default()), 15.0);
//!
//! // Two nested bands around `a`: 5 ft and 10 ft.
//! let bands = [RangeBand::new(5.0), RangeBand::new(10.0)];
//! let set = plan_bands(&grid, &a, &bands, &PlanOptions::default());
//! assert_eq!(set.band_of(GridOffset::new(0, 1)), Some(0));
//! assert_eq!(set.band_of(GridOffset::new(0, 2)), Some(1));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `vantage-core` | Points, bounds, footprints, token snapshots, IDs |
//! | [`grid`] | `vantage-grid` | Grid topology trait and square/hex/gridless providers |
//! | [`geom`] | `vantage-geom` | Shape model and closest-point solver |
//! | [`measure`] | `vantage-measure` | Distance engine and labels |
//! | [`bands`] | `vantage-bands` | Range band planner and highlight sets |
//! | [`engine`] | `vantage-engine` | Overlay engine, scheduler, and strategies |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core geometry and token types (`vantage-core`).
pub use vantage_core as types;

/// Grid topology providers (`vantage-grid`).
///
/// Provides the [`grid::GridTopology`] trait and [`grid::SquareGrid`],
/// [`grid::HexGrid`], and [`grid::Gridless`].
pub use vantage_grid as grid;

/// Shape model and closest-point solver (`vantage-geom`).
pub use vantage_geom as geom;

/// Distance measurement and labels (`vantage-measure`).
///
/// [`measure::measure_distance`] for points, [`measure::measure_tokens`]
/// for token pairs.
pub use vantage_measure as measure;

/// Range band planning (`vantage-bands`).
pub use vantage_bands as bands;

/// Overlay engine (`vantage-engine`).
///
/// [`engine::OverlayEngine`] turns placeable events into highlights and
/// labels through the host's [`engine::PlaceableRegistry`] and
/// [`engine::SceneRenderer`].
pub use vantage_engine as engine;

/// Common imports for typical Vantage usage.
///
/// ```rust
/// use vantage::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use vantage_core::{Bounds, ElevationInterval, Footprint, ItemId, Point, TokenId, TokenSnapshot};

    // Grids
    pub use vantage_grid::{
        DiagonalRule, GridError, GridKind, GridOffset, GridTopology, Gridless, HexGrid, HexLayout,
        SquareGrid,
    };

    // Geometry
    pub use vantage_geom::{closest, token_closest_points, Shape};

    // Measurement
    pub use vantage_measure::{measure_distance, measure_tokens, DistanceLabel, MeasureOptions};

    // Bands
    pub use vantage_bands::{plan_bands, BandGeometry, BandStyle, HighlightSet, PlanOptions, RangeBand};

    // Engine
    pub use vantage_engine::{
        CoverBonus, EngineError, EventSender, OverlayConfig, OverlayEngine, PlaceableEvent,
        PlaceableRegistry, RangeSpec, RangeStrategy, SceneRenderer, StrategyError,
    };
}
