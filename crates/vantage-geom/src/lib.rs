//! Shape model and closest-point solver for Vantage.
//!
//! Token footprints become [`Shape`] values (rectangle, circle, or
//! ellipse) rebuilt from pixel bounds on every query. [`closest`] finds
//! the nearest pair of points between any two shapes; [`closest_cells`]
//! snaps that answer to occupied cells on gridded scenes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cells;
pub mod closest;
pub mod shape;

pub use cells::{closest_cells, token_closest_points};
pub use closest::{closest, closest_to_point};
pub use shape::{Shape, ShapeKind};
