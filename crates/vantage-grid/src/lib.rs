//! Grid topology providers for Vantage.
//!
//! This crate defines the [`GridTopology`] trait, the seam through which
//! the measurement engine and range planner learn everything they need
//! about a scene's grid, along with three concrete providers.
//!
//! # Backends
//!
//! - [`SquareGrid`]: square cells with a configurable [`DiagonalRule`]
//! - [`HexGrid`]: hexagonal cells in one of four [`HexLayout`]s, with
//!   occupancy tables for tokens up to size 4
//! - [`Gridless`]: continuous Euclidean measurement
//!
//! Hosts with their own grid engine implement [`GridTopology`] directly.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod gridless;
pub mod hex;
mod scene;
pub mod square;
pub mod topology;

#[cfg(test)]
pub(crate) mod compliance;

pub use error::GridError;
pub use gridless::Gridless;
pub use hex::{HexGrid, HexLayout};
pub use square::{DiagonalRule, SquareGrid};
pub use topology::{GridKind, GridOffset, GridTopology, Occupancy};
