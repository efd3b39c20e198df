//! Core types for the Vantage tabletop measurement engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental values shared by every other Vantage crate: typed
//! identifiers, pixel-space points and bounds, grid-unit footprints,
//! vertical elevation intervals, and the immutable token snapshot that
//! a planning pass reads from.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod elevation;
pub mod geometry;
pub mod id;
pub mod token;

pub use elevation::ElevationInterval;
pub use geometry::{Bounds, Footprint, Point};
pub use id::{GridInstanceId, ItemId, TokenId};
pub use token::TokenSnapshot;
