//! Grid distance engine for Vantage.
//!
//! Converts pairs of elevation-tagged pixel points into scene distances.
//! Topology rules are delegated to the active [`GridTopology`] provider;
//! this crate adds volumetric elevation handling, precision rounding, the
//! static offset, and per-query measurement overrides.
//!
//! [`GridTopology`]: vantage_grid::GridTopology

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod distance;
pub mod label;
pub mod options;

pub use distance::{measure_distance, measure_raw, measure_tokens, round_to_precision, volumetric_target};
pub use label::{format_distance, DistanceLabel};
pub use options::{Endpoint, MeasureFn, MeasureOptions};
