//! Range band planning for Vantage.
//!
//! A token's range bands are ordered thresholds in scene units. The
//! planner turns them into a [`HighlightSet`]: for gridded scenes, the
//! cells in each band; for gridless scenes, one grown footprint shape
//! per band. [`BandPlanner`] tracks per-token pass state so that a newer
//! request always wins over an older one.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod band;
pub mod highlight;
pub mod planner;

pub use band::{normalize_bands, BandStyle, RangeBand};
pub use highlight::{BandGeometry, BandHighlight, HighlightSet};
pub use planner::{plan_bands, plan_cells, BandPlanner, PlanOptions, PlanTicket, PlannerState, SearchWindow};
