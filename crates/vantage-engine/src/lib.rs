//! Overlay engine for Vantage.
//!
//! Wires the geometry, measurement, and planning crates to a host:
//!
//! - [`OverlayConfig`]: validated settings threaded through every pass
//! - [`Scheduler`]: per-token debounce with a single latest-wins slot
//! - [`RangeStrategy`] / [`StrategyRegistry`]: pluggable game rules for
//!   ranges and cover, guarded so adapter failures never escape
//! - [`PlaceableRegistry`] / [`SceneRenderer`]: the host's side
//! - [`OverlayEngine`]: turns placeable events into highlights and labels

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod scheduler;
pub mod strategy;

pub use config::{ConfigError, OverlayConfig};
pub use engine::{OverlayEngine, PumpReport, RecomputeParams};
pub use error::EngineError;
pub use events::{EventSender, PlaceableEvent};
pub use host::{PlaceableRegistry, SceneRenderer};
pub use scheduler::{Dispatch, Scheduler};
pub use strategy::{
    CoverBonus, FallbackStrategy, RangeSpec, RangeStrategy, StrategyError, StrategyRegistry,
    FALLBACK_RULESET,
};
