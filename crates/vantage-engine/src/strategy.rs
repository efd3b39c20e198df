//! Range and cover strategies.
//!
//! Game-system rules stay outside the engine. A [`RangeStrategy`] answers
//! three questions with plain numbers: how far a token reaches, how far
//! an item held by a token reaches, and what cover one token has against
//! another. Strategies are registered under a ruleset id in a
//! [`StrategyRegistry`], which activates exactly one at a time.
//!
//! Everything the engine asks goes through the registry's boundary
//! helpers. An adapter that errors, panics, or returns malformed numbers
//! is logged and treated as having no opinion; the engine keeps going.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use indexmap::IndexMap;
use tracing::{debug, warn};
use vantage_bands::BandStyle;
use vantage_core::{ItemId, TokenSnapshot};
use vantage_measure::MeasureFn;

use crate::error::EngineError;

/// Ruleset id of [`FallbackStrategy`].
pub const FALLBACK_RULESET: &str = "fallback";

// ── StrategyError ──────────────────────────────────────────────────

/// Why a strategy produced no usable answer.
#[derive(Clone, Debug, PartialEq)]
pub enum StrategyError {
    /// The adapter reported a failure.
    Failed {
        /// Adapter-provided description.
        reason: String,
    },
    /// The adapter panicked.
    Panicked {
        /// Panic payload, if it was a string.
        message: String,
    },
    /// The adapter returned numbers the engine cannot use.
    Malformed {
        /// Which value was rejected.
        reason: String,
    },
}

impl fmt::Display for StrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { reason } => write!(f, "strategy failed: {reason}"),
            Self::Panicked { message } => write!(f, "strategy panicked: {message}"),
            Self::Malformed { reason } => write!(f, "malformed strategy output: {reason}"),
        }
    }
}

impl Error for StrategyError {}

// ── Outputs ────────────────────────────────────────────────────────

/// One range reported by a strategy.
#[derive(Clone)]
pub struct RangeSpec {
    /// Range in scene units.
    pub range: f64,
    /// Replacement for the topology's path measurement while planning
    /// this range.
    pub measure_override: Option<MeasureFn>,
    /// Explicit band style; `None` uses the configured palette.
    pub style: Option<BandStyle>,
}

impl RangeSpec {
    /// A plain range with palette styling.
    pub fn new(range: f64) -> Self {
        Self {
            range,
            measure_override: None,
            style: None,
        }
    }

    /// Builder-style style setter.
    pub fn with_style(mut self, style: BandStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Builder-style measurement override.
    pub fn with_measure(mut self, measure: MeasureFn) -> Self {
        self.measure_override = Some(measure);
        self
    }
}

impl fmt::Debug for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeSpec")
            .field("range", &self.range)
            .field("measure_override", &self.measure_override.is_some())
            .field("style", &self.style)
            .finish()
    }
}

/// Cover bonus of a target against an attacker. Zero is an opinion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverBonus(pub f64);

// ── RangeStrategy ──────────────────────────────────────────────────

/// Game-system adapter for ranges and cover.
///
/// Empty range lists and `None` cover mean "no opinion", which is
/// distinct from a range or bonus of zero.
pub trait RangeStrategy: Send {
    /// Ruleset id this strategy serves.
    fn id(&self) -> &str;

    /// Ranges around a token.
    fn token_range(&self, token: &TokenSnapshot) -> Result<Vec<RangeSpec>, StrategyError>;

    /// Ranges of an item held by a token.
    fn item_range(
        &self,
        item: ItemId,
        token: &TokenSnapshot,
    ) -> Result<Vec<RangeSpec>, StrategyError>;

    /// Cover the target has against the attacker.
    fn calculate_cover(
        &self,
        attacker: &TokenSnapshot,
        target: &TokenSnapshot,
    ) -> Result<Option<CoverBonus>, StrategyError>;
}

/// Default strategy: one grid cell of reach and no cover opinion.
///
/// The range is expressed in scene units, so it needs the scene distance
/// per cell.
#[derive(Clone, Debug)]
pub struct FallbackStrategy {
    cell_distance: f64,
}

impl FallbackStrategy {
    /// Fallback reaching one cell of `cell_distance` scene units.
    pub fn new(cell_distance: f64) -> Self {
        Self { cell_distance }
    }

    /// Update the per-cell distance after a scene change.
    pub fn set_cell_distance(&mut self, cell_distance: f64) {
        self.cell_distance = cell_distance;
    }
}

impl Default for FallbackStrategy {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RangeStrategy for FallbackStrategy {
    fn id(&self) -> &str {
        FALLBACK_RULESET
    }

    fn token_range(&self, _token: &TokenSnapshot) -> Result<Vec<RangeSpec>, StrategyError> {
        Ok(vec![RangeSpec::new(self.cell_distance)])
    }

    fn item_range(
        &self,
        _item: ItemId,
        _token: &TokenSnapshot,
    ) -> Result<Vec<RangeSpec>, StrategyError> {
        Ok(vec![RangeSpec::new(self.cell_distance)])
    }

    fn calculate_cover(
        &self,
        _attacker: &TokenSnapshot,
        _target: &TokenSnapshot,
    ) -> Result<Option<CoverBonus>, StrategyError> {
        Ok(None)
    }
}

// ── StrategyRegistry ───────────────────────────────────────────────

/// Strategies keyed by ruleset id, with exactly one active.
///
/// A new registry holds only the [`FallbackStrategy`], which is active.
pub struct StrategyRegistry {
    strategies: IndexMap<String, Box<dyn RangeStrategy>>,
    active: String,
    fallback: FallbackStrategy,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("registered", &self.strategies.keys().collect::<Vec<_>>())
            .field("active", &self.active)
            .finish()
    }
}

impl StrategyRegistry {
    /// Registry with the fallback active.
    pub fn new() -> Self {
        Self {
            strategies: IndexMap::new(),
            active: FALLBACK_RULESET.to_owned(),
            fallback: FallbackStrategy::default(),
        }
    }

    /// Register a strategy under its id. Returns the one it replaced.
    pub fn register(&mut self, strategy: Box<dyn RangeStrategy>) -> Option<Box<dyn RangeStrategy>> {
        let id = strategy.id().to_owned();
        debug!(ruleset = %id, "registering range strategy");
        self.strategies.insert(id, strategy)
    }

    /// Make `id` the active ruleset.
    ///
    /// The fallback id is always accepted.
    pub fn activate(&mut self, id: &str) -> Result<(), EngineError> {
        if id != FALLBACK_RULESET && !self.strategies.contains_key(id) {
            return Err(EngineError::UnknownRuleset { id: id.to_owned() });
        }
        debug!(ruleset = %id, "activating range strategy");
        self.active = id.to_owned();
        Ok(())
    }

    /// Activate `id` if registered, otherwise the fallback. Returns
    /// whether `id` itself was activated.
    pub fn activate_or_fallback(&mut self, id: &str) -> bool {
        match self.activate(id) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "falling back to default range strategy");
                self.active = FALLBACK_RULESET.to_owned();
                false
            }
        }
    }

    /// Id of the active ruleset.
    pub fn active_id(&self) -> &str {
        &self.active
    }

    /// Ruleset ids registered, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(String::as_str)
    }

    /// The active strategy.
    pub fn active(&self) -> &dyn RangeStrategy {
        match self.strategies.get(&self.active) {
            Some(strategy) => strategy.as_ref(),
            None => &self.fallback,
        }
    }

    /// Keep the fallback's one-cell reach in step with the scene.
    pub fn set_cell_distance(&mut self, cell_distance: f64) {
        self.fallback.set_cell_distance(cell_distance);
    }

    /// Ranges around `token`; empty when the strategy has no opinion.
    pub fn token_ranges(&self, token: &TokenSnapshot) -> Vec<RangeSpec> {
        self.guarded("token_range", |s| s.token_range(token).and_then(validate_ranges))
            .unwrap_or_default()
    }

    /// Ranges of `item` held by `token`; empty when there is no opinion.
    pub fn item_ranges(&self, item: ItemId, token: &TokenSnapshot) -> Vec<RangeSpec> {
        self.guarded("item_range", |s| s.item_range(item, token).and_then(validate_ranges))
            .unwrap_or_default()
    }

    /// Cover of `target` against `attacker`, if the strategy has an opinion.
    pub fn cover(&self, attacker: &TokenSnapshot, target: &TokenSnapshot) -> Option<CoverBonus> {
        self.guarded("calculate_cover", |s| {
            s.calculate_cover(attacker, target).and_then(validate_cover)
        })
        .flatten()
    }

    /// Call into the active strategy, converting errors and panics into
    /// a logged `None`.
    fn guarded<T>(
        &self,
        op: &'static str,
        call: impl FnOnce(&dyn RangeStrategy) -> Result<T, StrategyError>,
    ) -> Option<T> {
        let strategy = self.active();
        let outcome = catch_unwind(AssertUnwindSafe(|| call(strategy))).unwrap_or_else(|payload| {
            Err(StrategyError::Panicked {
                message: panic_message(payload.as_ref()),
            })
        });
        match outcome {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(ruleset = %strategy.id(), op, %error, "range strategy failed; treating as no opinion");
                None
            }
        }
    }
}

fn validate_ranges(ranges: Vec<RangeSpec>) -> Result<Vec<RangeSpec>, StrategyError> {
    match ranges.iter().find(|r| !r.range.is_finite() || r.range < 0.0) {
        Some(bad) => Err(StrategyError::Malformed {
            reason: format!("range {}", bad.range),
        }),
        None => Ok(ranges),
    }
}

fn validate_cover(cover: Option<CoverBonus>) -> Result<Option<CoverBonus>, StrategyError> {
    match cover {
        Some(CoverBonus(v)) if !v.is_finite() => Err(StrategyError::Malformed {
            reason: format!("cover {v}"),
        }),
        other => Ok(other),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;
    use vantage_core::{Bounds, Footprint, TokenId};

    fn token() -> TokenSnapshot {
        TokenSnapshot::new(TokenId(1), Bounds::new(0.0, 0.0, 100.0, 100.0), Footprint::square(1.0))
    }

    struct Scripted {
        id: &'static str,
        range: f64,
        cover: Option<f64>,
        fail: bool,
        panic: bool,
    }

    impl Scripted {
        fn ok(id: &'static str, range: f64) -> Self {
            Self {
                id,
                range,
                cover: Some(2.0),
                fail: false,
                panic: false,
            }
        }
    }

    impl RangeStrategy for Scripted {
        fn id(&self) -> &str {
            self.id
        }

        fn token_range(&self, _token: &TokenSnapshot) -> Result<Vec<RangeSpec>, StrategyError> {
            if self.panic {
                panic!("adapter exploded");
            }
            if self.fail {
                return Err(StrategyError::Failed {
                    reason: "no actor data".into(),
                });
            }
            Ok(vec![RangeSpec::new(self.range)])
        }

        fn item_range(&self, item: ItemId, _token: &TokenSnapshot) -> Result<Vec<RangeSpec>, StrategyError> {
            Ok(vec![RangeSpec::new(item.0 as f64)])
        }

        fn calculate_cover(
            &self,
            _attacker: &TokenSnapshot,
            _target: &TokenSnapshot,
        ) -> Result<Option<CoverBonus>, StrategyError> {
            Ok(self.cover.map(CoverBonus))
        }
    }

    #[test]
    fn new_registry_uses_fallback() {
        let reg = StrategyRegistry::new();
        assert_eq!(reg.active_id(), FALLBACK_RULESET);
        let ranges = reg.token_ranges(&token());
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].range, 1.0);
        assert_eq!(reg.cover(&token(), &token()), None);
    }

    #[test]
    fn fallback_tracks_cell_distance() {
        let mut reg = StrategyRegistry::new();
        reg.set_cell_distance(5.0);
        assert_eq!(reg.token_ranges(&token())[0].range, 5.0);
    }

    #[test]
    fn activation() {
        let mut reg = StrategyRegistry::new();
        reg.register(Box::new(Scripted::ok("dnd5e", 30.0)));
        assert_eq!(
            reg.activate("pf2e"),
            Err(EngineError::UnknownRuleset { id: "pf2e".into() })
        );
        reg.activate("dnd5e").unwrap();
        assert_eq!(reg.token_ranges(&token())[0].range, 30.0);
        assert_eq!(reg.cover(&token(), &token()), Some(CoverBonus(2.0)));
        assert_eq!(reg.item_ranges(ItemId(60), &token())[0].range, 60.0);
        assert_eq!(reg.ids().collect::<Vec<_>>(), vec!["dnd5e"]);
    }

    #[test]
    fn reregistering_replaces() {
        let mut reg = StrategyRegistry::new();
        assert!(reg.register(Box::new(Scripted::ok("x", 1.0))).is_none());
        assert!(reg.register(Box::new(Scripted::ok("x", 2.0))).is_some());
        reg.activate("x").unwrap();
        assert_eq!(reg.token_ranges(&token())[0].range, 2.0);
    }

    #[traced_test]
    #[test]
    fn unknown_ruleset_falls_back_with_warning() {
        let mut reg = StrategyRegistry::new();
        assert!(!reg.activate_or_fallback("missing"));
        assert_eq!(reg.active_id(), FALLBACK_RULESET);
        assert!(logs_contain("falling back to default range strategy"));
    }

    #[traced_test]
    #[test]
    fn failure_is_no_opinion() {
        let mut reg = StrategyRegistry::new();
        reg.register(Box::new(Scripted {
            fail: true,
            ..Scripted::ok("broken", 5.0)
        }));
        reg.activate("broken").unwrap();
        assert!(reg.token_ranges(&token()).is_empty());
        assert!(logs_contain("treating as no opinion"));
        assert!(logs_contain("no actor data"));
    }

    #[traced_test]
    #[test]
    fn panic_is_caught() {
        let mut reg = StrategyRegistry::new();
        reg.register(Box::new(Scripted {
            panic: true,
            ..Scripted::ok("panicky", 5.0)
        }));
        reg.activate("panicky").unwrap();
        assert!(reg.token_ranges(&token()).is_empty());
        assert!(logs_contain("adapter exploded"));
        // Other calls still work.
        assert_eq!(reg.cover(&token(), &token()), Some(CoverBonus(2.0)));
    }

    #[traced_test]
    #[test]
    fn malformed_output_rejected() {
        let mut reg = StrategyRegistry::new();
        reg.register(Box::new(Scripted {
            cover: Some(f64::NAN),
            ..Scripted::ok("nan", -3.0)
        }));
        reg.activate("nan").unwrap();
        assert!(reg.token_ranges(&token()).is_empty());
        assert_eq!(reg.cover(&token(), &token()), None);
        assert!(logs_contain("malformed strategy output"));
    }

    #[test]
    fn zero_cover_is_an_opinion() {
        let mut reg = StrategyRegistry::new();
        reg.register(Box::new(Scripted {
            cover: Some(0.0),
            ..Scripted::ok("zero", 5.0)
        }));
        reg.activate("zero").unwrap();
        assert_eq!(reg.cover(&token(), &token()), Some(CoverBonus(0.0)));
    }
}
