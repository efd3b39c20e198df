//! Reusable range strategy fixtures.
//!
//! Three standard strategies for registry and engine testing:
//!
//! - [`ConstStrategy`]: fixed ranges and an optional fixed cover bonus.
//! - [`FailingStrategy`]: succeeds N times, then fails every call.
//! - [`PanickingStrategy`]: panics on every call.

use std::sync::atomic::{AtomicUsize, Ordering};

use vantage_core::{ItemId, TokenSnapshot};
use vantage_engine::{CoverBonus, RangeSpec, RangeStrategy, StrategyError};

/// Reports the same ranges for every token and item.
pub struct ConstStrategy {
    pub id: String,
    pub ranges: Vec<f64>,
    pub cover: Option<f64>,
}

impl ConstStrategy {
    pub fn new(id: impl Into<String>, ranges: &[f64]) -> Self {
        Self {
            id: id.into(),
            ranges: ranges.to_vec(),
            cover: None,
        }
    }

    /// Builder-style cover bonus.
    pub fn with_cover(mut self, cover: f64) -> Self {
        self.cover = Some(cover);
        self
    }

    fn specs(&self) -> Vec<RangeSpec> {
        self.ranges.iter().map(|r| RangeSpec::new(*r)).collect()
    }
}

impl RangeStrategy for ConstStrategy {
    fn id(&self) -> &str {
        &self.id
    }

    fn token_range(&self, _token: &TokenSnapshot) -> Result<Vec<RangeSpec>, StrategyError> {
        Ok(self.specs())
    }

    fn item_range(&self, _item: ItemId, _token: &TokenSnapshot) -> Result<Vec<RangeSpec>, StrategyError> {
        Ok(self.specs())
    }

    fn calculate_cover(
        &self,
        _attacker: &TokenSnapshot,
        _target: &TokenSnapshot,
    ) -> Result<Option<CoverBonus>, StrategyError> {
        Ok(self.cover.map(CoverBonus))
    }
}

/// Succeeds for the first `succeed_count` calls, then fails.
///
/// Useful for checking that a strategy going bad mid-session clears
/// highlights instead of leaving stale ones.
pub struct FailingStrategy {
    pub id: String,
    pub range: f64,
    pub succeed_count: usize,
    calls: AtomicUsize,
}

impl FailingStrategy {
    pub fn new(id: impl Into<String>, range: f64, succeed_count: usize) -> Self {
        Self {
            id: id.into(),
            range,
            succeed_count,
            calls: AtomicUsize::new(0),
        }
    }

    /// Calls made so far, successful or not.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn next(&self) -> Result<(), StrategyError> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            Err(StrategyError::Failed {
                reason: format!("{} failed at call {n}", self.id),
            })
        } else {
            Ok(())
        }
    }
}

impl RangeStrategy for FailingStrategy {
    fn id(&self) -> &str {
        &self.id
    }

    fn token_range(&self, _token: &TokenSnapshot) -> Result<Vec<RangeSpec>, StrategyError> {
        self.next()?;
        Ok(vec![RangeSpec::new(self.range)])
    }

    fn item_range(&self, _item: ItemId, _token: &TokenSnapshot) -> Result<Vec<RangeSpec>, StrategyError> {
        self.next()?;
        Ok(vec![RangeSpec::new(self.range)])
    }

    fn calculate_cover(
        &self,
        _attacker: &TokenSnapshot,
        _target: &TokenSnapshot,
    ) -> Result<Option<CoverBonus>, StrategyError> {
        self.next()?;
        Ok(None)
    }
}

/// Panics on every call.
pub struct PanickingStrategy {
    pub id: String,
}

impl PanickingStrategy {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl RangeStrategy for PanickingStrategy {
    fn id(&self) -> &str {
        &self.id
    }

    fn token_range(&self, _token: &TokenSnapshot) -> Result<Vec<RangeSpec>, StrategyError> {
        panic!("{} token_range", self.id)
    }

    fn item_range(&self, _item: ItemId, _token: &TokenSnapshot) -> Result<Vec<RangeSpec>, StrategyError> {
        panic!("{} item_range", self.id)
    }

    fn calculate_cover(
        &self,
        _attacker: &TokenSnapshot,
        _target: &TokenSnapshot,
    ) -> Result<Option<CoverBonus>, StrategyError> {
        panic!("{} calculate_cover", self.id)
    }
}
