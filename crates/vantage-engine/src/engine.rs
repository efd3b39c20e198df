//! The overlay engine: events in, highlights and labels out.
//!
//! [`OverlayEngine`] owns the active topology, the strategy registry, the
//! recompute scheduler, and one binding per token it has been told about.
//! It is single-threaded: events arrive either through the direct
//! `on_*` methods or through an [`EventSender`] drained by
//! [`pump`](OverlayEngine::pump), which also runs due recomputes. Direct
//! callers move the clock with [`advance`](OverlayEngine::advance).

use std::time::Duration;

use indexmap::IndexMap;
use tracing::{debug, trace};
use vantage_bands::{plan_bands, BandPlanner, HighlightSet, RangeBand};
use vantage_core::{Bounds, ItemId, Point, TokenId, TokenSnapshot};
use vantage_geom::token_closest_points;
use vantage_grid::GridTopology;
use vantage_measure::{measure_tokens, DistanceLabel};

use crate::config::OverlayConfig;
use crate::error::EngineError;
use crate::events::{EventQueue, EventSender, PlaceableEvent};
use crate::host::{PlaceableRegistry, SceneRenderer};
use crate::scheduler::{Dispatch, Scheduler};
use crate::strategy::{RangeSpec, StrategyRegistry};

/// Latest known position of a token, carried by a pending recompute.
///
/// Fields left `None` are read from the registry when the pass runs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RecomputeParams {
    /// Bounds from the most recent move event.
    pub bounds: Option<Bounds>,
    /// Elevation from the most recent move event.
    pub elevation: Option<f64>,
}

impl RecomputeParams {
    fn apply(&self, mut snapshot: TokenSnapshot) -> TokenSnapshot {
        if let Some(bounds) = self.bounds {
            snapshot.bounds = bounds;
        }
        if let Some(elevation) = self.elevation {
            snapshot.elevation = elevation;
        }
        snapshot
    }
}

/// Counts from one [`pump`](OverlayEngine::pump).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// Events drained from the ingress channel.
    pub events: usize,
    /// Deferred recomputes that came due and ran.
    pub recomputes: usize,
}

#[derive(Debug, Default)]
struct Binding {
    hovered: bool,
    controlled: bool,
    highlight: Option<HighlightSet>,
}

/// Range highlight and distance label engine for one scene.
pub struct OverlayEngine<R, S> {
    config: OverlayConfig,
    registry: R,
    renderer: S,
    strategies: StrategyRegistry,
    topology: Option<Box<dyn GridTopology>>,
    scheduler: Scheduler<RecomputeParams>,
    planner: BandPlanner,
    bindings: IndexMap<TokenId, Binding>,
    /// Drag preview id → original id.
    previews: IndexMap<TokenId, TokenId>,
    labelled: Option<TokenId>,
    events: EventQueue,
    now: Duration,
}

impl<R: PlaceableRegistry, S: SceneRenderer> OverlayEngine<R, S> {
    /// Create an engine with no active scene.
    pub fn new(config: OverlayConfig, registry: R, renderer: S) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            scheduler: Scheduler::new(config.debounce),
            config,
            registry,
            renderer,
            strategies: StrategyRegistry::new(),
            topology: None,
            planner: BandPlanner::new(),
            bindings: IndexMap::new(),
            previews: IndexMap::new(),
            labelled: None,
            events: EventQueue::new(),
            now: Duration::ZERO,
        })
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Active configuration.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Replace the configuration. Pending recomputes are dropped and
    /// visible highlights are recomputed under the new settings.
    pub fn set_config(&mut self, config: OverlayConfig) -> Result<(), EngineError> {
        config.validate()?;
        self.scheduler = Scheduler::new(config.debounce);
        self.config = config;
        self.refresh_all();
        Ok(())
    }

    /// The host registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Mutable host registry, for hosts that keep it inside the engine.
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// The host renderer.
    pub fn renderer(&self) -> &S {
        &self.renderer
    }

    /// Mutable host renderer.
    pub fn renderer_mut(&mut self) -> &mut S {
        &mut self.renderer
    }

    /// Strategy registry.
    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    /// Mutable strategy registry, for registration and activation.
    pub fn strategies_mut(&mut self) -> &mut StrategyRegistry {
        &mut self.strategies
    }

    /// The active topology, if a scene is loaded.
    pub fn topology(&self) -> Option<&dyn GridTopology> {
        self.topology.as_deref()
    }

    /// Handle for submitting events from other threads.
    pub fn sender(&self) -> EventSender {
        self.events.sender()
    }

    /// Engine clock: the `now` of the latest [`pump`](Self::pump).
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Current highlight of `id`.
    pub fn highlight(&self, id: TokenId) -> Option<&HighlightSet> {
        self.bindings.get(&id).and_then(|b| b.highlight.as_ref())
    }

    /// Whether a recompute for `id` is waiting on the debounce.
    pub fn is_pending(&self, id: TokenId) -> bool {
        self.scheduler.is_pending(id)
    }

    /// When the next deferred recompute comes due.
    pub fn next_due(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    /// The token an active drag preview stands in for.
    pub fn preview_original(&self, preview: TokenId) -> Option<TokenId> {
        self.previews.get(&preview).copied()
    }

    /// Number of tokens with a binding.
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    // ── Scene ───────────────────────────────────────────────────

    /// Switch scenes. Every binding, pending recompute, and label is
    /// cleared; `None` leaves the engine with no active scene.
    pub fn set_topology(&mut self, topology: Option<Box<dyn GridTopology>>) {
        for (id, binding) in self.bindings.drain(..) {
            if binding.highlight.is_some() {
                self.renderer.clear_highlight(id);
            }
        }
        if let Some(hovered) = self.labelled.take() {
            self.renderer.clear_labels(hovered);
        }
        self.previews.clear();
        self.scheduler.clear();
        self.planner.clear();
        if let Some(grid) = &topology {
            self.strategies.set_cell_distance(grid.distance());
            debug!(kind = ?grid.kind(), size = grid.size(), distance = grid.distance(), "scene topology changed");
        } else {
            debug!("scene cleared");
        }
        self.topology = topology;
    }

    // ── Events ──────────────────────────────────────────────────

    /// Move the engine clock forward to `now`. Earlier times are ignored.
    ///
    /// Debouncing measures against this clock, so hosts calling
    /// [`handle`](Self::handle) or the `on_*` methods directly advance it
    /// first. [`pump`](Self::pump) advances it on its own.
    pub fn advance(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Drain queued events, then run every recompute due at `now`.
    pub fn pump(&mut self, now: Duration) -> PumpReport {
        self.advance(now);
        let events = self.events.drain();
        let mut report = PumpReport {
            events: events.len(),
            recomputes: 0,
        };
        for event in events {
            self.handle(event);
        }
        for (id, params) in self.scheduler.poll(self.now) {
            self.recompute(id, params);
            report.recomputes += 1;
        }
        report
    }

    /// Apply one event immediately, at the current engine clock.
    pub fn handle(&mut self, event: PlaceableEvent) {
        match event {
            PlaceableEvent::Moved {
                id,
                bounds,
                elevation,
            } => self.on_placeable_moved(id, bounds, elevation),
            PlaceableEvent::Removed { id } => self.on_placeable_removed(id),
            PlaceableEvent::HoverChanged { id, hovering } => self.on_hover_changed(id, hovering),
            PlaceableEvent::ControlChanged { id, controlled } => {
                self.on_control_changed(id, controlled)
            }
            PlaceableEvent::DragPreviewStarted { preview, original } => {
                self.on_drag_preview_started(preview, original)
            }
            PlaceableEvent::DragPreviewEnded { preview, original } => {
                self.on_drag_preview_ended(preview, original)
            }
        }
    }

    /// A placeable moved. Visible highlights are recomputed, debounced.
    pub fn on_placeable_moved(&mut self, id: TokenId, bounds: Bounds, elevation: f64) {
        if self.is_visible(id) {
            self.schedule(
                id,
                RecomputeParams {
                    bounds: Some(bounds),
                    elevation: Some(elevation),
                },
            );
        }
        if self.labelled.is_some() {
            self.refresh_labels();
        }
    }

    /// A placeable was deleted: cancel its pending work and drop its
    /// binding.
    pub fn on_placeable_removed(&mut self, id: TokenId) {
        self.drop_binding(id);
        self.previews.shift_remove(&id);
        if self.labelled == Some(id) {
            self.renderer.clear_labels(id);
            self.labelled = None;
        } else if self.labelled.is_some() {
            self.refresh_labels();
        }
    }

    /// Pointer entered or left a placeable.
    pub fn on_hover_changed(&mut self, id: TokenId, hovering: bool) {
        self.bindings.entry(id).or_default().hovered = hovering;
        self.update_visibility(id);
        if hovering && self.config.show_on_hover {
            self.show_labels(id);
        } else if self.labelled == Some(id) {
            self.renderer.clear_labels(id);
            self.labelled = None;
        }
    }

    /// Local control of a placeable changed.
    pub fn on_control_changed(&mut self, id: TokenId, controlled: bool) {
        self.bindings.entry(id).or_default().controlled = controlled;
        self.update_visibility(id);
        if self.labelled.is_some() {
            self.refresh_labels();
        }
    }

    /// A drag preview of `original` appeared. The preview inherits the
    /// original's visibility and gets its own highlight.
    pub fn on_drag_preview_started(&mut self, preview: TokenId, original: TokenId) {
        self.previews.insert(preview, original);
        let (hovered, controlled) = self
            .bindings
            .get(&original)
            .map_or((false, false), |b| (b.hovered, b.controlled));
        let binding = self.bindings.entry(preview).or_default();
        binding.hovered = hovered;
        binding.controlled = controlled;
        self.update_visibility(preview);
    }

    /// A drag finished. The preview's highlight is handed to the original,
    /// which is then recomputed at its final position.
    pub fn on_drag_preview_ended(&mut self, preview: TokenId, original: TokenId) {
        self.previews.shift_remove(&preview);
        self.scheduler.cancel(preview);
        self.planner.reset(preview);
        let carried = self.bindings.shift_remove(&preview).and_then(|b| b.highlight);
        if carried.is_some() {
            self.renderer.clear_highlight(preview);
        }
        if !self.is_visible(original) {
            return;
        }
        if let Some(mut set) = carried {
            debug!(%preview, %original, "transferring drag preview highlight");
            set.token = original;
            self.renderer.draw_highlight(&set);
            self.bindings.entry(original).or_default().highlight = Some(set);
        }
        // The move that ended the drag is authoritative; skip the debounce.
        self.scheduler.cancel(original);
        self.recompute(original, RecomputeParams::default());
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Rounded distance between two tokens, with the configured offset.
    pub fn measure_between(&self, from: TokenId, to: TokenId) -> Option<f64> {
        let grid = self.topology.as_deref()?;
        let a = self.registry.token(from)?;
        let b = self.registry.token(to)?;
        Some(measure_tokens(grid, &a, &b, &self.config.measure_options()))
    }

    /// Closest points between two tokens, each tagged with its elevation.
    pub fn closest(&self, a: TokenId, b: TokenId) -> Option<(Point, Point)> {
        let grid = self.topology.as_deref()?;
        let a = self.registry.token(a)?;
        let b = self.registry.token(b)?;
        Some(token_closest_points(grid, &a, &b))
    }

    /// Bands for an item held by `holder`, from the active strategy.
    ///
    /// Returned to the caller rather than drawn; `None` without a scene
    /// or when the holder is unknown.
    pub fn plan_item_bands(&self, item: ItemId, holder: TokenId) -> Option<HighlightSet> {
        let grid = self.topology.as_deref()?;
        let token = self.registry.token(holder)?;
        let ranges = self.strategies.item_ranges(item, &token);
        Some(self.plan_ranges(grid, &token, &ranges))
    }

    // ── Internals ───────────────────────────────────────────────

    fn is_visible(&self, id: TokenId) -> bool {
        self.bindings.get(&id).is_some_and(|b| {
            (b.hovered && self.config.show_on_hover) || (b.controlled && self.config.show_on_control)
        })
    }

    fn update_visibility(&mut self, id: TokenId) {
        if self.is_visible(id) {
            // A highlight that is not on screen yet skips the debounce.
            if self.highlight(id).is_none() {
                self.scheduler.cancel(id);
            }
            self.schedule(id, RecomputeParams::default());
        } else {
            self.hide(id);
        }
    }

    fn hide(&mut self, id: TokenId) {
        self.scheduler.cancel(id);
        self.planner.reset(id);
        let Some(binding) = self.bindings.get_mut(&id) else {
            return;
        };
        if binding.highlight.take().is_some() {
            self.renderer.clear_highlight(id);
        }
        if !binding.hovered && !binding.controlled {
            self.bindings.shift_remove(&id);
        }
    }

    fn drop_binding(&mut self, id: TokenId) {
        self.hide(id);
        self.bindings.shift_remove(&id);
    }

    fn schedule(&mut self, id: TokenId, params: RecomputeParams) {
        match self.scheduler.request(id, params, self.now) {
            Dispatch::RunNow(params) => self.recompute(id, params),
            Dispatch::Deferred { .. } => {}
        }
    }

    fn refresh_all(&mut self) {
        let visible: Vec<TokenId> = self
            .bindings
            .keys()
            .copied()
            .filter(|id| self.is_visible(*id))
            .collect();
        for id in visible {
            self.recompute(id, RecomputeParams::default());
        }
        if self.labelled.is_some() {
            self.refresh_labels();
        }
    }

    /// Plan and publish one token's highlight.
    fn recompute(&mut self, id: TokenId, params: RecomputeParams) {
        self.scheduler.complete(id, self.now);
        let Some(snapshot) = self.registry.token(id).map(|t| params.apply(t)) else {
            trace!(token = %id, "token vanished before recompute");
            self.drop_binding(id);
            return;
        };
        let Some(grid) = self.topology.as_deref() else {
            trace!(token = %id, "no active scene; clearing highlight");
            self.hide(id);
            return;
        };
        let ranges = self.strategies.token_ranges(&snapshot);
        let ticket = self.planner.begin(id);
        let set = self.plan_ranges(grid, &snapshot, &ranges);
        let Some(set) = self.planner.finish(ticket, set) else {
            return;
        };
        debug!(token = %id, bands = set.bands.len(), cells = set.cell_count(), "recomputed highlight");
        if set.is_empty() {
            self.hide(id);
            return;
        }
        self.renderer.draw_highlight(&set);
        self.bindings.entry(id).or_default().highlight = Some(set);
    }

    fn plan_ranges(&self, grid: &dyn GridTopology, token: &TokenSnapshot, ranges: &[RangeSpec]) -> HighlightSet {
        let bands: Vec<RangeBand> = ranges
            .iter()
            .map(|r| RangeBand {
                threshold: r.range,
                style: r.style,
                measure: r.measure_override.clone(),
            })
            .collect();
        plan_bands(grid, token, &bands, &self.config.plan_options())
    }

    fn show_labels(&mut self, hovered: TokenId) {
        if let Some(previous) = self.labelled.replace(hovered) {
            if previous != hovered {
                self.renderer.clear_labels(previous);
            }
        }
        self.refresh_labels();
    }

    /// Rebuild labels from every controlled token to the hovered one.
    fn refresh_labels(&mut self) {
        let Some(hovered) = self.labelled else {
            return;
        };
        let labels = self.build_labels(hovered);
        self.renderer.draw_labels(hovered, &labels);
    }

    fn build_labels(&self, hovered: TokenId) -> Vec<DistanceLabel> {
        let (Some(grid), Some(target)) = (self.topology.as_deref(), self.registry.token(hovered)) else {
            return Vec::new();
        };
        let options = self.config.measure_options();
        self.registry
            .controlled()
            .into_iter()
            .filter(|id| *id != hovered)
            .filter_map(|id| self.registry.token(id))
            .map(|origin| {
                let value = measure_tokens(grid, &origin, &target, &options);
                let cover = self.strategies.cover(&origin, &target).map(|c| c.0);
                DistanceLabel::new(
                    origin.id,
                    hovered,
                    target.bounds.center(),
                    value,
                    self.config.precision,
                    grid.units(),
                )
                .with_cover(cover)
            })
            .collect()
    }
}
