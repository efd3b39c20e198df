//! Integration test: placeable events flowing through the overlay engine.
//!
//! Drives an [`OverlayEngine`] backed by the mock registry and recording
//! renderer through hover, control, movement, drag, and removal, and
//! checks what ends up on screen.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use vantage_bands::BandGeometry;
use vantage_core::{Bounds, ItemId, Point, TokenId, TokenSnapshot};
use vantage_engine::{
    CoverBonus, EngineError, OverlayConfig, OverlayEngine, PlaceableEvent, RangeSpec, RangeStrategy,
    StrategyError,
};
use vantage_grid::{DiagonalRule, GridOffset, GridTopology, Gridless, SquareGrid};
use vantage_measure::MeasureFn;
use vantage_test_utils::fixtures::{ConstStrategy, FailingStrategy, PanickingStrategy};
use vantage_test_utils::{token_at, MockRegistry, RecordingRenderer};

type Engine = OverlayEngine<MockRegistry, RecordingRenderer>;

const CELL: f64 = 100.0;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn square_grid() -> Box<SquareGrid> {
    Box::new(SquareGrid::new(CELL, 5.0, "ft", 2000.0, 2000.0, DiagonalRule::Equidistant).unwrap())
}

fn cell_bounds(col: f64, row: f64) -> Bounds {
    Bounds::new(col * CELL, row * CELL, CELL, CELL)
}

/// Engine on a 20×20 square grid with a strategy reaching 5 and 10 ft.
fn engine_with(config: OverlayConfig) -> Engine {
    let mut engine = OverlayEngine::new(config, MockRegistry::new(), RecordingRenderer::new()).unwrap();
    engine.set_topology(Some(square_grid()));
    engine
        .strategies_mut()
        .register(Box::new(ConstStrategy::new("skirmish", &[5.0, 10.0]).with_cover(2.0)));
    engine.strategies_mut().activate("skirmish").unwrap();
    engine.registry_mut().insert(token_at(1, 5.0, 5.0, 1.0, CELL));
    engine
}

fn engine() -> Engine {
    engine_with(OverlayConfig::default())
}

fn hover(engine: &mut Engine, id: u64, hovering: bool) {
    engine.handle(PlaceableEvent::HoverChanged {
        id: TokenId(id),
        hovering,
    });
}

fn moved(id: u64, col: f64, row: f64) -> PlaceableEvent {
    PlaceableEvent::Moved {
        id: TokenId(id),
        bounds: cell_bounds(col, row),
        elevation: 0.0,
    }
}

// ── Highlight lifecycle ──────────────────────────────────────────────

#[test]
fn hover_draws_banded_highlight_immediately() {
    let mut engine = engine();
    hover(&mut engine, 1, true);

    let set = engine.renderer().highlight(TokenId(1)).expect("highlight drawn");
    assert_eq!(set.bands.len(), 2);
    assert_eq!(set.band_of(GridOffset::new(5, 6)), Some(0));
    assert_eq!(set.band_of(GridOffset::new(6, 6)), Some(0));
    assert_eq!(set.band_of(GridOffset::new(5, 7)), Some(1));
    assert_eq!(set.band_of(GridOffset::new(5, 8)), None);
    assert_eq!(engine.renderer().draw_count(TokenId(1)), 1);
    assert!(engine.highlight(TokenId(1)).is_some());
}

#[test]
fn hover_off_clears_highlight() {
    let mut engine = engine();
    hover(&mut engine, 1, true);
    hover(&mut engine, 1, false);
    assert!(engine.renderer().highlight(TokenId(1)).is_none());
    assert!(engine.highlight(TokenId(1)).is_none());
}

#[test]
fn control_without_hover_keeps_highlight_visible() {
    let mut engine = engine();
    engine.handle(PlaceableEvent::ControlChanged {
        id: TokenId(1),
        controlled: true,
    });
    assert!(engine.renderer().highlight(TokenId(1)).is_some());

    hover(&mut engine, 1, true);
    hover(&mut engine, 1, false);
    assert!(engine.renderer().highlight(TokenId(1)).is_some());

    engine.handle(PlaceableEvent::ControlChanged {
        id: TokenId(1),
        controlled: false,
    });
    assert!(engine.renderer().highlight(TokenId(1)).is_none());
}

#[test]
fn hidden_token_moves_do_not_schedule() {
    let mut engine = engine();
    engine.handle(moved(1, 7.0, 7.0));
    assert!(!engine.is_pending(TokenId(1)));
    assert_eq!(engine.renderer().draw_count(TokenId(1)), 0);
}

// ── Debounce ─────────────────────────────────────────────────────────

#[test]
fn burst_of_moves_coalesces_into_one_recompute_with_latest_position() {
    let mut engine = engine();
    hover(&mut engine, 1, true);
    let tx = engine.sender();

    for k in 0..10 {
        tx.send(moved(1, 5.0 + k as f64, 5.0)).unwrap();
    }
    let report = engine.pump(ms(20));
    assert_eq!(report.events, 10);
    assert_eq!(report.recomputes, 0);
    assert!(engine.is_pending(TokenId(1)));
    assert_eq!(engine.next_due(), Some(ms(150)));

    assert_eq!(engine.pump(ms(149)).recomputes, 0);
    let report = engine.pump(ms(150));
    assert_eq!(report.recomputes, 1);
    assert!(!engine.is_pending(TokenId(1)));
    assert_eq!(engine.renderer().draw_count(TokenId(1)), 2);

    // Last move put the token at column 14.
    let set = engine.renderer().highlight(TokenId(1)).unwrap();
    assert_eq!(set.band_of(GridOffset::new(5, 15)), Some(0));
    assert_eq!(set.band_of(GridOffset::new(5, 6)), None);
}

#[test]
fn move_after_quiet_period_runs_immediately() {
    let mut engine = engine();
    hover(&mut engine, 1, true);
    let tx = engine.sender();
    tx.send(moved(1, 8.0, 8.0)).unwrap();
    let report = engine.pump(ms(400));
    assert_eq!(report.recomputes, 0);
    assert!(!engine.is_pending(TokenId(1)));
    assert_eq!(engine.renderer().draw_count(TokenId(1)), 2);
}

#[test]
fn direct_calls_debounce_against_advanced_clock() {
    let mut engine = engine();
    hover(&mut engine, 1, true);
    engine.handle(moved(1, 6.0, 5.0));
    assert!(engine.is_pending(TokenId(1)));
    assert_eq!(engine.pump(ms(150)).recomputes, 1);

    engine.advance(ms(1000));
    engine.on_placeable_moved(TokenId(1), cell_bounds(8.0, 5.0), 0.0);
    assert!(!engine.is_pending(TokenId(1)));
    assert_eq!(engine.renderer().draw_count(TokenId(1)), 3);
    let set = engine.renderer().highlight(TokenId(1)).unwrap();
    assert_eq!(set.band_of(GridOffset::new(5, 9)), Some(0));

    engine.advance(ms(10));
    assert_eq!(engine.now(), ms(1000));
}

#[test]
fn removal_cancels_pending_recompute() {
    let mut engine = engine();
    hover(&mut engine, 1, true);
    engine.handle(moved(1, 6.0, 5.0));
    assert!(engine.is_pending(TokenId(1)));

    engine.registry_mut().remove(TokenId(1));
    engine.handle(PlaceableEvent::Removed { id: TokenId(1) });
    assert!(!engine.is_pending(TokenId(1)));
    assert!(engine.renderer().highlight(TokenId(1)).is_none());

    assert_eq!(engine.pump(ms(500)).recomputes, 0);
    assert_eq!(engine.binding_count(), 0);
}

#[test]
fn bindings_are_dropped_once_nothing_shows_them() {
    let mut engine = engine();
    engine.registry_mut().insert(token_at(2, 8.0, 5.0, 1.0, CELL));
    hover(&mut engine, 1, true);
    hover(&mut engine, 2, true);
    assert_eq!(engine.binding_count(), 2);
    hover(&mut engine, 1, false);
    hover(&mut engine, 2, false);
    assert_eq!(engine.binding_count(), 0);

    engine.handle(PlaceableEvent::ControlChanged {
        id: TokenId(1),
        controlled: true,
    });
    hover(&mut engine, 1, true);
    hover(&mut engine, 1, false);
    assert_eq!(engine.binding_count(), 1);
    assert!(engine.highlight(TokenId(1)).is_some());
}

// ── Scene changes ────────────────────────────────────────────────────

#[test]
fn clearing_scene_removes_everything() {
    let mut engine = engine();
    hover(&mut engine, 1, true);
    engine.handle(moved(1, 6.0, 5.0));

    engine.set_topology(None);
    assert!(engine.topology().is_none());
    assert_eq!(engine.renderer().visible_highlights(), 0);
    assert_eq!(engine.binding_count(), 0);
    assert!(engine.next_due().is_none());

    hover(&mut engine, 1, true);
    assert!(engine.renderer().highlight(TokenId(1)).is_none());
    assert_eq!(engine.renderer().draw_count(TokenId(1)), 1);
    assert!(engine.measure_between(TokenId(1), TokenId(1)).is_none());
}

#[test]
fn gridless_scene_draws_expanded_shapes() {
    let mut engine = engine();
    let gridless = Gridless::new(CELL, 5.0, "ft", 2000.0, 2000.0).unwrap();
    engine.set_topology(Some(Box::new(gridless)));
    hover(&mut engine, 1, true);

    let set = engine.renderer().highlight(TokenId(1)).unwrap();
    let inner = set.band(0).unwrap();
    assert!(matches!(inner.geometry, BandGeometry::RoundedRect { .. }));
    assert!(inner.geometry.contains_point(&Point::new(650.0, 550.0)));
    assert!(!inner.geometry.contains_point(&Point::new(750.0, 550.0)));
    let outer = set.band(1).unwrap();
    assert!(outer.geometry.contains_point(&Point::new(750.0, 550.0)));
}

// ── Drag previews ────────────────────────────────────────────────────

#[test]
fn drag_preview_hands_highlight_back_to_original() {
    let mut engine = engine();
    engine.registry_mut().set_controlled(TokenId(1), true);
    engine.handle(PlaceableEvent::ControlChanged {
        id: TokenId(1),
        controlled: true,
    });
    engine.registry_mut().insert(token_at(2, 5.0, 5.0, 1.0, CELL));
    engine.handle(PlaceableEvent::DragPreviewStarted {
        preview: TokenId(2),
        original: TokenId(1),
    });
    assert_eq!(engine.preview_original(TokenId(2)), Some(TokenId(1)));
    assert!(engine.renderer().highlight(TokenId(2)).is_some());

    engine.handle(moved(2, 9.0, 5.0));
    assert!(engine.is_pending(TokenId(2)));

    engine.registry_mut().move_to(TokenId(1), cell_bounds(9.0, 5.0), 0.0);
    engine.handle(PlaceableEvent::DragPreviewEnded {
        preview: TokenId(2),
        original: TokenId(1),
    });

    assert!(engine.preview_original(TokenId(2)).is_none());
    assert!(!engine.is_pending(TokenId(2)));
    assert!(engine.renderer().highlight(TokenId(2)).is_none());
    let set = engine.renderer().highlight(TokenId(1)).unwrap();
    assert_eq!(set.token, TokenId(1));
    assert_eq!(set.band_of(GridOffset::new(5, 10)), Some(0));
    assert!(!engine.is_pending(TokenId(1)));
}

// ── Labels ───────────────────────────────────────────────────────────

#[test]
fn hover_shows_labels_from_controlled_tokens_with_cover() {
    let mut engine = engine();
    engine.registry_mut().insert(token_at(2, 8.0, 5.0, 1.0, CELL));
    engine.registry_mut().set_controlled(TokenId(1), true);
    engine.handle(PlaceableEvent::ControlChanged {
        id: TokenId(1),
        controlled: true,
    });
    hover(&mut engine, 2, true);

    let labels = engine.renderer().labels(TokenId(2)).unwrap();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].from, TokenId(1));
    assert_eq!(labels[0].value, 15.0);
    assert_eq!(labels[0].text, "15.0 ft");
    assert_eq!(labels[0].cover, Some(2.0));

    hover(&mut engine, 2, false);
    assert!(engine.renderer().labels(TokenId(2)).is_none());
}

#[test]
fn labels_follow_controlled_token_moves() {
    let mut engine = engine();
    engine.registry_mut().insert(token_at(2, 8.0, 5.0, 1.0, CELL));
    engine.registry_mut().set_controlled(TokenId(1), true);
    hover(&mut engine, 2, true);

    engine.registry_mut().move_to(TokenId(1), cell_bounds(7.0, 5.0), 0.0);
    engine.handle(moved(1, 7.0, 5.0));
    let labels = engine.renderer().labels(TokenId(2)).unwrap();
    assert_eq!(labels[0].value, 5.0);
}

#[test]
fn measure_between_applies_offset() {
    let config = OverlayConfig {
        offset: 1.0,
        ..OverlayConfig::default()
    };
    let mut engine = engine_with(config);
    engine.registry_mut().insert(token_at(2, 8.0, 5.0, 1.0, CELL));
    assert_eq!(engine.measure_between(TokenId(1), TokenId(2)), Some(16.0));
    assert!(engine.measure_between(TokenId(1), TokenId(99)).is_none());
}

#[test]
fn item_bands_are_returned_not_drawn() {
    let engine = engine();
    let set = engine.plan_item_bands(ItemId(7), TokenId(1)).unwrap();
    assert_eq!(set.band_of(GridOffset::new(5, 7)), Some(1));
    assert_eq!(engine.renderer().calls.len(), 0);
}

/// Inner reach that never connects and an outer reach measured in a
/// straight line, each through its own measurement.
struct SplitMeasure;

impl RangeStrategy for SplitMeasure {
    fn id(&self) -> &str {
        "split"
    }

    fn token_range(&self, _token: &TokenSnapshot) -> Result<Vec<RangeSpec>, StrategyError> {
        let never: MeasureFn = Arc::new(|_: &dyn GridTopology, _: Point, _: Point| 100.0);
        let straight: MeasureFn =
            Arc::new(|g: &dyn GridTopology, a: Point, b: Point| g.pixels_to_units(a.distance_to(&b)));
        Ok(vec![
            RangeSpec::new(5.0).with_measure(never),
            RangeSpec::new(10.0).with_measure(straight),
        ])
    }

    fn item_range(&self, _item: ItemId, _token: &TokenSnapshot) -> Result<Vec<RangeSpec>, StrategyError> {
        Ok(Vec::new())
    }

    fn calculate_cover(
        &self,
        _attacker: &TokenSnapshot,
        _target: &TokenSnapshot,
    ) -> Result<Option<CoverBonus>, StrategyError> {
        Ok(None)
    }
}

#[test]
fn each_range_classifies_with_its_own_measurement() {
    let mut engine = engine();
    engine.strategies_mut().register(Box::new(SplitMeasure));
    engine.strategies_mut().activate("split").unwrap();
    hover(&mut engine, 1, true);

    let set = engine.renderer().highlight(TokenId(1)).expect("highlight drawn");
    assert_eq!(set.band(0).map(|b| b.geometry.is_empty()), Some(true));
    assert_eq!(set.band_of(GridOffset::new(5, 5)), Some(1));
    assert_eq!(set.band_of(GridOffset::new(5, 7)), Some(1));
    assert_eq!(set.band_of(GridOffset::new(6, 6)), Some(1));
    // Straight-line 11.2 and 14.1 ft fall outside the 10 ft reach.
    assert_eq!(set.band_of(GridOffset::new(6, 7)), None);
    assert_eq!(set.band_of(GridOffset::new(7, 7)), None);
    assert_eq!(set.cell_count(), 13);
}

// ── Strategy faults ──────────────────────────────────────────────────

#[test]
fn failing_strategy_clears_stale_highlight() {
    let mut engine = engine();
    engine
        .strategies_mut()
        .register(Box::new(FailingStrategy::new("flaky", 5.0, 1)));
    engine.strategies_mut().activate("flaky").unwrap();

    hover(&mut engine, 1, true);
    assert!(engine.renderer().highlight(TokenId(1)).is_some());

    engine.handle(moved(1, 6.0, 5.0));
    assert_eq!(engine.pump(ms(150)).recomputes, 1);
    assert!(engine.renderer().highlight(TokenId(1)).is_none());
}

#[test]
fn panicking_strategy_is_contained() {
    let mut engine = engine();
    engine
        .strategies_mut()
        .register(Box::new(PanickingStrategy::new("broken")));
    engine.strategies_mut().activate("broken").unwrap();
    engine.registry_mut().insert(token_at(2, 8.0, 5.0, 1.0, CELL));
    engine.registry_mut().set_controlled(TokenId(1), true);

    hover(&mut engine, 2, true);
    assert!(engine.renderer().highlight(TokenId(2)).is_none());
    let labels = engine.renderer().labels(TokenId(2)).unwrap();
    assert_eq!(labels[0].cover, None);
    assert_eq!(labels[0].value, 15.0);
}

#[test]
fn unknown_ruleset_falls_back_to_one_cell() {
    let mut engine = engine();
    assert!(!engine.strategies_mut().activate_or_fallback("missing"));
    hover(&mut engine, 1, true);
    let set = engine.renderer().highlight(TokenId(1)).unwrap();
    assert_eq!(set.bands.len(), 1);
    assert_eq!(set.band_of(GridOffset::new(6, 6)), Some(0));
    assert_eq!(set.band_of(GridOffset::new(5, 7)), None);
}

// ── Ingress and config ───────────────────────────────────────────────

#[test]
fn events_from_other_threads_are_applied_on_pump() {
    let mut engine = engine();
    let tx = engine.sender();
    let handle = thread::spawn(move || {
        tx.send(PlaceableEvent::HoverChanged {
            id: TokenId(1),
            hovering: true,
        })
        .unwrap();
    });
    handle.join().unwrap();

    assert!(engine.renderer().highlight(TokenId(1)).is_none());
    let report = engine.pump(ms(0));
    assert_eq!(report.events, 1);
    assert!(engine.renderer().highlight(TokenId(1)).is_some());
}

#[test]
fn invalid_config_is_rejected() {
    let config = OverlayConfig {
        precision: 40,
        ..OverlayConfig::default()
    };
    let result = OverlayEngine::new(config, MockRegistry::new(), RecordingRenderer::new());
    assert!(matches!(result, Err(EngineError::Config(_))));

    let mut engine = engine();
    let bad = OverlayConfig {
        window_scale: 0.5,
        ..OverlayConfig::default()
    };
    assert!(engine.set_config(bad).is_err());
    assert_eq!(engine.config().window_scale, 1.5);
}
