//! End-to-end overlay walkthrough.
//!
//! Demonstrates: build scene → register ruleset → hover → drag a burst of
//! moves through the debounce → read highlights and labels.
//!
//! Set `RUST_LOG=vantage_engine=trace` to watch the scheduler and planner.

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use vantage_bench::{battle_map, CELL_PX};
use vantage_core::{Bounds, TokenId};
use vantage_engine::{OverlayConfig, OverlayEngine, PlaceableEvent};
use vantage_grid::DiagonalRule;
use vantage_test_utils::fixtures::ConstStrategy;
use vantage_test_utils::{token_at, MockRegistry, RecordingRenderer};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vantage_engine=debug")),
        )
        .init();

    println!("=== Vantage Overlay Walkthrough ===\n");

    let mut engine =
        OverlayEngine::new(OverlayConfig::default(), MockRegistry::new(), RecordingRenderer::new()).unwrap();
    engine.set_topology(Some(Box::new(battle_map(DiagonalRule::Alternating1).unwrap())));
    engine
        .strategies_mut()
        .register(Box::new(ConstStrategy::new("skirmish", &[30.0, 60.0]).with_cover(2.0)));
    engine.strategies_mut().activate("skirmish").unwrap();

    let archer = TokenId(1);
    let ogre = TokenId(2);
    engine.registry_mut().insert(token_at(1, 10.0, 10.0, 1.0, CELL_PX));
    engine.registry_mut().insert(token_at(2, 16.0, 12.0, 2.0, CELL_PX).with_elevation(10.0));
    engine.registry_mut().set_controlled(archer, true);

    // --- Control the archer: its bands appear at once ---
    engine.handle(PlaceableEvent::ControlChanged {
        id: archer,
        controlled: true,
    });
    if let Some(set) = engine.renderer().highlight(archer) {
        println!("archer highlight: {} bands, {} cells", set.bands.len(), set.cell_count());
    }

    // --- Hover the ogre: labels from the archer ---
    engine.handle(PlaceableEvent::HoverChanged {
        id: ogre,
        hovering: true,
    });
    for label in engine.renderer().labels(ogre).unwrap_or_default() {
        println!("label {} -> {}: {label}", label.from, label.to);
    }

    // --- Drag the archer: 20 moves in 100 ms collapse into one pass ---
    let tx = engine.sender();
    for step in 0..20u64 {
        let col = 10.0 + step as f64 * 0.25;
        let bounds = Bounds::new(col * CELL_PX, 10.0 * CELL_PX, CELL_PX, CELL_PX);
        engine.registry_mut().move_to(archer, bounds, 0.0);
        tx.send(PlaceableEvent::Moved {
            id: archer,
            bounds,
            elevation: 0.0,
        })
        .unwrap();
        let report = engine.pump(Duration::from_millis(5 * step));
        if report.recomputes > 0 {
            println!("  t={:>3}ms recomputed {}", 5 * step, report.recomputes);
        }
    }
    let due = engine.next_due().unwrap_or_default();
    let report = engine.pump(due);
    println!(
        "flushed at {}ms: {} recompute(s), {} highlight draws total",
        due.as_millis(),
        report.recomputes,
        engine.renderer().draw_count(archer)
    );

    for label in engine.renderer().labels(ogre).unwrap_or_default() {
        println!("label after drag {} -> {}: {label}", label.from, label.to);
    }
    if let Some(d) = engine.measure_between(archer, ogre) {
        println!("\narcher to ogre: {d} ft");
    }

    println!("\n=== Walkthrough complete ===");
}
