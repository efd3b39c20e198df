//! Range band planning.
//!
//! Given a token snapshot and its bands, decide which cells (or which
//! continuous shapes on gridless scenes) fall in each band.
//!
//! Gridded scenes scan a bounded search window around the token. Every
//! candidate cell takes the first band (ascending) for which some
//! occupied cell of the token is within the threshold. Axis-symmetric
//! grids only scan one quadrant and mirror the result across the token's
//! row and column axes; the output is identical to the full scan.

use indexmap::IndexMap;
use tracing::{debug, trace};
use vantage_core::{Point, TokenId, TokenSnapshot};
use vantage_grid::{GridOffset, GridTopology};
use vantage_measure::{measure_distance, MeasureOptions};

use crate::band::{normalize_bands, BandStyle, RangeBand};
use crate::highlight::{BandGeometry, BandHighlight, HighlightSet};

/// Options for one planning pass.
#[derive(Clone, Debug)]
pub struct PlanOptions {
    /// Distance options used for membership (the static offset is ignored).
    pub measure: MeasureOptions,
    /// Search window radius as a multiple of the largest threshold.
    pub window_scale: f64,
    /// Draw gridless bands as ellipses even for square tokens.
    pub treat_as_round: bool,
    /// Allow the quadrant-mirroring shortcut where the grid permits it.
    pub use_symmetry: bool,
    /// Styles for bands without their own.
    pub palette: Vec<BandStyle>,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            measure: MeasureOptions::default(),
            window_scale: 1.5,
            treat_as_round: false,
            use_symmetry: true,
            palette: BandStyle::default_palette(),
        }
    }
}

/// Inclusive cell rectangle `[row_min, row_max] × [col_min, col_max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchWindow {
    /// First row.
    pub row_min: i32,
    /// Last row.
    pub row_max: i32,
    /// First column.
    pub col_min: i32,
    /// Last column.
    pub col_max: i32,
}

impl SearchWindow {
    /// Window reaching `radius` cells beyond the occupied cells on every
    /// side. Not clamped to the scene.
    pub fn around(occupied: &[GridOffset], radius: i32) -> Option<Self> {
        let first = occupied.first()?;
        let mut w = Self {
            row_min: first.i,
            row_max: first.i,
            col_min: first.j,
            col_max: first.j,
        };
        for o in occupied {
            w.row_min = w.row_min.min(o.i);
            w.row_max = w.row_max.max(o.i);
            w.col_min = w.col_min.min(o.j);
            w.col_max = w.col_max.max(o.j);
        }
        Some(w.grow(radius))
    }

    /// Cells in grid units needed to reach `max_threshold`, scaled.
    pub fn radius_for(grid: &dyn GridTopology, max_threshold: f64, scale: f64) -> i32 {
        let cells = (max_threshold / grid.distance() * scale).ceil();
        if cells.is_finite() && cells > 0.0 {
            cells.min(i32::MAX as f64 / 4.0) as i32
        } else {
            0
        }
    }

    fn grow(self, radius: i32) -> Self {
        Self {
            row_min: self.row_min.saturating_sub(radius),
            row_max: self.row_max.saturating_add(radius),
            col_min: self.col_min.saturating_sub(radius),
            col_max: self.col_max.saturating_add(radius),
        }
    }

    /// Intersection with the scene's `rows × cols`; `None` if empty.
    pub fn clamp_to(self, rows: i32, cols: i32) -> Option<Self> {
        let w = Self {
            row_min: self.row_min.max(0),
            row_max: self.row_max.min(rows - 1),
            col_min: self.col_min.max(0),
            col_max: self.col_max.min(cols - 1),
        };
        (w.row_min <= w.row_max && w.col_min <= w.col_max).then_some(w)
    }

    /// Whether `o` lies inside.
    pub fn contains(&self, o: GridOffset) -> bool {
        (self.row_min..=self.row_max).contains(&o.i) && (self.col_min..=self.col_max).contains(&o.j)
    }

    /// Number of cells covered.
    pub fn area(&self) -> u64 {
        let rows = (self.row_max as i64 - self.row_min as i64 + 1).max(0) as u64;
        let cols = (self.col_max as i64 - self.col_min as i64 + 1).max(0) as u64;
        rows * cols
    }
}

/// Plan the highlight for `token`.
///
/// Bands are normalized first; an empty result yields an empty set.
pub fn plan_bands(
    grid: &dyn GridTopology,
    token: &TokenSnapshot,
    bands: &[RangeBand],
    options: &PlanOptions,
) -> HighlightSet {
    let bands = normalize_bands(bands);
    if bands.is_empty() {
        return HighlightSet::empty(token.id, Some(grid.instance_id()));
    }
    if grid.kind().is_gridded() {
        plan_cells(grid, token, &bands, options, options.use_symmetry)
    } else {
        plan_shapes(grid, token, &bands, options)
    }
}

/// Gridded planner with the symmetry shortcut forced on or off.
///
/// `bands` must already be normalized. Exposed so callers can compare
/// both paths.
pub fn plan_cells(
    grid: &dyn GridTopology,
    token: &TokenSnapshot,
    bands: &[RangeBand],
    options: &PlanOptions,
    use_symmetry: bool,
) -> HighlightSet {
    let mut set = HighlightSet::empty(token.id, Some(grid.instance_id()));
    let mut occupied = grid.occupied_offsets(&token.bounds, &token.footprint).into_vec();
    if occupied.is_empty() {
        occupied.push(grid.offset_of(token.bounds.center()));
    }
    let max_threshold = bands.iter().map(|b| b.threshold).fold(0.0, f64::max);
    let radius = SearchWindow::radius_for(grid, max_threshold, options.window_scale);
    let Some(window) = SearchWindow::around(&occupied, radius) else {
        return set;
    };
    let (rows, cols) = grid.dimensions();
    let Some(clamped) = window.clamp_to(rows, cols) else {
        trace!(token = %token.id, "search window lies outside the scene");
        return set;
    };
    trace!(token = %token.id, radius, cells = clamped.area(), "band search window");

    let measure = options.measure.without_offset();
    // Bands with their own measurement classify with it; the rest share one.
    let band_measures: Vec<Option<MeasureOptions>> = bands
        .iter()
        .map(|b| b.measure.clone().map(|f| measure.clone().with_override(f)))
        .collect();
    let refs: Vec<Point> = occupied
        .iter()
        .map(|o| grid.center_of(*o).at_elevation(token.elevation))
        .collect();
    let nearest = |target: Point, measure: &MeasureOptions| -> f64 {
        refs.iter()
            .map(|r| measure_distance(grid, *r, target, None, measure))
            .fold(f64::INFINITY, f64::min)
    };
    let classify = |cell: GridOffset| -> Option<usize> {
        let target = grid.center_of(cell).at_elevation(token.elevation);
        let mut shared: Option<f64> = None;
        bands.iter().zip(&band_measures).position(|(band, own)| {
            let d = match own {
                Some(own) => nearest(target, own),
                None => *shared.get_or_insert_with(|| nearest(target, &measure)),
            };
            d <= band.threshold
        })
    };

    let mut cells: Vec<Vec<GridOffset>> = vec![Vec::new(); bands.len()];
    let uniform = measure.measure_override.is_none() && band_measures.iter().all(Option::is_none);
    let mirror = if use_symmetry && grid.is_axis_symmetric() && uniform {
        MirrorAxes::of(&occupied)
    } else {
        None
    };
    match mirror {
        Some(axes) => {
            let (rows, cols) = axes.quadrant(&window, &clamped);
            for i in rows.0..=rows.1 {
                for j in cols.0..=cols.1 {
                    let cell = GridOffset::new(i, j);
                    if !axes.images(cell).any(|m| clamped.contains(m)) {
                        continue;
                    }
                    let Some(band) = classify(cell) else { continue };
                    for m in axes.images(cell) {
                        if clamped.contains(m) {
                            cells[band].push(m);
                        }
                    }
                }
            }
        }
        None => {
            for i in clamped.row_min..=clamped.row_max {
                for j in clamped.col_min..=clamped.col_max {
                    let cell = GridOffset::new(i, j);
                    if let Some(band) = classify(cell) {
                        cells[band].push(cell);
                    }
                }
            }
        }
    }

    set.bands = bands
        .iter()
        .zip(cells)
        .enumerate()
        .map(|(index, (band, cells))| BandHighlight {
            index,
            threshold: band.threshold,
            style: band.resolved_style(index, &options.palette),
            geometry: BandGeometry::Cells(cells),
        })
        .collect();
    set
}

/// Row and column mirror axes of a rectangular occupied block.
#[derive(Clone, Copy, Debug)]
struct MirrorAxes {
    /// `2·r0 + h − 1`: a row `r` mirrors to `row_sum − r`.
    row_sum: i32,
    /// `2·c0 + w − 1`: a column `c` mirrors to `col_sum − c`.
    col_sum: i32,
}

impl MirrorAxes {
    /// Axes of `occupied`, or `None` if it is not a full rectangle.
    fn of(occupied: &[GridOffset]) -> Option<Self> {
        let w = SearchWindow::around(occupied, 0)?;
        if w.area() != occupied.len() as u64 {
            return None;
        }
        Some(Self {
            row_sum: w.row_min + w.row_max,
            col_sum: w.col_min + w.col_max,
        })
    }

    /// Last row of the scanned quadrant.
    fn row_split(&self) -> i32 {
        self.row_sum.div_euclid(2)
    }

    /// Last column of the scanned quadrant.
    fn col_split(&self) -> i32 {
        self.col_sum.div_euclid(2)
    }

    /// Row and column ranges of the quadrant to scan.
    ///
    /// Every cell of `clamped` has a mirror image in the result, and the
    /// result never reaches past `clamped` on the far side, so the scan
    /// is bounded by the scene rather than by the search radius.
    fn quadrant(
        &self,
        window: &SearchWindow,
        clamped: &SearchWindow,
    ) -> ((i32, i32), (i32, i32)) {
        let row_lo = clamped.row_min.min(self.row_sum - clamped.row_max);
        let col_lo = clamped.col_min.min(self.col_sum - clamped.col_max);
        (
            (window.row_min.max(row_lo), self.row_split().min(clamped.row_max)),
            (window.col_min.max(col_lo), self.col_split().min(clamped.col_max)),
        )
    }

    /// The distinct mirror images of `cell`, itself included.
    fn images(&self, cell: GridOffset) -> impl Iterator<Item = GridOffset> {
        let ri = self.row_sum - cell.i;
        let rj = self.col_sum - cell.j;
        let all = [
            GridOffset::new(cell.i, cell.j),
            GridOffset::new(cell.i, rj),
            GridOffset::new(ri, cell.j),
            GridOffset::new(ri, rj),
        ];
        let row_fixed = ri == cell.i;
        let col_fixed = rj == cell.j;
        all.into_iter().enumerate().filter_map(move |(k, o)| {
            let dup = match k {
                1 => col_fixed,
                2 => row_fixed,
                3 => row_fixed || col_fixed,
                _ => false,
            };
            (!dup).then_some(o)
        })
    }
}

/// Gridless planner: one grown shape per band, farthest first.
fn plan_shapes(
    grid: &dyn GridTopology,
    token: &TokenSnapshot,
    bands: &[RangeBand],
    options: &PlanOptions,
) -> HighlightSet {
    let round = options.treat_as_round || token.round;
    let b = token.bounds;
    let highlights = bands
        .iter()
        .enumerate()
        .rev()
        .map(|(index, band)| {
            let t = grid.units_to_pixels(band.threshold);
            let geometry = if round {
                BandGeometry::Ellipse {
                    center: b.center(),
                    rx: b.width / 2.0 + t,
                    ry: b.height / 2.0 + t,
                }
            } else {
                BandGeometry::RoundedRect {
                    bounds: b.expand(t),
                    radius: t,
                }
            };
            BandHighlight {
                index,
                threshold: band.threshold,
                style: band.resolved_style(index, &options.palette),
                geometry,
            }
        })
        .collect();
    HighlightSet {
        token: token.id,
        grid: Some(grid.instance_id()),
        bands: highlights,
    }
}

/// Where a token's planning currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlannerState {
    /// Nothing requested, or the result was discarded.
    Idle,
    /// A pass is running; only the pass holding `generation` may publish.
    Planning {
        /// Generation of the authoritative pass.
        generation: u64,
    },
    /// The latest pass published.
    Ready,
}

/// Receipt for a started pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanTicket {
    /// Token being planned.
    pub token: TokenId,
    /// Generation of this pass.
    pub generation: u64,
}

/// Per-token planning state machine.
///
/// `Idle → Planning → Ready`. Starting a new pass while one is running
/// preempts it: the older ticket can no longer publish.
#[derive(Debug, Default)]
pub struct BandPlanner {
    states: IndexMap<TokenId, PlannerState>,
    next_generation: u64,
}

impl BandPlanner {
    /// Empty planner; every token starts idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// State of `token`.
    pub fn state(&self, token: TokenId) -> PlannerState {
        self.states.get(&token).copied().unwrap_or(PlannerState::Idle)
    }

    /// Start a pass, preempting any running one.
    pub fn begin(&mut self, token: TokenId) -> PlanTicket {
        self.next_generation += 1;
        let generation = self.next_generation;
        if let Some(PlannerState::Planning { generation: old }) = self.states.get(&token) {
            debug!(%token, old, generation, "preempting planning pass");
        }
        self.states.insert(token, PlannerState::Planning { generation });
        PlanTicket { token, generation }
    }

    /// Finish a pass. Returns the set only if the ticket is still current.
    pub fn finish(&mut self, ticket: PlanTicket, set: HighlightSet) -> Option<HighlightSet> {
        match self.states.get_mut(&ticket.token) {
            Some(state) if *state == (PlannerState::Planning { generation: ticket.generation }) => {
                *state = PlannerState::Ready;
                Some(set)
            }
            _ => {
                debug!(token = %ticket.token, generation = ticket.generation, "discarding stale plan");
                None
            }
        }
    }

    /// Run a complete pass for a snapshot.
    pub fn plan(
        &mut self,
        grid: &dyn GridTopology,
        token: &TokenSnapshot,
        bands: &[RangeBand],
        options: &PlanOptions,
    ) -> Option<HighlightSet> {
        let ticket = self.begin(token.id);
        let set = plan_bands(grid, token, bands, options);
        self.finish(ticket, set)
    }

    /// Forget `token`; any running pass for it can no longer publish.
    pub fn reset(&mut self, token: TokenId) {
        self.states.shift_remove(&token);
    }

    /// Forget every token.
    pub fn clear(&mut self) {
        self.states.clear();
    }
}
