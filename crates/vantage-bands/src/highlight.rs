//! Planner output: per-band cells or continuous shapes.

use vantage_core::{Bounds, GridInstanceId, Point, TokenId};
use vantage_grid::GridOffset;

use crate::band::BandStyle;

/// What one band covers.
#[derive(Clone, Debug, PartialEq)]
pub enum BandGeometry {
    /// Grid cells whose nearest distance falls in this band.
    Cells(Vec<GridOffset>),
    /// Footprint rectangle grown by the threshold, corners rounded.
    RoundedRect {
        /// Outer bounds in pixels.
        bounds: Bounds,
        /// Corner radius in pixels.
        radius: f64,
    },
    /// Round footprint grown by the threshold.
    Ellipse {
        /// Center in pixels.
        center: Point,
        /// Horizontal semi-axis.
        rx: f64,
        /// Vertical semi-axis.
        ry: f64,
    },
}

impl BandGeometry {
    /// Whether the geometry covers nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Cells(cells) => cells.is_empty(),
            Self::RoundedRect { .. } | Self::Ellipse { .. } => false,
        }
    }

    /// Whether a pixel point lies inside a continuous shape.
    ///
    /// Always false for cell sets; use [`HighlightSet::band_of`] instead.
    pub fn contains_point(&self, p: &Point) -> bool {
        match *self {
            Self::Cells(_) => false,
            Self::RoundedRect { bounds, radius } => {
                if !bounds.contains(p) {
                    return false;
                }
                let r = radius.min(bounds.width / 2.0).min(bounds.height / 2.0);
                let cx = p.x.clamp(bounds.x + r, bounds.right() - r);
                let cy = p.y.clamp(bounds.y + r, bounds.bottom() - r);
                (p.x - cx).hypot(p.y - cy) <= r
            }
            Self::Ellipse { center, rx, ry } => {
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let dx = (p.x - center.x) / rx;
                let dy = (p.y - center.y) / ry;
                dx * dx + dy * dy <= 1.0
            }
        }
    }
}

/// One band of a highlight.
#[derive(Clone, Debug, PartialEq)]
pub struct BandHighlight {
    /// Position in the normalized (ascending) band list.
    pub index: usize,
    /// Threshold in scene units.
    pub threshold: f64,
    /// Resolved style.
    pub style: BandStyle,
    /// Covered cells or shape.
    pub geometry: BandGeometry,
}

/// Everything to paint for one token's range bands.
///
/// Built fresh by each planning pass and handed to the renderer whole;
/// the previous set for the token is discarded, never patched.
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightSet {
    /// Token the bands surround.
    pub token: TokenId,
    /// Topology the cells belong to; `None` when no scene is active.
    pub grid: Option<GridInstanceId>,
    /// Bands in paint order: ascending on grids, farthest first gridless.
    pub bands: Vec<BandHighlight>,
}

impl HighlightSet {
    /// A set with no bands.
    pub fn empty(token: TokenId, grid: Option<GridInstanceId>) -> Self {
        Self {
            token,
            grid,
            bands: Vec::new(),
        }
    }

    /// Whether nothing would be painted.
    pub fn is_empty(&self) -> bool {
        self.bands.iter().all(|b| b.geometry.is_empty())
    }

    /// Band index a cell was assigned to, if any.
    pub fn band_of(&self, offset: GridOffset) -> Option<usize> {
        self.bands.iter().find_map(|b| match &b.geometry {
            BandGeometry::Cells(cells) if cells.contains(&offset) => Some(b.index),
            _ => None,
        })
    }

    /// Total number of highlighted cells across bands.
    pub fn cell_count(&self) -> usize {
        self.bands
            .iter()
            .map(|b| match &b.geometry {
                BandGeometry::Cells(cells) => cells.len(),
                _ => 0,
            })
            .sum()
    }

    /// Band with the given normalized index.
    pub fn band(&self, index: usize) -> Option<&BandHighlight> {
        self.bands.iter().find(|b| b.index == index)
    }
}
