//! Immutable per-pass token snapshot.

use crate::geometry::{Bounds, Footprint, Point};
use crate::id::TokenId;

/// A copy of a placeable's spatial state taken at the start of a pass.
///
/// Planning and measurement read only from snapshots, never from the live
/// registry, so a token that moves mid-pass cannot corrupt the result.
/// At worst the output is one frame stale and the next recompute fixes it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TokenSnapshot {
    /// The placeable this snapshot was taken from.
    pub id: TokenId,
    /// Pixel bounds on the scene.
    pub bounds: Bounds,
    /// Size in grid units.
    pub footprint: Footprint,
    /// Elevation of the token's base, in scene units.
    pub elevation: f64,
    /// Whether the token is drawn round (circle/ellipse) rather than square.
    pub round: bool,
}

impl TokenSnapshot {
    /// A square, ground-level token.
    pub fn new(id: TokenId, bounds: Bounds, footprint: Footprint) -> Self {
        Self {
            id,
            bounds,
            footprint,
            elevation: 0.0,
            round: false,
        }
    }

    /// Builder-style elevation setter.
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }

    /// Builder-style round-shape setter.
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Pixel center tagged with the token's elevation.
    pub fn center(&self) -> Point {
        self.bounds.center().at_elevation(self.elevation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_carries_elevation() {
        let t = TokenSnapshot::new(
            TokenId(1),
            Bounds::new(0.0, 0.0, 100.0, 100.0),
            Footprint::square(1.0),
        )
        .with_elevation(30.0);
        assert_eq!(t.center(), Point::new(50.0, 50.0).at_elevation(30.0));
    }
}
