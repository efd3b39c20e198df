//! Traits the host implements for the engine.

use vantage_bands::HighlightSet;
use vantage_core::{TokenId, TokenSnapshot};
use vantage_measure::DistanceLabel;

/// Read access to the host's placeables.
///
/// The engine takes a [`TokenSnapshot`] at the start of every pass and
/// never holds on to host objects.
pub trait PlaceableRegistry {
    /// Current spatial state of `id`, or `None` if it no longer exists.
    fn token(&self, id: TokenId) -> Option<TokenSnapshot>;

    /// Tokens the local user currently controls.
    fn controlled(&self) -> Vec<TokenId>;
}

/// Paints what the engine computes.
pub trait SceneRenderer {
    /// Replace everything drawn for `set.token` with `set`.
    fn draw_highlight(&mut self, set: &HighlightSet);

    /// Remove the highlight of `token`.
    fn clear_highlight(&mut self, token: TokenId);

    /// Replace the labels shown for a hovered token.
    fn draw_labels(&mut self, hovered: TokenId, labels: &[DistanceLabel]);

    /// Remove the labels shown for a hovered token.
    fn clear_labels(&mut self, hovered: TokenId);
}
