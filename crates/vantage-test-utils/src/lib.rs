//! Test utilities and mock host types for Vantage development.
//!
//! Provides mock implementations of the host traits
//! ([`PlaceableRegistry`], [`SceneRenderer`]) plus fixture strategies in
//! [`fixtures`] for exercising the engine without a real tabletop.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashMap;

use vantage_bands::HighlightSet;
use vantage_core::{Bounds, Footprint, TokenId, TokenSnapshot};
use vantage_engine::{PlaceableRegistry, SceneRenderer};
use vantage_measure::DistanceLabel;

/// A square token of `size` cells with its top-left at cell `(col, row)`.
pub fn token_at(id: u64, col: f64, row: f64, size: f64, cell_px: f64) -> TokenSnapshot {
    TokenSnapshot::new(
        TokenId(id),
        Bounds::new(col * cell_px, row * cell_px, size * cell_px, size * cell_px),
        Footprint::square(size),
    )
}

/// In-memory [`PlaceableRegistry`].
///
/// Backed by a `HashMap<TokenId, TokenSnapshot>`. Tests mutate it through
/// the engine's `registry_mut()` before sending the matching event.
#[derive(Debug, Default)]
pub struct MockRegistry {
    tokens: HashMap<TokenId, TokenSnapshot>,
    controlled: Vec<TokenId>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a token.
    pub fn insert(&mut self, token: TokenSnapshot) {
        self.tokens.insert(token.id, token);
    }

    /// Remove a token; returns whether it existed.
    pub fn remove(&mut self, id: TokenId) -> bool {
        self.controlled.retain(|c| *c != id);
        self.tokens.remove(&id).is_some()
    }

    /// Move a token, returning its new snapshot.
    pub fn move_to(&mut self, id: TokenId, bounds: Bounds, elevation: f64) -> Option<TokenSnapshot> {
        let token = self.tokens.get_mut(&id)?;
        token.bounds = bounds;
        token.elevation = elevation;
        Some(*token)
    }

    /// Mark a token as controlled or not.
    pub fn set_controlled(&mut self, id: TokenId, controlled: bool) {
        self.controlled.retain(|c| *c != id);
        if controlled {
            self.controlled.push(id);
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl PlaceableRegistry for MockRegistry {
    fn token(&self, id: TokenId) -> Option<TokenSnapshot> {
        self.tokens.get(&id).copied()
    }

    fn controlled(&self) -> Vec<TokenId> {
        self.controlled.clone()
    }
}

/// One call received by [`RecordingRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCall {
    DrawHighlight(TokenId),
    ClearHighlight(TokenId),
    DrawLabels(TokenId, usize),
    ClearLabels(TokenId),
}

/// [`SceneRenderer`] that records every call and keeps what is on screen.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
    highlights: HashMap<TokenId, HighlightSet>,
    labels: HashMap<TokenId, Vec<DistanceLabel>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlight currently on screen for `token`.
    pub fn highlight(&self, token: TokenId) -> Option<&HighlightSet> {
        self.highlights.get(&token)
    }

    /// Labels currently on screen for a hovered token.
    pub fn labels(&self, hovered: TokenId) -> Option<&[DistanceLabel]> {
        self.labels.get(&hovered).map(|v| v.as_slice())
    }

    /// Number of `draw_highlight` calls for `token`.
    pub fn draw_count(&self, token: TokenId) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == RenderCall::DrawHighlight(token))
            .count()
    }

    /// Number of highlights on screen.
    pub fn visible_highlights(&self) -> usize {
        self.highlights.len()
    }

    pub fn reset_calls(&mut self) {
        self.calls.clear();
    }
}

impl SceneRenderer for RecordingRenderer {
    fn draw_highlight(&mut self, set: &HighlightSet) {
        self.calls.push(RenderCall::DrawHighlight(set.token));
        self.highlights.insert(set.token, set.clone());
    }

    fn clear_highlight(&mut self, token: TokenId) {
        self.calls.push(RenderCall::ClearHighlight(token));
        self.highlights.remove(&token);
    }

    fn draw_labels(&mut self, hovered: TokenId, labels: &[DistanceLabel]) {
        self.calls.push(RenderCall::DrawLabels(hovered, labels.len()));
        self.labels.insert(hovered, labels.to_vec());
    }

    fn clear_labels(&mut self, hovered: TokenId) {
        self.calls.push(RenderCall::ClearLabels(hovered));
        self.labels.remove(&hovered);
    }
}
