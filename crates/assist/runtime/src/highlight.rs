//! Range highlights queued by the host for the acting token.
use serde::{Deserialize, Serialize};

use assist_core::{ActorId, Candidate, GridCell, GridGeometry, Point, TokenId};

use crate::api::RangeHighlights;

/// Longest reach a highlight expands to, in grid units.
pub const MAX_HIGHLIGHT_RANGE: u32 = 100;

/// A queued highlight: who it belongs to and how far it reaches.
///
/// Either id may be missing; a lookup matches on whichever is present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightEntry {
    #[serde(default)]
    pub actor_id: Option<ActorId>,
    #[serde(default)]
    pub token_id: Option<TokenId>,
    /// Reach in grid units; zero is treated as one and anything past
    /// [`MAX_HIGHLIGHT_RANGE`] is capped.
    #[serde(default)]
    pub range: u32,
}

impl HighlightEntry {
    pub fn for_actor(actor: impl Into<String>, range: u32) -> Self {
        Self {
            actor_id: Some(ActorId::new(actor)),
            token_id: None,
            range,
        }
    }

    pub fn for_token(token: impl Into<String>, range: u32) -> Self {
        Self {
            actor_id: None,
            token_id: Some(TokenId::new(token)),
            range,
        }
    }

    pub fn effective_range(&self) -> u32 {
        self.range.clamp(1, MAX_HIGHLIGHT_RANGE)
    }

    fn matches(&self, actor: &ActorId, token: &TokenId) -> bool {
        self.actor_id.as_ref() == Some(actor) || self.token_id.as_ref() == Some(token)
    }
}

/// Fixed list of highlights with square-grid reach.
///
/// Reach is measured in Chebyshev distance from every cell the source
/// occupies, so range 1 is the eight adjacent cells plus the source's own.
#[derive(Clone, Debug, Default)]
pub struct StaticRangeHighlights {
    entries: Vec<HighlightEntry>,
}

impl StaticRangeHighlights {
    pub fn new(entries: Vec<HighlightEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[HighlightEntry] {
        &self.entries
    }
}

impl RangeHighlights for StaticRangeHighlights {
    fn queued(&self, actor: &ActorId, token: &TokenId) -> Option<HighlightEntry> {
        self.entries
            .iter()
            .find(|entry| entry.matches(actor, token))
            .cloned()
    }

    fn reachable(&self, source: &Candidate, range: u32, grid: &dyn GridGeometry) -> Vec<Point> {
        reachable_cells(source, range.clamp(1, MAX_HIGHLIGHT_RANGE), grid)
            .into_iter()
            .map(|cell| grid.cell_center(cell))
            .collect()
    }
}

/// Cells within `range` of any cell covered by `source`, with `range`
/// capped at [`MAX_HIGHLIGHT_RANGE`].
pub fn reachable_cells(source: &Candidate, range: u32, grid: &dyn GridGeometry) -> Vec<GridCell> {
    let bounds = source.bounds();
    let cell = grid.cell_size();
    // Shrink by a hair so a token flush with a cell edge does not spill over.
    let inset = cell * 1e-6;
    let top_left = grid.cell_at(Point::new(bounds.x1 + inset, bounds.y1 + inset));
    let bottom_right = grid.cell_at(Point::new(bounds.x2 - inset, bounds.y2 - inset));

    let reach = i64::from(range.min(MAX_HIGHLIGHT_RANGE));
    let mut cells = Vec::new();
    for i in (top_left.i - reach)..=(bottom_right.i + reach) {
        for j in (top_left.j - reach)..=(bottom_right.j + reach) {
            cells.push(GridCell::new(i, j));
        }
    }
    cells
}
