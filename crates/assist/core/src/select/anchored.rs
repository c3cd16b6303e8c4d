//! Anchored footprint selection (Single, N, Area*).

use crate::candidate::Candidate;
use crate::geometry::{GridGeometry, Point, Rect};

use super::{Footprint, SelectionRequest, filter::is_eligible};

/// Square covered by a pick at `anchor`.
pub fn footprint_rect(anchor: Point, footprint: Footprint, cell_size: f64) -> Rect {
    Rect::centered(anchor, footprint.side(cell_size))
}

pub(super) fn select_anchored<'a, G>(
    request: &SelectionRequest,
    anchor: Point,
    footprint: Footprint,
    candidates: &'a [Candidate],
    grid: &G,
) -> Vec<&'a Candidate>
where
    G: GridGeometry + ?Sized,
{
    let area = footprint_rect(anchor, footprint, grid.cell_size());
    candidates
        .iter()
        .filter(|candidate| is_eligible(request, candidate))
        .filter(|candidate| area.intersects(&candidate.bounds()))
        .collect()
}
