//! Highlighted-region selection (Scene*).

use std::collections::HashSet;

use crate::candidate::Candidate;
use crate::geometry::{GridCell, GridGeometry, Point};

use super::{SelectionRequest, filter::is_eligible};

/// Set of grid cells reachable from the source within its range.
///
/// Built by the host from its range highlight; the selector only reads it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightedRegion {
    cells: HashSet<GridCell>,
}

impl HighlightedRegion {
    pub fn from_cells(cells: impl IntoIterator<Item = GridCell>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    /// Region covering the cells that contain each of `points`.
    pub fn from_points<G>(grid: &G, points: impl IntoIterator<Item = Point>) -> Self
    where
        G: GridGeometry + ?Sized,
    {
        Self::from_cells(points.into_iter().map(|point| grid.cell_at(point)))
    }

    pub fn contains_cell(&self, cell: GridCell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn contains_point<G>(&self, grid: &G, point: Point) -> bool
    where
        G: GridGeometry + ?Sized,
    {
        self.contains_cell(grid.cell_at(point))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter()
    }
}

impl FromIterator<GridCell> for HighlightedRegion {
    fn from_iter<I: IntoIterator<Item = GridCell>>(iter: I) -> Self {
        Self::from_cells(iter)
    }
}

pub(super) fn select_in_region<'a, G>(
    request: &SelectionRequest,
    region: &HighlightedRegion,
    candidates: &'a [Candidate],
    grid: &G,
) -> Vec<&'a Candidate>
where
    G: GridGeometry + ?Sized,
{
    candidates
        .iter()
        .filter(|candidate| region.contains_point(grid, candidate.center()))
        .filter(|candidate| is_eligible(request, candidate))
        .collect()
}
