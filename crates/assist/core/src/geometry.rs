//! Pixel-space geometry and the grid abstraction.
//!
//! Canvas coordinates are continuous pixels. A [`GridGeometry`] maps pixels
//! to discrete [`GridCell`]s; the selector only ever asks it for the cell
//! size and for the cell containing a point.

/// Point on the canvas, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Square of the given side length.
    pub const fn square(side: f64) -> Self {
        Self::new(side, side)
    }
}

/// Axis-aligned rectangle given by its corners, `x1 <= x2` and `y1 <= y2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rect {
    /// Rectangle spanning `origin` to `origin + size`.
    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self {
            x1: origin.x,
            y1: origin.y,
            x2: origin.x + size.width,
            y2: origin.y + size.height,
        }
    }

    /// Square of side `side` centered on `center`.
    pub fn centered(center: Point, side: f64) -> Self {
        let half = side / 2.0;
        Self {
            x1: center.x - half,
            y1: center.y - half,
            x2: center.x + half,
            y2: center.y + half,
        }
    }

    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Open-interval overlap test: rectangles that only share an edge or a
    /// corner do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.x2 <= other.x1 || self.x1 >= other.x2 || self.y2 <= other.y1 || self.y1 >= other.y2)
    }
}

/// Discrete grid cell. `i` is the row, `j` the column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell {
    pub i: i64,
    pub j: i64,
}

impl GridCell {
    pub const fn new(i: i64, j: i64) -> Self {
        Self { i, j }
    }
}

/// Maps pixel points to grid cells.
///
/// Hosts with hex or gridless layouts implement this themselves; the
/// selector never assumes square cells beyond `cell_size` for footprints.
pub trait GridGeometry {
    /// Side length of one grid unit in pixels.
    fn cell_size(&self) -> f64;

    /// Cell containing `point`.
    fn cell_at(&self, point: Point) -> GridCell;

    /// Pixel center of `cell`.
    fn cell_center(&self, cell: GridCell) -> Point;
}

/// Square grid anchored at the canvas origin.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquareGrid {
    pub size: f64,
}

impl SquareGrid {
    pub const fn new(size: f64) -> Self {
        Self { size }
    }
}

impl Default for SquareGrid {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl GridGeometry for SquareGrid {
    fn cell_size(&self) -> f64 {
        self.size
    }

    fn cell_at(&self, point: Point) -> GridCell {
        GridCell::new(
            (point.y / self.size).floor() as i64,
            (point.x / self.size).floor() as i64,
        )
    }

    fn cell_center(&self, cell: GridCell) -> Point {
        Point::new(
            (cell.j as f64 + 0.5) * self.size,
            (cell.i as f64 + 0.5) * self.size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_square_spans_half_side_each_way() {
        let rect = Rect::centered(Point::new(100.0, 100.0), 100.0);
        assert_eq!(
            rect,
            Rect {
                x1: 50.0,
                y1: 50.0,
                x2: 150.0,
                y2: 150.0
            }
        );
    }

    #[test]
    fn overlapping_rectangles_intersect() {
        let footprint = Rect::centered(Point::new(100.0, 100.0), 100.0);
        let token = Rect::from_origin(Point::new(140.0, 140.0), Size::square(20.0));
        assert!(footprint.intersects(&token));
        assert!(token.intersects(&footprint));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let footprint = Rect::centered(Point::new(100.0, 100.0), 100.0);
        let corner = Rect::from_origin(Point::new(150.0, 150.0), Size::square(10.0));
        let right_edge = Rect::from_origin(Point::new(150.0, 60.0), Size::square(10.0));
        assert!(!footprint.intersects(&corner));
        assert!(!footprint.intersects(&right_edge));
    }

    #[test]
    fn square_grid_maps_points_to_row_and_column() {
        let grid = SquareGrid::new(100.0);
        assert_eq!(grid.cell_at(Point::new(250.0, 120.0)), GridCell::new(1, 2));
        assert_eq!(grid.cell_at(Point::new(-1.0, 0.0)), GridCell::new(0, -1));
        assert_eq!(grid.cell_center(GridCell::new(1, 2)), Point::new(250.0, 150.0));
    }
}
