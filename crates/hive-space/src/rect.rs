//! Axis-aligned rectangles of cells.

use hive_core::{CellCoord, Span};
use std::fmt;

/// A half-open rectangle of cells `[xmin, xmax) x [ymin, ymax)`.
///
/// Used as the backing region of block clusters and as the window of a
/// [`GridView`](crate::GridView). A rectangle may be empty (zero width
/// or height); empty rectangles contain no cells and overlap nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridRect {
    xmin: usize,
    ymin: usize,
    xmax: usize,
    ymax: usize,
}

impl GridRect {
    /// Construct a rectangle. Upper bounds below the lower bounds are
    /// raised to the lower bound, producing an empty rectangle.
    pub fn new(xmin: usize, ymin: usize, xmax: usize, ymax: usize) -> Self {
        Self {
            xmin,
            ymin,
            xmax: xmax.max(xmin),
            ymax: ymax.max(ymin),
        }
    }

    /// Rectangle of `width x height` cells with lower corner `origin`.
    pub fn from_origin(origin: CellCoord, width: usize, height: usize) -> Self {
        Self::new(origin.x, origin.y, origin.x + width, origin.y + height)
    }

    /// Inclusive lower X bound.
    pub fn xmin(&self) -> usize {
        self.xmin
    }

    /// Inclusive lower Y bound.
    pub fn ymin(&self) -> usize {
        self.ymin
    }

    /// Exclusive upper X bound.
    pub fn xmax(&self) -> usize {
        self.xmax
    }

    /// Exclusive upper Y bound.
    pub fn ymax(&self) -> usize {
        self.ymax
    }

    /// Lower corner.
    pub fn origin(&self) -> CellCoord {
        CellCoord::new(self.xmin, self.ymin)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.xmax - self.xmin
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.ymax - self.ymin
    }

    /// Number of cells.
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// `true` if the rectangle contains no cells.
    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    /// `true` if `coord` lies inside the rectangle.
    pub fn contains(&self, coord: CellCoord) -> bool {
        (self.xmin..self.xmax).contains(&coord.x) && (self.ymin..self.ymax).contains(&coord.y)
    }

    /// `true` if the X intervals intersect.
    pub fn x_overlaps(&self, other: &GridRect) -> bool {
        self.xmin < other.xmax && other.xmin < self.xmax
    }

    /// `true` if the Y intervals intersect.
    pub fn y_overlaps(&self, other: &GridRect) -> bool {
        self.ymin < other.ymax && other.ymin < self.ymax
    }

    /// `true` if the rectangles share at least one cell.
    pub fn overlaps(&self, other: &GridRect) -> bool {
        !self.is_empty() && !other.is_empty() && self.x_overlaps(other) && self.y_overlaps(other)
    }

    /// Intersection of two rectangles (possibly empty).
    pub fn intersect(&self, other: &GridRect) -> GridRect {
        GridRect::new(
            self.xmin.max(other.xmin),
            self.ymin.max(other.ymin),
            self.xmax.min(other.xmax),
            self.ymax.min(other.ymax),
        )
    }

    /// Iterate every coordinate, X-major.
    pub fn iter(self) -> impl Iterator<Item = CellCoord> {
        let (ymin, ymax) = (self.ymin, self.ymax);
        (self.xmin..self.xmax).flat_map(move |x| (ymin..ymax).map(move |y| CellCoord::new(x, y)))
    }

    /// Real X span covered at `resolution`.
    pub fn xspan(&self, resolution: f64) -> Span {
        Span::new(self.xmin as f64 * resolution, self.xmax as f64 * resolution)
    }

    /// Real Y span covered at `resolution`.
    pub fn yspan(&self, resolution: f64) -> Span {
        Span::new(self.ymin as f64 * resolution, self.ymax as f64 * resolution)
    }
}

impl fmt::Display for GridRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x=[{}-{}), y=[{}-{})",
            self.xmin, self.xmax, self.ymin, self.ymax
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn backwards_bounds_are_empty() {
        let r = GridRect::new(5, 5, 2, 8);
        assert!(r.is_empty());
        assert_eq!(r.width(), 0);
        assert_eq!(r.iter().count(), 0);
    }

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = GridRect::new(0, 0, 3, 3);
        let b = GridRect::new(3, 0, 6, 3);
        assert!(a.y_overlaps(&b));
        assert!(!a.x_overlaps(&b));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn iter_visits_area_cells() {
        let r = GridRect::new(2, 3, 5, 7);
        let coords: Vec<_> = r.iter().collect();
        assert_eq!(coords.len(), r.area());
        assert_eq!(coords[0], CellCoord::new(2, 3));
        assert!(coords.iter().all(|c| r.contains(*c)));
    }

    proptest! {
        #[test]
        fn overlap_matches_cell_intersection(
            ax in 0usize..10, ay in 0usize..10, aw in 0usize..5, ah in 0usize..5,
            bx in 0usize..10, by in 0usize..10, bw in 0usize..5, bh in 0usize..5,
        ) {
            let a = GridRect::from_origin(CellCoord::new(ax, ay), aw, ah);
            let b = GridRect::from_origin(CellCoord::new(bx, by), bw, bh);
            let shared = a.iter().any(|c| b.contains(c));
            prop_assert_eq!(a.overlaps(&b), shared);
            prop_assert_eq!(a.intersect(&b).is_empty(), !shared);
        }
    }
}
