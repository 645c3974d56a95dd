//! The arena occupancy grid.

use crate::cell::{Cell, CellState};
use crate::error::SpaceError;
use crate::rect::GridRect;
use crate::view::GridView;
use hive_core::{CellCoord, Vec2};

/// Extra cells added past `origin + radius` when extracting a sub-view.
///
/// With this padding a radius-`r` window around `origin` spans
/// `[origin - r, origin + r]` inclusive, clamped to the grid, so callers
/// that index `radius` cells away from the origin never step outside the
/// view.
pub const SUBGRID_PADDING: usize = 1;

// Absorbs rounding in `extent / resolution` for extents that are exact
// multiples of the resolution.
const DISCRETIZE_SLACK: f64 = 1e-9;

/// A bounded 2D array of [`Cell`]s.
///
/// Cells are stored X-major: index `x * ydsize + y`.
#[derive(Clone, Debug)]
pub struct ArenaGrid {
    xdsize: usize,
    ydsize: usize,
    resolution: f64,
    cells: Vec<Cell>,
}

impl ArenaGrid {
    /// Create an all-empty grid with `xdsize * ydsize` cells.
    ///
    /// # Errors
    ///
    /// Returns `Err(SpaceError::EmptyGrid)` if either dimension is 0, or
    /// `Err(SpaceError::InvalidResolution)` if `resolution` is not a
    /// finite positive number.
    ///
    /// # Examples
    ///
    /// ```
    /// use hive_space::{ArenaGrid, CellState};
    /// use hive_core::CellCoord;
    ///
    /// let grid = ArenaGrid::new(10, 10, 1.0).unwrap();
    /// assert_eq!(grid.cell_count(), 100);
    /// assert_eq!(grid.state(CellCoord::new(3, 4)), Some(CellState::Empty));
    /// assert_eq!(grid.state(CellCoord::new(10, 0)), None);
    /// ```
    pub fn new(xdsize: usize, ydsize: usize, resolution: f64) -> Result<Self, SpaceError> {
        if xdsize == 0 || ydsize == 0 {
            return Err(SpaceError::EmptyGrid);
        }
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(SpaceError::InvalidResolution { value: resolution });
        }
        let mut cells = Vec::with_capacity(xdsize * ydsize);
        for x in 0..xdsize {
            for y in 0..ydsize {
                cells.push(Cell::new(CellCoord::new(x, y)));
            }
        }
        Ok(Self {
            xdsize,
            ydsize,
            resolution,
            cells,
        })
    }

    /// Create a grid covering a real `xrsize x yrsize` arena.
    ///
    /// Partial cells at the far edges are dropped.
    pub fn from_real(xrsize: f64, yrsize: f64, resolution: f64) -> Result<Self, SpaceError> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(SpaceError::InvalidResolution { value: resolution });
        }
        let xd = (xrsize / resolution + DISCRETIZE_SLACK).floor();
        let yd = (yrsize / resolution + DISCRETIZE_SLACK).floor();
        if !(xd >= 1.0 && yd >= 1.0) {
            return Err(SpaceError::EmptyGrid);
        }
        Self::new(xd as usize, yd as usize, resolution)
    }

    /// Number of columns.
    pub fn xdsize(&self) -> usize {
        self.xdsize
    }

    /// Number of rows.
    pub fn ydsize(&self) -> usize {
        self.ydsize
    }

    /// Real width of the arena.
    pub fn xrsize(&self) -> f64 {
        self.xdsize as f64 * self.resolution
    }

    /// Real height of the arena.
    pub fn yrsize(&self) -> f64 {
        self.ydsize as f64 * self.resolution
    }

    /// Arena units per cell.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Rectangle covering the whole grid.
    pub fn bounds(&self) -> GridRect {
        GridRect::new(0, 0, self.xdsize, self.ydsize)
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if coord.x < self.xdsize && coord.y < self.ydsize {
            Some(coord.x * self.ydsize + coord.y)
        } else {
            None
        }
    }

    /// Cell at `coord`, or `None` if out of bounds.
    pub fn access(&self, coord: CellCoord) -> Option<&Cell> {
        self.index(coord).map(|i| &self.cells[i])
    }

    /// Mutable cell at `coord`, or `None` if out of bounds.
    pub fn access_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.index(coord).map(move |i| &mut self.cells[i])
    }

    /// State of the cell at `coord`, or `None` if out of bounds.
    pub fn state(&self, coord: CellCoord) -> Option<CellState> {
        self.access(coord).map(Cell::state)
    }

    /// Reset every cell to [`CellState::Empty`].
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Real location of the centre of `coord`.
    pub fn cell_center(&self, coord: CellCoord) -> Vec2 {
        Vec2::new(
            (coord.x as f64 + 0.5) * self.resolution,
            (coord.y as f64 + 0.5) * self.resolution,
        )
    }

    /// Cell containing real position `pos`, or `None` if outside the arena.
    pub fn discretize(&self, pos: Vec2) -> Option<CellCoord> {
        if !pos.is_finite() || pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let coord = CellCoord::new(
            (pos.x / self.resolution).floor() as usize,
            (pos.y / self.resolution).floor() as usize,
        );
        self.index(coord).map(|_| coord)
    }

    /// Clamp `rect` to the grid.
    pub fn clip(&self, rect: GridRect) -> GridRect {
        rect.intersect(&self.bounds())
    }

    /// Borrowed view of `rect` (clipped to the grid).
    pub fn view(&self, rect: GridRect) -> GridView<'_> {
        GridView::new(self, self.clip(rect))
    }

    /// Bounds-checked window of radius `radius` around `origin`.
    ///
    /// The window spans `[origin - radius, origin + radius]` on each
    /// axis (see [`SUBGRID_PADDING`]), clamped to the grid.
    ///
    /// # Errors
    ///
    /// Returns `Err(SpaceError::CoordOutOfBounds)` if `origin` is not a
    /// cell of this grid.
    pub fn subgrid(&self, origin: CellCoord, radius: usize) -> Result<GridView<'_>, SpaceError> {
        if self.index(origin).is_none() {
            return Err(SpaceError::CoordOutOfBounds {
                coord: origin,
                bounds: format!("[0, {}) x [0, {})", self.xdsize, self.ydsize),
            });
        }
        let rect = GridRect::new(
            origin.x.saturating_sub(radius),
            origin.y.saturating_sub(radius),
            origin.x.saturating_add(radius).saturating_add(SUBGRID_PADDING),
            origin.y.saturating_add(radius).saturating_add(SUBGRID_PADDING),
        );
        Ok(self.view(rect))
    }

    /// Cells covered (even partially) by the real rectangle
    /// `xspan x yspan`, clipped to the grid.
    pub fn cells_covering(&self, xspan: hive_core::Span, yspan: hive_core::Span) -> GridRect {
        let lo = |v: f64| (v / self.resolution).floor().max(0.0) as usize;
        let hi = |v: f64| (v / self.resolution).ceil().max(0.0) as usize;
        self.clip(GridRect::new(
            lo(xspan.lb()),
            lo(yspan.lb()),
            hi(xspan.ub()),
            hi(yspan.ub()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::{BlockId, Span};
    use proptest::prelude::*;

    #[test]
    fn new_rejects_empty_and_bad_resolution() {
        assert_eq!(ArenaGrid::new(0, 4, 1.0).unwrap_err(), SpaceError::EmptyGrid);
        assert!(matches!(
            ArenaGrid::new(4, 4, 0.0),
            Err(SpaceError::InvalidResolution { .. })
        ));
        assert!(matches!(
            ArenaGrid::new(4, 4, f64::NAN),
            Err(SpaceError::InvalidResolution { .. })
        ));
    }

    #[test]
    fn from_real_discretizes() {
        let g = ArenaGrid::from_real(3.0, 2.0, 0.2).unwrap();
        assert_eq!(g.xdsize(), 15);
        assert_eq!(g.ydsize(), 10);
        let padded = ArenaGrid::from_real(11.0, 11.5, 0.2).unwrap();
        assert_eq!((padded.xdsize(), padded.ydsize()), (55, 57));
        assert!((g.xrsize() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn reset_clears_all_cells() {
        let mut g = ArenaGrid::new(4, 4, 1.0).unwrap();
        g.access_mut(CellCoord::new(1, 2))
            .unwrap()
            .set_state(CellState::HasBlock(BlockId(0)));
        g.reset();
        assert!(g.bounds().iter().all(|c| g.state(c) == Some(CellState::Empty)));
    }

    #[test]
    fn subgrid_interior_has_full_window() {
        let g = ArenaGrid::new(20, 20, 1.0).unwrap();
        let v = g.subgrid(CellCoord::new(10, 10), 3).unwrap();
        assert_eq!(v.rect(), GridRect::new(7, 7, 14, 14));
        assert_eq!(v.rect().area(), 49);
    }

    #[test]
    fn subgrid_is_clamped_at_edges() {
        let g = ArenaGrid::new(10, 10, 1.0).unwrap();
        let corner = g.subgrid(CellCoord::new(0, 0), 3).unwrap();
        assert_eq!(corner.rect(), GridRect::new(0, 0, 4, 4));
        let far = g.subgrid(CellCoord::new(9, 9), 3).unwrap();
        assert_eq!(far.rect(), GridRect::new(6, 6, 10, 10));
        for c in far.rect().iter() {
            assert!(g.access(c).is_some());
        }
    }

    #[test]
    fn subgrid_rejects_outside_origin() {
        let g = ArenaGrid::new(10, 10, 1.0).unwrap();
        assert!(matches!(
            g.subgrid(CellCoord::new(10, 3), 1),
            Err(SpaceError::CoordOutOfBounds { .. })
        ));
    }

    #[test]
    fn discretize_inverts_cell_center() {
        let g = ArenaGrid::new(10, 8, 0.2).unwrap();
        for c in g.bounds().iter() {
            assert_eq!(g.discretize(g.cell_center(c)), Some(c));
        }
        assert_eq!(g.discretize(Vec2::new(-0.1, 0.5)), None);
        assert_eq!(g.discretize(Vec2::new(2.0, 0.5)), None);
    }

    #[test]
    fn cells_covering_three_by_three_cache() {
        let g = ArenaGrid::new(20, 20, 1.0).unwrap();
        let center = g.cell_center(CellCoord::new(5, 5));
        let r = g.cells_covering(
            Span::from_center(center.x, 3.0),
            Span::from_center(center.y, 3.0),
        );
        assert_eq!(r, GridRect::new(4, 4, 7, 7));
    }

    proptest! {
        #[test]
        fn subgrid_never_leaves_grid(
            xd in 1usize..30, yd in 1usize..30,
            ox in 0usize..30, oy in 0usize..30, radius in 0usize..40,
        ) {
            let g = ArenaGrid::new(xd, yd, 1.0).unwrap();
            let origin = CellCoord::new(ox % xd, oy % yd);
            let v = g.subgrid(origin, radius).unwrap();
            prop_assert!(v.rect().contains(origin));
            prop_assert!(v.rect().xmax() <= xd);
            prop_assert!(v.rect().ymax() <= yd);
            prop_assert_eq!(v.iter().count(), v.rect().area());
        }
    }
}
