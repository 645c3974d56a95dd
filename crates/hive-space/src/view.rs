//! Rectangular windows onto an [`ArenaGrid`].

use crate::cell::{Cell, CellState};
use crate::grid::ArenaGrid;
use crate::rect::GridRect;
use hive_core::CellCoord;

/// Borrowed, read-only window onto a rectangle of an [`ArenaGrid`].
///
/// The rectangle is always clipped to the grid, so every coordinate the
/// view yields is valid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    grid: &'a ArenaGrid,
    rect: GridRect,
}

impl<'a> GridView<'a> {
    pub(crate) fn new(grid: &'a ArenaGrid, rect: GridRect) -> Self {
        Self { grid, rect }
    }

    /// Absolute rectangle this view covers.
    pub fn rect(&self) -> GridRect {
        self.rect
    }

    /// Cell at view-relative offset `rel`, or `None` outside the view.
    pub fn get(&self, rel: CellCoord) -> Option<&'a Cell> {
        if rel.x >= self.rect.width() || rel.y >= self.rect.height() {
            return None;
        }
        self.grid.access(CellCoord::new(
            self.rect.xmin() + rel.x,
            self.rect.ymin() + rel.y,
        ))
    }

    /// Iterate the cells of the view, X-major.
    pub fn iter(&self) -> impl Iterator<Item = &'a Cell> + 'a {
        let grid = self.grid;
        self.rect.iter().filter_map(move |c| grid.access(c))
    }

    /// Number of cells whose state satisfies `pred`.
    pub fn count(&self, mut pred: impl FnMut(CellState) -> bool) -> usize {
        self.iter().filter(|c| pred(c.state())).count()
    }

    /// Copy the window out of the grid.
    pub fn to_owned_view(&self) -> OwnedGridView {
        OwnedGridView {
            rect: self.rect,
            resolution: self.grid.resolution(),
            cells: self.iter().copied().collect(),
        }
    }
}

/// Detached copy of a [`GridView`].
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedGridView {
    rect: GridRect,
    resolution: f64,
    cells: Vec<Cell>,
}

impl OwnedGridView {
    /// Absolute rectangle this view covers.
    pub fn rect(&self) -> GridRect {
        self.rect
    }

    /// Resolution of the source grid.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Cell at view-relative offset `rel`.
    pub fn get(&self, rel: CellCoord) -> Option<&Cell> {
        if rel.x >= self.rect.width() || rel.y >= self.rect.height() {
            return None;
        }
        self.cells.get(rel.x * self.rect.height() + rel.y)
    }

    /// Cell at absolute grid coordinate `abs`.
    pub fn get_abs(&self, abs: CellCoord) -> Option<&Cell> {
        if !self.rect.contains(abs) {
            return None;
        }
        self.get(CellCoord::new(abs.x - self.rect.xmin(), abs.y - self.rect.ymin()))
    }

    /// All cells, X-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::{BlockId, CacheId};

    fn grid_with_block() -> ArenaGrid {
        let mut g = ArenaGrid::new(10, 10, 1.0).unwrap();
        g.access_mut(CellCoord::new(4, 5))
            .unwrap()
            .set_state(CellState::HasBlock(BlockId(7)));
        g.access_mut(CellCoord::new(5, 5))
            .unwrap()
            .set_state(CellState::HasCache(CacheId(1)));
        g
    }

    #[test]
    fn relative_and_absolute_indexing_agree() {
        let g = grid_with_block();
        let v = g.subgrid(CellCoord::new(5, 5), 2).unwrap();
        assert_eq!(v.rect().origin(), CellCoord::new(3, 3));
        let cell = v.get(CellCoord::new(1, 2)).unwrap();
        assert_eq!(cell.loc(), CellCoord::new(4, 5));
        assert_eq!(cell.state(), CellState::HasBlock(BlockId(7)));

        let owned = v.to_owned_view();
        assert_eq!(owned.get(CellCoord::new(1, 2)), Some(cell));
        assert_eq!(owned.get_abs(CellCoord::new(4, 5)), Some(cell));
        assert_eq!(owned.get_abs(CellCoord::new(0, 0)), None);
        assert_eq!(owned.cells().len(), 25);
    }

    #[test]
    fn get_outside_view_is_none() {
        let g = grid_with_block();
        let v = g.view(GridRect::new(2, 2, 4, 4));
        assert!(v.get(CellCoord::new(2, 0)).is_none());
        assert!(v.get(CellCoord::new(1, 1)).is_some());
    }

    #[test]
    fn count_by_state() {
        let g = grid_with_block();
        let v = g.view(g.bounds());
        assert_eq!(v.count(|s| s.block().is_some()), 1);
        assert_eq!(v.count(|s| s.cache().is_some()), 1);
        assert_eq!(v.count(|s| s.is_empty()), 98);
    }

    #[test]
    fn view_is_clipped() {
        let g = grid_with_block();
        let v = g.view(GridRect::new(8, 8, 20, 20));
        assert_eq!(v.rect(), GridRect::new(8, 8, 10, 10));
        assert_eq!(v.iter().count(), 4);
    }
}
