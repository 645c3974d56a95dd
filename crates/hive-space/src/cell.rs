//! Grid cells and their occupancy state.

use hive_core::{BlockId, CacheId, CellCoord};

/// Occupancy state of a single cell.
///
/// The occupying entity's id travels with the state, so a cell can never
/// claim to hold a block without saying which one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Nothing here.
    #[default]
    Empty,
    /// A free block sits on this cell.
    HasBlock(BlockId),
    /// This cell hosts a cache.
    HasCache(CacheId),
    /// This cell is covered by a cache hosted elsewhere.
    CacheExtent(CacheId),
}

impl CellState {
    /// `true` for [`CellState::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The block on this cell, if any.
    pub fn block(&self) -> Option<BlockId> {
        match self {
            Self::HasBlock(id) => Some(*id),
            _ => None,
        }
    }

    /// The cache hosting or covering this cell, if any.
    pub fn cache(&self) -> Option<CacheId> {
        match self {
            Self::HasCache(id) | Self::CacheExtent(id) => Some(*id),
            _ => None,
        }
    }
}

/// A single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    loc: CellCoord,
    state: CellState,
}

impl Cell {
    pub(crate) fn new(loc: CellCoord) -> Self {
        Self {
            loc,
            state: CellState::Empty,
        }
    }

    /// Absolute coordinate of this cell.
    pub fn loc(&self) -> CellCoord {
        self.loc
    }

    /// Current occupancy state.
    pub fn state(&self) -> CellState {
        self.state
    }

    /// Overwrite the occupancy state.
    pub fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    /// Reset to [`CellState::Empty`].
    pub fn clear(&mut self) {
        self.state = CellState::Empty;
    }
}
