//! Uniform-random placement over a rectangular area.

use hive_core::{placement_conflict, Block, CellCoord, EntityExtent, EntityKind, Vec2};
use hive_space::{ArenaGrid, CellState, GridRect};
use rand::Rng;
use tracing::{debug, warn};

use crate::error::PlacementError;
use crate::HiveRng;

/// Candidate cells sampled per placement request before giving up.
pub const MAX_DIST_TRIES: usize = 1000;

/// Places blocks on uniformly sampled free cells of one area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomDistributor {
    area: GridRect,
}

impl RandomDistributor {
    /// Distributor over `area`.
    pub fn new(area: GridRect) -> Self {
        Self { area }
    }

    /// The sampled area.
    pub fn area(&self) -> GridRect {
        self.area
    }

    /// Place `block` on a free cell whose footprint conflicts with none of
    /// `exclusions`.
    ///
    /// On success the host cell becomes [`CellState::HasBlock`], the block
    /// is moved to the cell centre, and its new extent is appended to
    /// `exclusions`. On failure nothing is modified.
    ///
    /// # Errors
    ///
    /// Returns `Err(PlacementError::Exhausted)` after [`MAX_DIST_TRIES`]
    /// rejected candidates.
    pub fn place(
        &self,
        grid: &mut ArenaGrid,
        block: &mut Block,
        exclusions: &mut Vec<EntityExtent>,
        rng: &mut HiveRng,
    ) -> Result<CellCoord, PlacementError> {
        let area = grid.clip(self.area);
        if area.is_empty() {
            warn!(block = %block.id(), area = %self.area, "placement area is empty");
            return Err(PlacementError::Exhausted { tries: 0 });
        }
        for _ in 0..MAX_DIST_TRIES {
            let coord = CellCoord::new(
                rng.random_range(area.xmin()..area.xmax()),
                rng.random_range(area.ymin()..area.ymax()),
            );
            if grid.state(coord) != Some(CellState::Empty) {
                continue;
            }
            let center = grid.cell_center(coord);
            if conflicts_with_any(block, center, exclusions) {
                continue;
            }
            commit(grid, block, coord, exclusions);
            return Ok(coord);
        }
        warn!(
            block = %block.id(),
            area = %area,
            tries = MAX_DIST_TRIES,
            "unable to place block"
        );
        Err(PlacementError::Exhausted {
            tries: MAX_DIST_TRIES,
        })
    }

    /// Place every block in turn, stopping at the first failure.
    pub fn place_all<'b>(
        &self,
        grid: &mut ArenaGrid,
        blocks: impl IntoIterator<Item = &'b mut Block>,
        exclusions: &mut Vec<EntityExtent>,
        rng: &mut HiveRng,
    ) -> Result<(), PlacementError> {
        for block in blocks {
            self.place(grid, block, exclusions, rng)?;
        }
        Ok(())
    }
}

/// Would `block` centred on `center` overlap any exclusion other than
/// its own previous extent?
pub(crate) fn conflicts_with_any(block: &Block, center: Vec2, exclusions: &[EntityExtent]) -> bool {
    exclusions
        .iter()
        .filter(|e| !is_self(block, e))
        .any(|e| placement_conflict(center, block.dims(), e).conflicts())
}

fn is_self(block: &Block, extent: &EntityExtent) -> bool {
    extent.kind == EntityKind::Block && extent.id == Some(block.id().0)
}

fn commit(
    grid: &mut ArenaGrid,
    block: &mut Block,
    coord: CellCoord,
    exclusions: &mut Vec<EntityExtent>,
) {
    let center = grid.cell_center(coord);
    if let Some(cell) = grid.access_mut(coord) {
        cell.set_state(CellState::HasBlock(block.id()));
    }
    block.move_to(center, coord);
    debug_assert!(
        !conflicts_with_any(block, center, exclusions),
        "{} placed over an exclusion",
        block.id()
    );
    exclusions.retain(|e| !is_self(block, e));
    exclusions.push(block.extent_at(center));
    debug!(block = %block.id(), cell = %coord, "placed block");
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::{BlockId, BlockKind, Span};
    use rand::SeedableRng;

    fn rng() -> HiveRng {
        HiveRng::seed_from_u64(7)
    }

    fn cube(id: u32) -> Block {
        Block::new(BlockId(id), BlockKind::Cube, Vec2::new(0.5, 0.5))
    }

    #[test]
    fn single_block_lands_in_area() {
        let mut grid = ArenaGrid::new(10, 10, 1.0).unwrap();
        let dist = RandomDistributor::new(GridRect::new(2, 2, 8, 8));
        let mut block = cube(0);
        let mut ex = Vec::new();
        let coord = dist.place(&mut grid, &mut block, &mut ex, &mut rng()).unwrap();
        assert!(dist.area().contains(coord));
        assert_eq!(grid.state(coord), Some(CellState::HasBlock(BlockId(0))));
        assert_eq!(block.dloc(), Some(coord));
        assert_eq!(block.rloc(), Some(grid.cell_center(coord)));
        assert_eq!(ex.len(), 1);
    }

    #[test]
    fn full_area_is_exhausted_and_uncommitted() {
        let mut grid = ArenaGrid::new(4, 4, 1.0).unwrap();
        let area = GridRect::new(1, 1, 2, 2);
        grid.access_mut(CellCoord::new(1, 1))
            .unwrap()
            .set_state(CellState::HasBlock(BlockId(9)));
        let before = grid.clone();
        let dist = RandomDistributor::new(area);
        let mut block = cube(0);
        let mut ex = Vec::new();
        match dist.place(&mut grid, &mut block, &mut ex, &mut rng()) {
            Err(PlacementError::Exhausted { tries }) => assert_eq!(tries, MAX_DIST_TRIES),
            other => panic!("expected Exhausted, got {other:?}"),
        }
        assert!(block.is_out_of_sight());
        assert!(ex.is_empty());
        for c in grid.bounds().iter() {
            assert_eq!(grid.state(c), before.state(c));
        }
    }

    #[test]
    fn exclusions_are_respected() {
        let mut grid = ArenaGrid::new(10, 10, 1.0).unwrap();
        let dist = RandomDistributor::new(grid.bounds());
        let nest = EntityExtent {
            kind: EntityKind::Nest,
            id: None,
            xspan: Span::new(0.0, 10.0),
            yspan: Span::new(0.0, 9.0),
        };
        let mut ex = vec![nest];
        let mut r = rng();
        for id in 0..5 {
            let mut block = cube(id);
            let coord = dist.place(&mut grid, &mut block, &mut ex, &mut r).unwrap();
            assert_eq!(coord.y, 9);
        }
    }

    #[test]
    fn place_all_short_circuits() {
        let mut grid = ArenaGrid::new(3, 3, 1.0).unwrap();
        let dist = RandomDistributor::new(GridRect::new(1, 1, 2, 2));
        let mut blocks: Vec<Block> = (0..3).map(cube).collect();
        let mut ex = Vec::new();
        let res = dist.place_all(&mut grid, blocks.iter_mut(), &mut ex, &mut rng());
        assert!(matches!(res, Err(PlacementError::Exhausted { .. })));
        assert!(!blocks[0].is_out_of_sight());
        assert!(blocks[1].is_out_of_sight());
        assert!(blocks[2].is_out_of_sight());
    }

    #[test]
    fn replacing_a_block_drops_its_old_exclusion() {
        let mut grid = ArenaGrid::new(10, 10, 1.0).unwrap();
        let dist = RandomDistributor::new(grid.bounds());
        let mut block = cube(3);
        let mut ex = Vec::new();
        let mut r = rng();
        let first = dist.place(&mut grid, &mut block, &mut ex, &mut r).unwrap();
        grid.access_mut(first).unwrap().clear();
        dist.place(&mut grid, &mut block, &mut ex, &mut r).unwrap();
        assert_eq!(ex.len(), 1);
        assert_eq!(ex[0].id, Some(3));
    }
}
