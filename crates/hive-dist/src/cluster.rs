//! Bounded-cluster placement.

use std::fmt;

use hive_core::{Block, CellCoord, EntityExtent, EntityKind};
use hive_space::{ArenaGrid, CellState, GridRect};
use tracing::trace;

use crate::error::PlacementError;
use crate::random::RandomDistributor;
use crate::HiveRng;

/// Index of a cluster within its owning strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId(pub usize);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cluster{}", self.0)
    }
}

/// A rectangular region of the grid holding at most `capacity` blocks.
///
/// The live block count is read off the grid, so it always agrees with
/// the cells however the blocks left the region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockCluster {
    id: ClusterId,
    rect: GridRect,
    capacity: usize,
}

impl BlockCluster {
    /// Cluster `id` over `rect`.
    pub fn new(id: ClusterId, rect: GridRect, capacity: usize) -> Self {
        Self { id, rect, capacity }
    }

    /// Cluster id.
    pub fn id(&self) -> ClusterId {
        self.id
    }

    /// Backing rectangle.
    pub fn rect(&self) -> GridRect {
        self.rect
    }

    /// Maximum number of resident blocks.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of blocks currently on cells of the cluster.
    pub fn block_count(&self, grid: &ArenaGrid) -> usize {
        grid.view(self.rect)
            .count(|s| matches!(s, CellState::HasBlock(_)))
    }

    /// `true` if another block fits.
    pub fn has_capacity(&self, grid: &ArenaGrid) -> bool {
        self.block_count(grid) < self.capacity
    }

    /// Real-valued extent of the region.
    pub fn extent(&self, resolution: f64) -> EntityExtent {
        EntityExtent {
            kind: EntityKind::Cluster,
            id: u32::try_from(self.id.0).ok(),
            xspan: self.rect.xspan(resolution),
            yspan: self.rect.yspan(resolution),
        }
    }
}

/// Uniform-random placement confined to one [`BlockCluster`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterDistributor {
    cluster: BlockCluster,
    random: RandomDistributor,
}

impl ClusterDistributor {
    /// Distributor for `cluster`.
    pub fn new(cluster: BlockCluster) -> Self {
        let random = RandomDistributor::new(cluster.rect());
        Self { cluster, random }
    }

    /// The owned cluster.
    pub fn cluster(&self) -> &BlockCluster {
        &self.cluster
    }

    /// Place `block` inside the cluster.
    ///
    /// # Errors
    ///
    /// Returns `Err(PlacementError::ClusterFull)` without sampling if the
    /// cluster is at capacity, or `Err(PlacementError::Exhausted)` if no
    /// free cell was found.
    pub fn place(
        &self,
        grid: &mut ArenaGrid,
        block: &mut Block,
        exclusions: &mut Vec<EntityExtent>,
        rng: &mut HiveRng,
    ) -> Result<CellCoord, PlacementError> {
        let count = self.cluster.block_count(grid);
        if count >= self.cluster.capacity() {
            trace!(
                cluster = %self.cluster.id(),
                capacity = self.cluster.capacity(),
                "cluster full"
            );
            return Err(PlacementError::ClusterFull {
                capacity: self.cluster.capacity(),
            });
        }
        self.random.place(grid, block, exclusions, rng)
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

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::{BlockId, BlockKind, Vec2};
    use rand::SeedableRng;

    fn cube(id: u32) -> Block {
        Block::new(BlockId(id), BlockKind::Cube, Vec2::new(0.5, 0.5))
    }

    #[test]
    fn capacity_is_enforced() {
        let mut grid = ArenaGrid::new(10, 10, 1.0).unwrap();
        let dist = ClusterDistributor::new(BlockCluster::new(
            ClusterId(0),
            GridRect::new(2, 2, 6, 6),
            2,
        ));
        let mut rng = HiveRng::seed_from_u64(1);
        let mut ex = Vec::new();
        let mut blocks: Vec<Block> = (0..3).map(cube).collect();
        dist.place(&mut grid, &mut blocks[0], &mut ex, &mut rng).unwrap();
        dist.place(&mut grid, &mut blocks[1], &mut ex, &mut rng).unwrap();
        assert_eq!(dist.cluster().block_count(&grid), 2);
        match dist.place(&mut grid, &mut blocks[2], &mut ex, &mut rng) {
            Err(PlacementError::ClusterFull { capacity }) => assert_eq!(capacity, 2),
            other => panic!("expected ClusterFull, got {other:?}"),
        }
    }

    #[test]
    fn count_tracks_blocks_leaving() {
        let mut grid = ArenaGrid::new(10, 10, 1.0).unwrap();
        let cluster = BlockCluster::new(ClusterId(0), GridRect::new(0, 0, 5, 5), 1);
        let dist = ClusterDistributor::new(cluster);
        let mut rng = HiveRng::seed_from_u64(2);
        let mut ex = Vec::new();
        let mut block = cube(0);
        let coord = dist.place(&mut grid, &mut block, &mut ex, &mut rng).unwrap();
        assert!(!dist.cluster().has_capacity(&grid));
        grid.access_mut(coord).unwrap().clear();
        assert!(dist.cluster().has_capacity(&grid));
    }

    #[test]
    fn extent_covers_rect() {
        let c = BlockCluster::new(ClusterId(4), GridRect::new(2, 3, 6, 5), 8);
        let e = c.extent(0.5);
        assert_eq!(e.kind, EntityKind::Cluster);
        assert_eq!(e.id, Some(4));
        assert!((e.xspan.lb() - 1.0).abs() < 1e-12);
        assert!((e.yspan.ub() - 2.5).abs() < 1e-12);
    }
}
