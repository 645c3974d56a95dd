//! Placement across several bounded clusters.

use hive_core::{Block, CellCoord, EntityExtent};
use hive_space::ArenaGrid;
use rand::Rng;
use tracing::{debug, warn};

use crate::cluster::{BlockCluster, ClusterDistributor};
use crate::error::PlacementError;
use crate::random::MAX_DIST_TRIES;
use crate::HiveRng;

/// Owns N [`ClusterDistributor`]s and spreads blocks among them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiClusterDistributor {
    dists: Vec<ClusterDistributor>,
}

impl MultiClusterDistributor {
    /// Distributor over `clusters`.
    pub fn new(clusters: impl IntoIterator<Item = BlockCluster>) -> Self {
        Self {
            dists: clusters.into_iter().map(ClusterDistributor::new).collect(),
        }
    }

    /// The owned clusters.
    pub fn clusters(&self) -> impl Iterator<Item = &BlockCluster> + '_ {
        self.dists.iter().map(ClusterDistributor::cluster)
    }

    /// Total capacity of all clusters.
    pub fn capacity(&self) -> usize {
        self.clusters()
            .fold(0usize, |acc, c| acc.saturating_add(c.capacity()))
    }

    /// Total number of blocks resident in all clusters.
    pub fn block_count(&self, grid: &ArenaGrid) -> usize {
        self.clusters().map(|c| c.block_count(grid)).sum()
    }

    /// Place `block` in a uniformly chosen cluster with spare capacity.
    ///
    /// After a failed attempt the next pick avoids the cluster that just
    /// failed whenever another candidate exists.
    ///
    /// # Errors
    ///
    /// Returns `Err(PlacementError::AllClustersFull)` as soon as no
    /// cluster has spare capacity, or `Err(PlacementError::Exhausted)`
    /// after [`MAX_DIST_TRIES`] failed attempts.
    pub fn place(
        &self,
        grid: &mut ArenaGrid,
        block: &mut Block,
        exclusions: &mut Vec<EntityExtent>,
        rng: &mut HiveRng,
    ) -> Result<CellCoord, PlacementError> {
        let mut last_failed: Option<usize> = None;
        let mut candidates: Vec<usize> = Vec::with_capacity(self.dists.len());
        for _ in 0..MAX_DIST_TRIES {
            candidates.clear();
            candidates.extend(
                self.dists
                    .iter()
                    .enumerate()
                    .filter(|(_, d)| d.cluster().has_capacity(grid))
                    .map(|(i, _)| i),
            );
            if candidates.is_empty() {
                warn!(block = %block.id(), "no cluster has spare capacity");
                return Err(PlacementError::AllClustersFull);
            }
            if let Some(failed) = last_failed {
                if candidates.len() > 1 {
                    candidates.retain(|&i| i != failed);
                }
            }
            let pick = candidates[rng.random_range(0..candidates.len())];
            let dist = &self.dists[pick];
            match dist.place(grid, block, exclusions, rng) {
                Ok(coord) => return Ok(coord),
                Err(err) => {
                    debug!(
                        block = %block.id(),
                        cluster = %dist.cluster().id(),
                        %err,
                        "cluster rejected block"
                    );
                    last_failed = Some(pick);
                }
            }
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ClusterId;
    use hive_core::{BlockId, BlockKind, Vec2};
    use hive_space::GridRect;
    use rand::SeedableRng;

    fn cube(id: u32) -> Block {
        Block::new(BlockId(id), BlockKind::Cube, Vec2::new(0.5, 0.5))
    }

    fn two_clusters() -> MultiClusterDistributor {
        MultiClusterDistributor::new([
            BlockCluster::new(ClusterId(0), GridRect::new(1, 1, 4, 4), 3),
            BlockCluster::new(ClusterId(1), GridRect::new(6, 6, 9, 9), 2),
        ])
    }

    #[test]
    fn capacity_is_union_of_clusters() {
        let dist = two_clusters();
        assert_eq!(dist.capacity(), 5);
        assert_eq!(dist.clusters().count(), 2);
    }

    #[test]
    fn fills_every_cluster_then_reports_full() {
        let mut grid = ArenaGrid::new(10, 10, 1.0).unwrap();
        let dist = two_clusters();
        let mut rng = HiveRng::seed_from_u64(11);
        let mut ex = Vec::new();
        let mut blocks: Vec<Block> = (0..6).map(cube).collect();
        for b in blocks.iter_mut().take(5) {
            dist.place(&mut grid, b, &mut ex, &mut rng).unwrap();
        }
        assert_eq!(dist.block_count(&grid), 5);
        for c in dist.clusters() {
            assert_eq!(c.block_count(&grid), c.capacity());
        }
        assert_eq!(
            dist.place(&mut grid, &mut blocks[5], &mut ex, &mut rng),
            Err(PlacementError::AllClustersFull)
        );
    }

    #[test]
    fn unbounded_capacity_saturates() {
        let dist = MultiClusterDistributor::new([
            BlockCluster::new(ClusterId(0), GridRect::new(0, 0, 2, 2), usize::MAX),
            BlockCluster::new(ClusterId(1), GridRect::new(3, 3, 5, 5), usize::MAX),
        ]);
        assert_eq!(dist.capacity(), usize::MAX);
    }
}
