//! Power-law sized cluster layout and placement.
//!
//! Layout is a guess-and-check search: draw one size per cluster from a
//! [`BinnedPowerLaw`], guess a random rectangle of that size for every
//! cluster, and accept the layout only if no two rectangles overlap on
//! both axes. Any overlap discards the whole guess, sizes included. The
//! search costs `O(tries * n_clusters^2)` in the worst case and gives up
//! after [`MAX_LAYOUT_TRIES`].

use std::collections::BTreeMap;

use hive_core::{Block, CellCoord, EntityExtent};
use hive_space::{ArenaGrid, GridRect};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use tracing::{debug, error, info, trace};

use crate::cluster::{BlockCluster, ClusterDistributor, ClusterId};
use crate::config::PowerLawConfig;
use crate::error::{DistributionError, PlacementError};
use crate::HiveRng;

/// Layout guesses before the configuration is declared infeasible.
pub const MAX_LAYOUT_TRIES: usize = 100;

/// Discrete power-law over sizes `2^k`, `k` in `[pwr_min, pwr_max]`.
///
/// Each bin is weighted by the inverse of its size, so a cluster twice
/// as large is half as likely.
#[derive(Clone, Debug)]
pub struct BinnedPowerLaw {
    sizes: Vec<usize>,
    index: WeightedIndex<f64>,
}

impl BinnedPowerLaw {
    /// Build the distribution.
    ///
    /// # Errors
    ///
    /// Returns `Err(DistributionError::InvalidConfig)` if the exponent
    /// range is empty or yields sizes that do not fit in a `usize`.
    pub fn new(pwr_min: u32, pwr_max: u32) -> Result<Self, DistributionError> {
        if pwr_min > pwr_max {
            return Err(DistributionError::InvalidConfig {
                reason: format!("empty power-law range [{pwr_min}, {pwr_max}]"),
            });
        }
        let sizes = (pwr_min..=pwr_max)
            .map(|k| 1usize.checked_shl(k))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| DistributionError::InvalidConfig {
                reason: format!("power-law exponent {pwr_max} overflows"),
            })?;
        let weights = sizes.iter().map(|&s| 1.0 / s as f64);
        let index = WeightedIndex::new(weights).map_err(|e| DistributionError::InvalidConfig {
            reason: format!("power-law weights: {e}"),
        })?;
        Ok(Self { sizes, index })
    }

    /// Possible sizes, ascending.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Draw one size (at least 1).
    pub fn sample(&self, rng: &mut HiveRng) -> usize {
        self.sizes[self.index.sample(rng)].max(1)
    }
}

/// Rectangle dimensions used for a cluster of `size` cells: as square as
/// possible, never smaller than `size`.
pub fn cluster_dims(size: usize) -> (usize, usize) {
    let width = size.isqrt().max(1);
    (width, size.div_ceil(width).max(1))
}

/// Guess one rectangle per size, uniformly inside `area`.
///
/// Returns `None` if some cluster does not fit in `area` at all.
pub fn guess_layout(area: GridRect, sizes: &[usize], rng: &mut HiveRng) -> Option<Vec<GridRect>> {
    sizes
        .iter()
        .map(|&size| {
            let (w, h) = cluster_dims(size);
            let xhi = area.xmax().checked_sub(w)?;
            let yhi = area.ymax().checked_sub(h)?;
            if xhi < area.xmin() || yhi < area.ymin() {
                return None;
            }
            let x = rng.random_range(area.xmin()..=xhi);
            let y = rng.random_range(area.ymin()..=yhi);
            Some(GridRect::from_origin(CellCoord::new(x, y), w, h))
        })
        .collect()
}

/// `true` if no two rectangles overlap on both axes.
pub fn layout_is_valid(rects: &[GridRect]) -> bool {
    rects
        .iter()
        .enumerate()
        .all(|(i, a)| rects[i + 1..].iter().all(|b| !a.overlaps(b)))
}

/// Places blocks into power-law sized clusters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PowerLawDistributor {
    groups: BTreeMap<usize, Vec<ClusterDistributor>>,
}

impl PowerLawDistributor {
    /// Search for a cluster layout inside `area` and build the clusters.
    ///
    /// # Errors
    ///
    /// Returns `Err(DistributionError::ClusterLayoutInfeasible)` if no
    /// valid layout was found within [`MAX_LAYOUT_TRIES`], or
    /// `Err(DistributionError::InvalidConfig)` for a bad exponent range.
    pub fn map_clusters(
        area: GridRect,
        config: &PowerLawConfig,
        rng: &mut HiveRng,
    ) -> Result<Self, DistributionError> {
        let pwrdist = BinnedPowerLaw::new(config.pwr_min, config.pwr_max)?;
        info!(
            n_clusters = config.n_clusters,
            area = %area,
            "computing power-law cluster placements"
        );

        let mut sizes = Vec::with_capacity(config.n_clusters);
        for attempt in 0..MAX_LAYOUT_TRIES {
            sizes.clear();
            sizes.extend((0..config.n_clusters).map(|_| pwrdist.sample(rng)));
            let Some(rects) = guess_layout(area, &sizes, rng) else {
                trace!(attempt, ?sizes, "cluster does not fit in arena");
                continue;
            };
            if !layout_is_valid(&rects) {
                trace!(attempt, ?sizes, "cluster layout overlaps");
                continue;
            }

            let mut groups: BTreeMap<usize, Vec<ClusterDistributor>> = BTreeMap::new();
            for (i, (&size, rect)) in sizes.iter().zip(rects).enumerate() {
                debug!(cluster = i, size, rect = %rect, "mapped cluster");
                groups
                    .entry(size)
                    .or_default()
                    .push(ClusterDistributor::new(BlockCluster::new(ClusterId(i), rect, size)));
            }
            info!(attempts = attempt + 1, groups = groups.len(), "mapped power-law clusters");
            return Ok(Self { groups });
        }

        error!(
            n_clusters = config.n_clusters,
            tries = MAX_LAYOUT_TRIES,
            "unable to place clusters in arena"
        );
        Err(DistributionError::ClusterLayoutInfeasible {
            n_clusters: config.n_clusters,
            tries: MAX_LAYOUT_TRIES,
        })
    }

    /// Clusters in ascending capacity order.
    pub fn clusters(&self) -> impl Iterator<Item = &BlockCluster> + '_ {
        self.groups
            .values()
            .flat_map(|g| g.iter().map(ClusterDistributor::cluster))
    }

    /// Total capacity of all clusters.
    pub fn capacity(&self) -> usize {
        self.clusters().map(BlockCluster::capacity).sum()
    }

    /// Total number of blocks resident in all clusters.
    pub fn block_count(&self, grid: &ArenaGrid) -> usize {
        self.clusters().map(|c| c.block_count(grid)).sum()
    }

    /// Place `block` in the first cluster, by ascending capacity, that
    /// accepts it.
    ///
    /// # Errors
    ///
    /// Returns `Err(PlacementError::AllClustersFull)` if every cluster
    /// rejected the block. Total capacity is then under-provisioned for
    /// the block count.
    pub fn place(
        &self,
        grid: &mut ArenaGrid,
        block: &mut Block,
        exclusions: &mut Vec<EntityExtent>,
        rng: &mut HiveRng,
    ) -> Result<CellCoord, PlacementError> {
        for (capacity, dists) in &self.groups {
            for dist in dists {
                match dist.place(grid, block, exclusions, rng) {
                    Ok(coord) => return Ok(coord),
                    Err(err) => trace!(
                        block = %block.id(),
                        cluster = %dist.cluster().id(),
                        capacity,
                        %err,
                        "cluster rejected block"
                    ),
                }
            }
        }
        error!(block = %block.id(), "unable to distribute block to any cluster");
        Err(PlacementError::AllClustersFull)
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
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn binned_sizes_are_powers_of_two() {
        let d = BinnedPowerLaw::new(2, 5).unwrap();
        assert_eq!(d.sizes(), &[4, 8, 16, 32]);
        let mut rng = HiveRng::seed_from_u64(3);
        for _ in 0..200 {
            assert!(d.sizes().contains(&d.sample(&mut rng)));
        }
    }

    #[test]
    fn smaller_sizes_are_more_likely() {
        let d = BinnedPowerLaw::new(0, 3).unwrap();
        let mut rng = HiveRng::seed_from_u64(5);
        let mut hist = [0usize; 4];
        for _ in 0..8000 {
            let s = d.sample(&mut rng);
            hist[s.trailing_zeros() as usize] += 1;
        }
        assert!(hist[0] > hist[1] && hist[1] > hist[2] && hist[2] > hist[3]);
    }

    #[test]
    fn empty_exponent_range_is_rejected() {
        assert!(matches!(
            BinnedPowerLaw::new(4, 3),
            Err(DistributionError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn cluster_dims_cover_size() {
        assert_eq!(cluster_dims(1), (1, 1));
        assert_eq!(cluster_dims(8), (2, 4));
        assert_eq!(cluster_dims(16), (4, 4));
        assert_eq!(cluster_dims(32), (5, 7));
    }

    #[test]
    fn overlapping_layout_is_invalid() {
        let a = GridRect::new(0, 0, 4, 4);
        let b = GridRect::new(3, 3, 6, 6);
        let c = GridRect::new(4, 0, 8, 4);
        assert!(!layout_is_valid(&[a, b]));
        assert!(layout_is_valid(&[a, c]));
        assert!(layout_is_valid(&[a]));
    }

    #[test]
    fn infeasible_layout_fails_cleanly() {
        let cfg = PowerLawConfig {
            pwr_min: 4,
            pwr_max: 4,
            n_clusters: 5,
        };
        let mut rng = HiveRng::seed_from_u64(0);
        match PowerLawDistributor::map_clusters(GridRect::new(0, 0, 6, 6), &cfg, &mut rng) {
            Err(DistributionError::ClusterLayoutInfeasible { n_clusters, tries }) => {
                assert_eq!(n_clusters, 5);
                assert_eq!(tries, MAX_LAYOUT_TRIES);
            }
            other => panic!("expected ClusterLayoutInfeasible, got {other:?}"),
        }
    }

    #[test]
    fn blocks_fill_smallest_clusters_first() {
        let cfg = PowerLawConfig {
            pwr_min: 1,
            pwr_max: 2,
            n_clusters: 2,
        };
        let mut rng = HiveRng::seed_from_u64(9);
        let area = GridRect::new(1, 1, 39, 39);
        let dist = PowerLawDistributor::map_clusters(area, &cfg, &mut rng).unwrap();
        let smallest = dist.clusters().next().unwrap().clone();

        let mut grid = ArenaGrid::new(40, 40, 1.0).unwrap();
        let mut ex = Vec::new();
        for id in 0..smallest.capacity() as u32 {
            let mut b = Block::new(BlockId(id), BlockKind::Cube, Vec2::new(0.5, 0.5));
            let coord = dist.place(&mut grid, &mut b, &mut ex, &mut rng).unwrap();
            assert!(smallest.rect().contains(coord));
        }
        assert_eq!(smallest.block_count(&grid), smallest.capacity());
    }

    #[test]
    fn all_clusters_full_is_reported() {
        let cfg = PowerLawConfig {
            pwr_min: 0,
            pwr_max: 0,
            n_clusters: 1,
        };
        let mut rng = HiveRng::seed_from_u64(1);
        let dist =
            PowerLawDistributor::map_clusters(GridRect::new(1, 1, 9, 9), &cfg, &mut rng).unwrap();
        assert_eq!(dist.capacity(), 1);
        let mut grid = ArenaGrid::new(10, 10, 1.0).unwrap();
        let mut ex = Vec::new();
        let mut a = Block::new(BlockId(0), BlockKind::Cube, Vec2::new(0.5, 0.5));
        let mut b = Block::new(BlockId(1), BlockKind::Cube, Vec2::new(0.5, 0.5));
        dist.place(&mut grid, &mut a, &mut ex, &mut rng).unwrap();
        assert_eq!(
            dist.place(&mut grid, &mut b, &mut ex, &mut rng),
            Err(PlacementError::AllClustersFull)
        );
    }

    proptest! {
        #[test]
        fn accepted_layouts_never_overlap(
            seed in any::<u64>(),
            n_clusters in 1usize..6,
            pwr_max in 0u32..5,
        ) {
            let cfg = PowerLawConfig { pwr_min: 0, pwr_max, n_clusters };
            let mut rng = HiveRng::seed_from_u64(seed);
            let area = GridRect::new(1, 1, 30, 30);
            if let Ok(dist) = PowerLawDistributor::map_clusters(area, &cfg, &mut rng) {
                let rects: Vec<GridRect> = dist.clusters().map(BlockCluster::rect).collect();
                prop_assert_eq!(rects.len(), n_clusters);
                prop_assert!(layout_is_valid(&rects));
                for r in &rects {
                    prop_assert_eq!(r.intersect(&area), *r);
                }
            }
        }

        #[test]
        fn cluster_capacity_is_never_exceeded(seed in any::<u64>(), n_blocks in 1usize..40) {
            let cfg = PowerLawConfig { pwr_min: 1, pwr_max: 3, n_clusters: 3 };
            let mut rng = HiveRng::seed_from_u64(seed);
            let area = GridRect::new(1, 1, 24, 24);
            let Ok(dist) = PowerLawDistributor::map_clusters(area, &cfg, &mut rng) else {
                return Ok(());
            };
            let mut grid = ArenaGrid::new(25, 25, 1.0).unwrap();
            let mut ex = Vec::new();
            for id in 0..n_blocks as u32 {
                let mut b = Block::new(BlockId(id), BlockKind::Cube, Vec2::new(0.5, 0.5));
                if dist.place(&mut grid, &mut b, &mut ex, &mut rng).is_err() {
                    break;
                }
            }
            for c in dist.clusters() {
                prop_assert!(c.block_count(&grid) <= c.capacity());
            }
        }
    }
}
