//! The closed set of placement strategies.

use hive_core::{Block, CellCoord, EntityExtent};
use hive_space::ArenaGrid;
use smallvec::SmallVec;

use crate::cluster::{BlockCluster, ClusterDistributor};
use crate::error::PlacementError;
use crate::multi_cluster::MultiClusterDistributor;
use crate::powerlaw::PowerLawDistributor;
use crate::random::RandomDistributor;
use crate::HiveRng;

/// One concrete placement strategy.
///
/// All strategies share the same contract: a single placement either
/// commits fully (grid cell, block location, exclusion list) or leaves
/// everything untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Uniform-random over an area.
    Random(RandomDistributor),
    /// One bounded cluster.
    Cluster(ClusterDistributor),
    /// Several bounded clusters, chosen at random.
    MultiCluster(MultiClusterDistributor),
    /// Power-law sized clusters, filled smallest first.
    PowerLaw(PowerLawDistributor),
}

impl Strategy {
    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Random(_) => "random",
            Self::Cluster(_) => "cluster",
            Self::MultiCluster(_) => "multi-cluster",
            Self::PowerLaw(_) => "powerlaw",
        }
    }

    /// Place one block.
    pub fn place(
        &self,
        grid: &mut ArenaGrid,
        block: &mut Block,
        exclusions: &mut Vec<EntityExtent>,
        rng: &mut HiveRng,
    ) -> Result<CellCoord, PlacementError> {
        match self {
            Self::Random(d) => d.place(grid, block, exclusions, rng),
            Self::Cluster(d) => d.place(grid, block, exclusions, rng),
            Self::MultiCluster(d) => d.place(grid, block, exclusions, rng),
            Self::PowerLaw(d) => d.place(grid, block, exclusions, rng),
        }
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

    /// Clusters owned by the strategy (none for [`Strategy::Random`]).
    pub fn clusters(&self) -> SmallVec<[&BlockCluster; 4]> {
        match self {
            Self::Random(_) => SmallVec::new(),
            Self::Cluster(d) => SmallVec::from_elem(d.cluster(), 1),
            Self::MultiCluster(d) => d.clusters().collect(),
            Self::PowerLaw(d) => d.clusters().collect(),
        }
    }
}
