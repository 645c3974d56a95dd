//! Strategy selection and the single seeded placement RNG.

use hive_core::{Block, CellCoord, EntityExtent};
use hive_space::{ArenaGrid, GridRect};
use rand::SeedableRng;
use smallvec::SmallVec;
use tracing::{error, info};

use crate::cluster::{BlockCluster, ClusterDistributor, ClusterId};
use crate::config::{BlockDistConfig, DistributionKind};
use crate::error::{DistributionError, PlacementError};
use crate::multi_cluster::MultiClusterDistributor;
use crate::powerlaw::PowerLawDistributor;
use crate::random::RandomDistributor;
use crate::strategy::Strategy;
use crate::HiveRng;

/// Cells kept free along every arena wall, on top of the padding.
pub const INDEX_MIN: usize = 1;

/// Owns the configured [`Strategy`] and the RNG lent to it.
///
/// A dispatcher starts uninitialized; [`initialize`](Self::initialize)
/// builds the strategy from the grid dimensions and may be retried
/// after a failure.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    config: BlockDistConfig,
    arena_padding: f64,
    rng: HiveRng,
    strategy: Option<Strategy>,
}

impl Dispatcher {
    /// Dispatcher for `config`. `arena_padding` is in arena units.
    pub fn new(config: BlockDistConfig, arena_padding: f64) -> Self {
        let rng = HiveRng::seed_from_u64(config.seed);
        Self {
            config,
            arena_padding,
            rng,
            strategy: None,
        }
    }

    /// The configuration.
    pub fn config(&self) -> &BlockDistConfig {
        &self.config
    }

    /// The strategy built by the last successful initialization.
    pub fn strategy(&self) -> Option<&Strategy> {
        self.strategy.as_ref()
    }

    /// `true` after a successful initialization.
    pub fn is_initialized(&self) -> bool {
        self.strategy.is_some()
    }

    /// Build the configured strategy, logging any failure.
    pub fn initialize(&mut self, grid: &ArenaGrid) -> bool {
        match self.try_initialize(grid) {
            Ok(()) => true,
            Err(err) => {
                error!(
                    strategy = %self.config.kind,
                    seed = self.config.seed,
                    %err,
                    "block distribution initialization failed"
                );
                false
            }
        }
    }

    /// Build the configured strategy.
    ///
    /// # Errors
    ///
    /// Returns the configuration or layout error. The previous strategy,
    /// if any, is kept.
    pub fn try_initialize(&mut self, grid: &ArenaGrid) -> Result<(), DistributionError> {
        self.config.validate()?;
        let padding = (self.arena_padding / grid.resolution()).floor().max(0.0) as usize;
        let arena = inset_arena(grid, padding)?;

        let strategy = match self.config.kind {
            DistributionKind::Random => Strategy::Random(RandomDistributor::new(arena)),
            DistributionKind::SingleSource => {
                let rect = source_rects(grid, padding, self.config.kind)[0];
                Strategy::Cluster(ClusterDistributor::new(self.source(0, rect)))
            }
            DistributionKind::DualSource | DistributionKind::QuadSource => {
                let rects = source_rects(grid, padding, self.config.kind);
                Strategy::MultiCluster(MultiClusterDistributor::new(
                    rects.into_iter().enumerate().map(|(i, r)| self.source(i, r)),
                ))
            }
            DistributionKind::PowerLaw => Strategy::PowerLaw(PowerLawDistributor::map_clusters(
                arena,
                &self.config.powerlaw,
                &mut self.rng,
            )?),
        };

        for (i, c) in strategy.clusters().iter().enumerate() {
            if c.rect().is_empty() {
                return Err(DistributionError::EmptyArea {
                    name: source_name(i),
                    xdsize: grid.xdsize(),
                    ydsize: grid.ydsize(),
                });
            }
        }
        info!(
            strategy = strategy.name(),
            kind = %self.config.kind,
            arena = %arena,
            clusters = strategy.clusters().len(),
            "initialized block distribution"
        );
        self.strategy = Some(strategy);
        Ok(())
    }

    fn source(&self, i: usize, rect: GridRect) -> BlockCluster {
        let capacity = self.config.source_capacity.unwrap_or(usize::MAX);
        BlockCluster::new(ClusterId(i), rect, capacity)
    }

    /// Place one block with the configured strategy.
    ///
    /// # Errors
    ///
    /// Returns `Err(PlacementError::Uninitialized)` before a successful
    /// initialization, otherwise the strategy's error.
    pub fn distribute_block(
        &mut self,
        grid: &mut ArenaGrid,
        block: &mut Block,
        exclusions: &mut Vec<EntityExtent>,
    ) -> Result<CellCoord, PlacementError> {
        let strategy = self.strategy.as_ref().ok_or(PlacementError::Uninitialized)?;
        strategy.place(grid, block, exclusions, &mut self.rng)
    }

    /// Place every block in turn, stopping at the first failure.
    pub fn distribute_blocks<'b>(
        &mut self,
        grid: &mut ArenaGrid,
        blocks: impl IntoIterator<Item = &'b mut Block>,
        exclusions: &mut Vec<EntityExtent>,
    ) -> Result<(), PlacementError> {
        let strategy = self.strategy.as_ref().ok_or(PlacementError::Uninitialized)?;
        strategy.place_all(grid, blocks, exclusions, &mut self.rng)
    }
}

fn source_name(i: usize) -> &'static str {
    match i {
        0 => "first source",
        1 => "second source",
        2 => "third source",
        _ => "fourth source",
    }
}

/// The arena minus `INDEX_MIN + padding` cells on every side.
fn inset_arena(grid: &ArenaGrid, padding: usize) -> Result<GridRect, DistributionError> {
    let inset = INDEX_MIN + padding;
    let rect = GridRect::new(
        inset,
        inset,
        grid.xdsize().saturating_sub(inset),
        grid.ydsize().saturating_sub(inset),
    );
    if rect.is_empty() {
        return Err(DistributionError::EmptyArea {
            name: "inset arena",
            xdsize: grid.xdsize(),
            ydsize: grid.ydsize(),
        });
    }
    Ok(rect)
}

fn frac(n: usize, f: f64) -> usize {
    (n as f64 * f) as usize
}

/// Source strips for the single/dual/quad layouts.
fn source_rects(
    grid: &ArenaGrid,
    padding: usize,
    kind: DistributionKind,
) -> SmallVec<[GridRect; 4]> {
    let (xd, yd) = (grid.xdsize(), grid.ydsize());
    let xfar = xd.saturating_sub(INDEX_MIN + padding);
    let yfar = yd.saturating_sub(INDEX_MIN + padding);
    let vertical = |lo: f64, hi: f64| GridRect::new(frac(xd, lo), INDEX_MIN, frac(xd, hi), yfar);
    let horizontal = |lo: f64, hi: f64| GridRect::new(INDEX_MIN, frac(yd, lo), xfar, frac(yd, hi));

    let mut rects = SmallVec::new();
    match kind {
        DistributionKind::SingleSource => rects.push(vertical(0.80, 0.90)),
        DistributionKind::DualSource => {
            rects.push(vertical(0.10, 0.20));
            rects.push(vertical(0.80, 0.90));
        }
        DistributionKind::QuadSource => {
            rects.push(vertical(0.05, 0.15));
            rects.push(vertical(0.82, 0.92));
            rects.push(horizontal(0.05, 0.15));
            rects.push(horizontal(0.82, 0.92));
        }
        DistributionKind::Random | DistributionKind::PowerLaw => {}
    }
    rects
}
