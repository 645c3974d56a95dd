//! Block distribution configuration.

use std::fmt;
use std::str::FromStr;

use crate::error::DistributionError;

/// Which placement strategy the [`Dispatcher`](crate::Dispatcher) builds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DistributionKind {
    /// Uniformly random over the inset arena.
    #[default]
    Random,
    /// One unbounded cluster strip near the right wall.
    SingleSource,
    /// Two unbounded cluster strips, near the left and right walls.
    DualSource,
    /// Four unbounded cluster strips, one along each wall.
    QuadSource,
    /// Power-law sized clusters at random non-overlapping locations.
    PowerLaw,
}

impl DistributionKind {
    /// Configuration name of the strategy.
    pub fn name(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::SingleSource => "single-source",
            Self::DualSource => "dual-source",
            Self::QuadSource => "quad-source",
            Self::PowerLaw => "powerlaw",
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistributionKind {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "single-source" => Ok(Self::SingleSource),
            "dual-source" => Ok(Self::DualSource),
            "quad-source" => Ok(Self::QuadSource),
            "powerlaw" => Ok(Self::PowerLaw),
            other => Err(DistributionError::InvalidConfig {
                reason: format!("unknown distribution type '{other}'"),
            }),
        }
    }
}

/// Parameters of the power-law strategy.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerLawConfig {
    /// Smallest cluster size exponent: sizes start at `2^pwr_min`. Default: 2.
    pub pwr_min: u32,
    /// Largest cluster size exponent: sizes end at `2^pwr_max`. Default: 6.
    pub pwr_max: u32,
    /// Number of clusters to lay out. Default: 4.
    pub n_clusters: usize,
}

impl Default for PowerLawConfig {
    fn default() -> Self {
        Self {
            pwr_min: 2,
            pwr_max: 6,
            n_clusters: 4,
        }
    }
}

/// Configuration consumed by the [`Dispatcher`](crate::Dispatcher).
#[derive(Clone, Debug, PartialEq)]
pub struct BlockDistConfig {
    /// Strategy to build.
    pub kind: DistributionKind,
    /// Seed of the single placement RNG. Default: 0.
    pub seed: u64,
    /// Power-law parameters, used only by [`DistributionKind::PowerLaw`].
    pub powerlaw: PowerLawConfig,
    /// Capacity of each single/dual/quad source cluster. `None` leaves
    /// sources unbounded. Default: `None`.
    pub source_capacity: Option<usize>,
}

impl Default for BlockDistConfig {
    fn default() -> Self {
        Self {
            kind: DistributionKind::default(),
            seed: 0,
            powerlaw: PowerLawConfig::default(),
            source_capacity: None,
        }
    }
}

impl BlockDistConfig {
    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `Err(DistributionError::InvalidConfig)` describing the first
    /// violated constraint.
    pub fn validate(&self) -> Result<(), DistributionError> {
        if self.source_capacity == Some(0) {
            return Err(DistributionError::InvalidConfig {
                reason: "source_capacity must be at least 1".into(),
            });
        }
        if self.kind != DistributionKind::PowerLaw {
            return Ok(());
        }
        let p = &self.powerlaw;
        // 1. At least one cluster.
        if p.n_clusters == 0 {
            return Err(DistributionError::InvalidConfig {
                reason: "powerlaw n_clusters must be at least 1".into(),
            });
        }
        // 2. Non-empty exponent range.
        if p.pwr_min > p.pwr_max {
            return Err(DistributionError::InvalidConfig {
                reason: format!(
                    "powerlaw pwr_min ({}) exceeds pwr_max ({})",
                    p.pwr_min, p.pwr_max
                ),
            });
        }
        // 3. Sizes must fit in a usize.
        if p.pwr_max >= usize::BITS - 1 {
            return Err(DistributionError::InvalidConfig {
                reason: format!("powerlaw pwr_max ({}) is too large", p.pwr_max),
            });
        }
        Ok(())
    }
}
