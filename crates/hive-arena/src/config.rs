//! Arena configuration and validation.
//!
//! [`ArenaMapConfig`] is the builder input for
//! [`ArenaMap::new`](crate::ArenaMap::new).
//! [`validate()`](ArenaMapConfig::validate) checks structural invariants
//! before anything is allocated.

use hive_core::Vec2;
use hive_dist::BlockDistConfig;

use crate::error::ConfigError;
use crate::governor::RedistTrigger;
use crate::manifest::BlockManifest;

/// Real margin added beyond the configured arena extent on each axis.
pub const ARENA_PADDING: f64 = 1.0;

// ── GridConfig ─────────────────────────────────────────────────────

/// Arena extent and discretization.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Arena units per cell. Default: 0.2.
    pub resolution: f64,
    /// Upper corner of the arena; the lower corner is the origin.
    /// Default: 10 x 10.
    pub upper: Vec2,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution: 0.2,
            upper: Vec2::new(10.0, 10.0),
        }
    }
}

// ── NestConfig ─────────────────────────────────────────────────────

/// Nest placement.
#[derive(Clone, Debug, PartialEq)]
pub struct NestConfig {
    /// Centre of the nest. Default: (2, 5).
    pub center: Vec2,
    /// Size of the nest. Default: 1 x 2.
    pub dims: Vec2,
}

impl Default for NestConfig {
    fn default() -> Self {
        Self {
            center: Vec2::new(2.0, 5.0),
            dims: Vec2::new(1.0, 2.0),
        }
    }
}

// ── ArenaMapConfig ─────────────────────────────────────────────────

/// Complete configuration of an [`ArenaMap`](crate::ArenaMap).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArenaMapConfig {
    /// Grid extent and resolution.
    pub grid: GridConfig,
    /// Nest placement.
    pub nest: NestConfig,
    /// Blocks to create.
    pub manifest: BlockManifest,
    /// Block distribution strategy.
    pub dist: BlockDistConfig,
    /// When to stop redistributing collected blocks.
    pub redist: RedistTrigger,
}

impl ArenaMapConfig {
    /// Validate structural invariants.
    ///
    /// Checks:
    /// 1. Resolution is finite and positive.
    /// 2. Arena extent is finite and spans at least one cell.
    /// 3. Nest dims are positive and the nest lies inside the arena.
    /// 4. Block size is finite and positive.
    /// 5. Block distribution parameters are valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Resolution.
        let res = self.grid.resolution;
        if !res.is_finite() || res <= 0.0 {
            return Err(ConfigError::InvalidGrid {
                reason: format!("resolution must be finite and positive, got {res}"),
            });
        }

        // 2. Extent.
        let upper = self.grid.upper;
        if !upper.is_finite() || upper.x < res || upper.y < res {
            return Err(ConfigError::InvalidGrid {
                reason: format!("arena extent {upper} is smaller than one cell of {res}"),
            });
        }

        // 3. Nest.
        let nest = &self.nest;
        if !nest.dims.is_finite() || nest.dims.x <= 0.0 || nest.dims.y <= 0.0 {
            return Err(ConfigError::InvalidNest {
                reason: format!("dims must be positive, got {}", nest.dims),
            });
        }
        let lo = nest.center - Vec2::new(nest.dims.x / 2.0, nest.dims.y / 2.0);
        let hi = nest.center + Vec2::new(nest.dims.x / 2.0, nest.dims.y / 2.0);
        let inside = lo.x >= 0.0 && lo.y >= 0.0 && hi.x <= upper.x && hi.y <= upper.y;
        if !nest.center.is_finite() || !inside {
            return Err(ConfigError::InvalidNest {
                reason: format!(
                    "nest at {} with dims {} leaves the arena {upper}",
                    nest.center, nest.dims
                ),
            });
        }

        // 4. Block size.
        let dim = self.manifest.unit_dim;
        if !dim.is_finite() || dim <= 0.0 {
            return Err(ConfigError::InvalidManifest {
                reason: format!("unit_dim must be finite and positive, got {dim}"),
            });
        }

        // 5. Distribution.
        self.dist.validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_dist::{DistributionKind, PowerLawConfig};

    #[test]
    fn default_config_is_valid() {
        assert!(ArenaMapConfig::default().validate().is_ok());
    }

    #[test]
    fn bad_resolution() {
        let mut cfg = ArenaMapConfig::default();
        cfg.grid.resolution = 0.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidGrid { .. })));
        cfg.grid.resolution = f64::NAN;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidGrid { .. })));
    }

    #[test]
    fn nest_outside_arena() {
        let mut cfg = ArenaMapConfig::default();
        cfg.nest.center = Vec2::new(9.8, 5.0);
        match cfg.validate() {
            Err(ConfigError::InvalidNest { reason }) => assert!(reason.contains("leaves")),
            other => panic!("expected InvalidNest, got {other:?}"),
        }
    }

    #[test]
    fn zero_block_size() {
        let mut cfg = ArenaMapConfig::default();
        cfg.manifest.unit_dim = 0.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidManifest { .. })));
    }

    #[test]
    fn distribution_errors_propagate() {
        let mut cfg = ArenaMapConfig::default();
        cfg.dist.kind = DistributionKind::PowerLaw;
        cfg.dist.powerlaw = PowerLawConfig {
            n_clusters: 0,
            ..PowerLawConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidDistribution(_))));
    }
}
