//! Benchmark profiles for the Hive arena subsystem.
//!
//! Provides pre-built [`ArenaMapConfig`] profiles:
//!
//! - [`reference_profile`]: 20 x 20 unit arena (~11K cells) with 100 blocks
//! - [`stress_profile`]: 60 x 60 unit arena (~90K cells) with 1000 blocks
//! - [`powerlaw_profile`]: the reference arena with power-law clusters

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use hive_arena::{ArenaMapConfig, BlockManifest, GridConfig, NestConfig};
use hive_core::Vec2;
use hive_dist::{BlockDistConfig, DistributionKind, PowerLawConfig};

fn profile(extent: f64, n_cube: u32, dist: BlockDistConfig) -> ArenaMapConfig {
    ArenaMapConfig {
        grid: GridConfig {
            resolution: 0.2,
            upper: Vec2::new(extent, extent),
        },
        nest: NestConfig {
            center: Vec2::new(extent / 2.0, extent / 2.0),
            dims: Vec2::new(2.0, 2.0),
        },
        manifest: BlockManifest {
            n_cube,
            ..BlockManifest::default()
        },
        dist,
        ..ArenaMapConfig::default()
    }
}

/// 20 x 20 unit arena at 0.2 resolution with 100 randomly placed cubes.
pub fn reference_profile(seed: u64) -> ArenaMapConfig {
    profile(
        20.0,
        100,
        BlockDistConfig {
            seed,
            ..BlockDistConfig::default()
        },
    )
}

/// 60 x 60 unit arena at 0.2 resolution with 1000 randomly placed cubes.
pub fn stress_profile(seed: u64) -> ArenaMapConfig {
    profile(
        60.0,
        1000,
        BlockDistConfig {
            seed,
            ..BlockDistConfig::default()
        },
    )
}

/// Reference arena with 16 power-law clusters of 16 to 64 cells.
///
/// Total capacity is at least 256, so all 100 blocks always fit.
pub fn powerlaw_profile(seed: u64) -> ArenaMapConfig {
    profile(
        20.0,
        100,
        BlockDistConfig {
            kind: DistributionKind::PowerLaw,
            seed,
            powerlaw: PowerLawConfig {
                pwr_min: 4,
                pwr_max: 6,
                n_clusters: 16,
            },
            source_capacity: None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_profile_validates() {
        reference_profile(42).validate().unwrap();
    }

    #[test]
    fn stress_profile_validates() {
        stress_profile(42).validate().unwrap();
    }

    #[test]
    fn powerlaw_profile_validates() {
        powerlaw_profile(42).validate().unwrap();
    }
}
