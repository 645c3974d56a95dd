//! Error types for arena construction.

use std::fmt;

use hive_dist::{DistributionError, PlacementError};
use hive_space::SpaceError;

/// An [`ArenaMapConfig`](crate::ArenaMapConfig) failed validation.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Grid resolution or extent is out of range.
    InvalidGrid {
        /// What went wrong.
        reason: String,
    },
    /// The nest does not fit in the arena.
    InvalidNest {
        /// What went wrong.
        reason: String,
    },
    /// The block manifest is unusable.
    InvalidManifest {
        /// What went wrong.
        reason: String,
    },
    /// Block distribution parameters are out of range.
    InvalidDistribution(DistributionError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGrid { reason } => write!(f, "invalid grid: {reason}"),
            Self::InvalidNest { reason } => write!(f, "invalid nest: {reason}"),
            Self::InvalidManifest { reason } => write!(f, "invalid block manifest: {reason}"),
            Self::InvalidDistribution(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidDistribution(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DistributionError> for ConfigError {
    fn from(e: DistributionError) -> Self {
        Self::InvalidDistribution(e)
    }
}

/// Errors from building or resetting an [`ArenaMap`](crate::ArenaMap).
#[derive(Clone, Debug, PartialEq)]
pub enum ArenaError {
    /// The configuration is invalid.
    Config(ConfigError),
    /// The grid could not be built.
    Space(SpaceError),
    /// The block distribution strategy could not be initialized.
    Distribution(DistributionError),
    /// Initial block distribution failed.
    Placement(PlacementError),
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Space(e) => write!(f, "grid: {e}"),
            Self::Distribution(e) => write!(f, "distribution: {e}"),
            Self::Placement(e) => write!(f, "placement: {e}"),
        }
    }
}

impl std::error::Error for ArenaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Space(e) => Some(e),
            Self::Distribution(e) => Some(e),
            Self::Placement(e) => Some(e),
        }
    }
}

impl From<ConfigError> for ArenaError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SpaceError> for ArenaError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

impl From<DistributionError> for ArenaError {
    fn from(e: DistributionError) -> Self {
        Self::Distribution(e)
    }
}

impl From<PlacementError> for ArenaError {
    fn from(e: PlacementError) -> Self {
        Self::Placement(e)
    }
}
