//! Error types for block placement and strategy initialization.

use std::fmt;

/// A single placement request failed. Nothing was committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlacementError {
    /// The retry budget ran out without finding a free, non-conflicting
    /// cell.
    Exhausted {
        /// Number of candidates sampled.
        tries: usize,
    },
    /// The target cluster already holds `capacity` blocks. The caller may
    /// try another region.
    ClusterFull {
        /// Capacity of the full cluster.
        capacity: usize,
    },
    /// Every cluster owned by the strategy is full or exhausted. There is
    /// no room anywhere.
    AllClustersFull,
    /// The dispatcher was used before a successful initialization.
    Uninitialized,
    /// The block to place is not known to the arena.
    UnknownBlock {
        /// Raw id of the missing block.
        id: u32,
    },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { tries } => {
                write!(f, "no free cell found after {tries} tries")
            }
            Self::ClusterFull { capacity } => {
                write!(f, "cluster is at capacity ({capacity} blocks)")
            }
            Self::AllClustersFull => write!(f, "all clusters are full"),
            Self::Uninitialized => write!(f, "block distribution is not initialized"),
            Self::UnknownBlock { id } => write!(f, "block{id} is not part of the arena"),
        }
    }
}

impl std::error::Error for PlacementError {}

/// Strategy initialization failed. Expected to be retried with a
/// different configuration or seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DistributionError {
    /// No non-overlapping power-law cluster layout was found.
    ClusterLayoutInfeasible {
        /// Number of clusters requested.
        n_clusters: usize,
        /// Number of layouts guessed.
        tries: usize,
    },
    /// A placement area computed from the arena dimensions has no cells.
    EmptyArea {
        /// Which area.
        name: &'static str,
        /// Arena dimensions in cells.
        xdsize: usize,
        /// Arena dimensions in cells.
        ydsize: usize,
    },
    /// A configuration value is out of range.
    InvalidConfig {
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for DistributionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClusterLayoutInfeasible { n_clusters, tries } => write!(
                f,
                "no non-overlapping layout for {n_clusters} clusters after {tries} tries"
            ),
            Self::EmptyArea {
                name,
                xdsize,
                ydsize,
            } => write!(f, "{name} area is empty in a {xdsize}x{ydsize} arena"),
            Self::InvalidConfig { reason } => write!(f, "invalid distribution config: {reason}"),
        }
    }
}

impl std::error::Error for DistributionError {}
