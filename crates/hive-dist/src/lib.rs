//! Block placement strategies for Hive arenas.
//!
//! Four strategies share one contract: a placement request either
//! commits fully or leaves the grid, the block and the exclusion list
//! untouched.
//!
//! | Strategy | Type | Failure modes |
//! |----------|------|---------------|
//! | Uniform-random | [`RandomDistributor`] | [`PlacementError::Exhausted`] |
//! | Bounded cluster | [`ClusterDistributor`] | adds [`PlacementError::ClusterFull`] |
//! | Multi-cluster | [`MultiClusterDistributor`] | adds [`PlacementError::AllClustersFull`] |
//! | Power-law | [`PowerLawDistributor`] | [`PlacementError::AllClustersFull`] |
//!
//! The [`Dispatcher`] builds the strategy named by [`BlockDistConfig`]
//! and owns the single [`HiveRng`] that every placement draws from, so a
//! run is reproducible from its seed. A power-law layout that cannot be
//! fit fails at initialization with
//! [`DistributionError::ClusterLayoutInfeasible`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cluster;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod multi_cluster;
pub mod powerlaw;
pub mod random;
pub mod strategy;

/// Generator used by every placement strategy.
pub type HiveRng = rand_chacha::ChaCha8Rng;

pub use cluster::{BlockCluster, ClusterDistributor, ClusterId};
pub use config::{BlockDistConfig, DistributionKind, PowerLawConfig};
pub use dispatcher::{Dispatcher, INDEX_MIN};
pub use error::{DistributionError, PlacementError};
pub use multi_cluster::MultiClusterDistributor;
pub use powerlaw::{BinnedPowerLaw, PowerLawDistributor, MAX_LAYOUT_TRIES};
pub use random::{RandomDistributor, MAX_DIST_TRIES};
pub use strategy::Strategy;
