//! Hive: arena resource contention for multi-agent foraging simulations.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Hive sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use hive::prelude::*;
//!
//! // Default arena: 10 x 10 units at 0.2 resolution, ten cubes placed
//! // uniformly at random.
//! let map = ArenaMap::new(&ArenaMapConfig::default()).unwrap();
//! map.distribute_all_blocks().unwrap();
//! assert_eq!(map.n_blocks(), 10);
//! assert!(map.blocks().iter().all(|b| b.dloc().is_some()));
//!
//! // Two agents reaching the nest on the same timestep finish one step
//! // apart.
//! let ledger: PenaltyLedger<AgentId, ResourceKey> =
//!     PenaltyLedger::new("nest", Waveform::null());
//! let first = ledger.begin(AgentId(0), ResourceKey::Nest, Timestep(100));
//! let second = ledger.begin(AgentId(1), ResourceKey::Nest, Timestep(100));
//! assert_eq!((first, second), (1, 2));
//! assert!(ledger.is_satisfied(AgentId(0), Timestep(101)));
//! assert!(!ledger.is_satisfied(AgentId(1), Timestep(101)));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `hive-core` | IDs, timesteps, geometry, blocks, caches, nest |
//! | [`space`] | `hive-space` | Occupancy grid, rectangles, views |
//! | [`dist`] | `hive-dist` | Placement strategies and the dispatcher |
//! | [`penalty`] | `hive-penalty` | Waveforms and the penalty ledger |
//! | [`arena`] | `hive-arena` | The lock-disciplined arena map |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Identifiers, geometry and spatial entities (`hive-core`).
pub use hive_core as types;

/// The occupancy grid (`hive-space`).
///
/// [`space::ArenaGrid`] plus the [`space::GridRect`] and view types used
/// by placement and perception.
pub use hive_space as space;

/// Block placement (`hive-dist`).
///
/// The [`dist::Dispatcher`] builds one [`dist::Strategy`] from a
/// [`dist::BlockDistConfig`] and places blocks with a seeded generator.
pub use hive_dist as dist;

/// Temporal penalties (`hive-penalty`).
pub use hive_penalty as penalty;

/// The arena map (`hive-arena`).
///
/// [`arena::ArenaMap`] owns the grid, blocks, caches and nest.
pub use hive_arena as arena;

/// Common imports for typical Hive usage.
///
/// ```rust
/// use hive::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use hive_core::{
        AgentId, Block, BlockId, BlockKind, Cache, CacheId, CellCoord, Nest, SpatialEntity,
        Timestep, Vec2,
    };

    // Grid
    pub use hive_space::{ArenaGrid, CellState, GridRect, OwnedGridView};

    // Distribution
    pub use hive_dist::{BlockDistConfig, DistributionKind, PowerLawConfig};

    // Penalties
    pub use hive_penalty::{PenaltyKey, PenaltyLedger, ResourceKey, Waveform, WaveformConfig};

    // Arena
    pub use hive_arena::{ArenaMap, ArenaMapConfig, ResourceLookup};

    // Errors
    pub use hive_arena::{ArenaError, ConfigError};
    pub use hive_dist::{DistributionError, PlacementError};
    pub use hive_penalty::PenaltyError;
    pub use hive_space::SpaceError;
}
