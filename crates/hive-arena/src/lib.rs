//! The Hive arena map.
//!
//! [`ArenaMap`] owns the occupancy grid, the block and cache
//! collections, the nest, and the block-distribution dispatcher. It is
//! shared by reference across the agents processed in one timestep and
//! guards its state with three independent locks acquired in a fixed
//! order (grid, then caches, then blocks).
//!
//! Lookups of resources another agent may have removed first return a
//! [`ResourceLookup`] instead of panicking on a dangling id.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena_map;
pub mod config;
pub mod error;
pub mod governor;
pub mod lookup;
pub mod manifest;

pub use arena_map::ArenaMap;
pub use config::{ArenaMapConfig, GridConfig, NestConfig, ARENA_PADDING};
pub use error::{ArenaError, ConfigError};
pub use governor::{RedistGovernor, RedistTrigger};
pub use lookup::ResourceLookup;
pub use manifest::BlockManifest;
