//! Core types for the Hive arena simulation.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers, timestep counter, real-valued geometry and the
//! spatial entities (blocks, caches, the nest) that every other Hive
//! crate shares.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod entity;
pub mod geometry;
pub mod id;

pub use entity::{
    placement_conflict, Block, BlockKind, Cache, EntityExtent, EntityKind, Nest,
    PlacementStatus, SpatialEntity,
};
pub use geometry::{CellCoord, Span, Vec2, SPAN_EPSILON};
pub use id::{AgentId, BlockId, CacheId, Timestep};
