//! Resource keys penalties are served against.

use std::fmt;

use hive_core::{BlockId, CacheId};

/// A resource identity a penalty can be tied to.
pub trait PenaltyKey: Copy + Eq + fmt::Debug + fmt::Display {
    /// `true` if completions on this key must be serialized, at most one
    /// per timestep across the ledger.
    fn requires_exclusion(&self) -> bool;
}

/// The shared resources of a foraging arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    /// Picking up from or dropping into a cache.
    Cache(CacheId),
    /// Dropping a block in the nest.
    Nest,
    /// Picking up a free block.
    Block(BlockId),
}

impl PenaltyKey for ResourceKey {
    fn requires_exclusion(&self) -> bool {
        matches!(self, Self::Cache(_) | Self::Nest)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache(id) => write!(f, "{id}"),
            Self::Nest => f.write_str("nest"),
            Self::Block(id) => write!(f, "{id}"),
        }
    }
}
