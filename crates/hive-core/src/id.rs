//! Strongly-typed identifiers and the [`Timestep`] counter.

use std::fmt;
use std::ops::Add;

/// Identifies a block within an arena.
///
/// Blocks are created from the block manifest at arena construction and
/// assigned sequential IDs. IDs are never reused within a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block{}", self.0)
    }
}

impl From<u32> for BlockId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a cache within an arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheId(pub u32);

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cache{}", self.0)
    }
}

impl From<u32> for CacheId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies an agent (robot) driven by the host simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fb{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Discrete simulation timestep.
///
/// Advanced by the external host once per logical step. Nothing in Hive
/// blocks waiting for a timestep; callers poll against the current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestep(pub u64);

impl Timestep {
    /// Number of whole timesteps elapsed since `earlier`, or 0 if
    /// `earlier` is in the future.
    pub fn since(self, earlier: Timestep) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<u64> for Timestep {
    type Output = Timestep;

    fn add(self, rhs: u64) -> Timestep {
        Timestep(self.0.saturating_add(rhs))
    }
}

impl fmt::Display for Timestep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Timestep {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestep_since_saturates() {
        assert_eq!(Timestep(15).since(Timestep(5)), 10);
        assert_eq!(Timestep(5).since(Timestep(15)), 0);
    }

    #[test]
    fn timestep_add_saturates() {
        assert_eq!(Timestep(100) + 2, Timestep(102));
        assert_eq!(Timestep(u64::MAX) + 1, Timestep(u64::MAX));
    }

    #[test]
    fn display_matches_log_format() {
        assert_eq!(BlockId(3).to_string(), "block3");
        assert_eq!(CacheId(0).to_string(), "cache0");
        assert_eq!(AgentId(12).to_string(), "fb12");
    }
}
