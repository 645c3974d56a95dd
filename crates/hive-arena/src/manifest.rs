//! Block manifest: how many blocks of each shape the arena holds.

use hive_core::{Block, BlockId, BlockKind, Vec2};

/// Counts and size of the blocks created at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockManifest {
    /// Number of cube blocks. Default: 10.
    pub n_cube: u32,
    /// Number of ramp blocks. Default: 0.
    pub n_ramp: u32,
    /// Side of a cube; ramps are twice as long in X. Default: 0.2.
    pub unit_dim: f64,
}

impl Default for BlockManifest {
    fn default() -> Self {
        Self {
            n_cube: 10,
            n_ramp: 0,
            unit_dim: 0.2,
        }
    }
}

impl BlockManifest {
    /// Total number of blocks.
    pub fn total(&self) -> u32 {
        self.n_cube.saturating_add(self.n_ramp)
    }

    /// Create the blocks, cubes first, with sequential ids from 0.
    ///
    /// All blocks start out of sight.
    pub fn create_blocks(&self) -> Vec<Block> {
        let cube = Vec2::new(self.unit_dim, self.unit_dim);
        let ramp = Vec2::new(self.unit_dim * 2.0, self.unit_dim);
        let cubes = (0..self.n_cube).map(|i| Block::new(BlockId(i), BlockKind::Cube, cube));
        let ramps = (0..self.n_ramp)
            .map(|i| Block::new(BlockId(self.n_cube + i), BlockKind::Ramp, ramp));
        cubes.chain(ramps).collect()
    }
}
