//! Arena, grid and entity fixtures.

use hive_arena::{ArenaMap, ArenaMapConfig, BlockManifest, GridConfig, NestConfig, ARENA_PADDING};
use hive_core::{Block, BlockId, BlockKind, Cache, CacheId, CellCoord, Vec2};
use hive_dist::{BlockDistConfig, DistributionKind};
use hive_space::ArenaGrid;

/// Unit-resolution arena of `size x size` cells (padding included) with
/// a 2 x 2 nest in the lower-left corner and `n_blocks` cubes.
pub fn arena_config(size: u32, n_blocks: u32, kind: DistributionKind, seed: u64) -> ArenaMapConfig {
    let upper = f64::from(size) - ARENA_PADDING;
    ArenaMapConfig {
        grid: GridConfig {
            resolution: 1.0,
            upper: Vec2::new(upper, upper),
        },
        nest: NestConfig {
            center: Vec2::new(1.5, 1.5),
            dims: Vec2::new(2.0, 2.0),
        },
        manifest: BlockManifest {
            n_cube: n_blocks,
            n_ramp: 0,
            unit_dim: 0.5,
        },
        dist: BlockDistConfig {
            kind,
            seed,
            ..BlockDistConfig::default()
        },
        ..ArenaMapConfig::default()
    }
}

/// Arena built from [`arena_config`] with every block distributed.
pub fn populated_arena(size: u32, n_blocks: u32, kind: DistributionKind, seed: u64) -> ArenaMap {
    let map = ArenaMap::new(&arena_config(size, n_blocks, kind, seed))
        .unwrap_or_else(|e| panic!("fixture arena: {e}"));
    map.distribute_all_blocks()
        .unwrap_or_else(|e| panic!("fixture distribution: {e}"));
    map
}

pub fn unit_grid(xdsize: usize, ydsize: usize) -> ArenaGrid {
    ArenaGrid::new(xdsize, ydsize, 1.0).unwrap_or_else(|e| panic!("fixture grid: {e}"))
}

/// 0.2 x 0.2 cube, small enough for any grid resolution used in tests.
pub fn cube(id: u32) -> Block {
    Block::new(BlockId(id), BlockKind::Cube, Vec2::new(0.2, 0.2))
}

pub fn cubes(n: u32) -> Vec<Block> {
    (0..n).map(cube).collect()
}

/// 3 x 3 cache hosted on `cell` of a unit-resolution grid.
pub fn cache_on(id: u32, cell: CellCoord, blocks: Vec<BlockId>) -> Cache {
    let rloc = Vec2::new(cell.x as f64 + 0.5, cell.y as f64 + 0.5);
    Cache::new(CacheId(id), rloc, cell, 3.0, blocks)
}

