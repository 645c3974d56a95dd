//! The arena map: single owner of the grid, blocks, caches and nest.
//!
//! State is split over three mutexes (grid, caches, blocks) so that
//! unrelated updates do not serialize on one lock. Operations touching
//! more than one always acquire in the order grid -> caches -> blocks.
//! The block-distribution [`Dispatcher`] lives under the block lock.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use hive_core::{
    placement_conflict, Block, BlockId, Cache, CacheId, CellCoord, EntityExtent, Nest,
    SpatialEntity, Timestep, Vec2,
};
use hive_dist::{Dispatcher, PlacementError};
use hive_space::{ArenaGrid, CellState, OwnedGridView, SpaceError};
use indexmap::IndexMap;
use tracing::{debug, error, info, trace, warn};

use crate::config::{ArenaMapConfig, ARENA_PADDING};
use crate::error::ArenaError;
use crate::governor::RedistGovernor;
use crate::lookup::ResourceLookup;

struct BlockStore {
    blocks: IndexMap<BlockId, Block>,
    dispatcher: Dispatcher,
    governor: RedistGovernor,
}

/// Sole authoritative owner of an arena's spatial state.
pub struct ArenaMap {
    grid: Mutex<ArenaGrid>,
    caches: Mutex<IndexMap<CacheId, Cache>>,
    blocks: Mutex<BlockStore>,
    nest: Nest,
    extent: Vec2,
}

// Compile-time assertion: ArenaMap must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<ArenaMap>();
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ArenaMap {
    /// Build the arena and initialize block distribution. Blocks start
    /// out of sight; call [`distribute_all_blocks`](Self::distribute_all_blocks)
    /// to place them.
    ///
    /// The grid covers the configured extent plus [`ARENA_PADDING`] on
    /// each axis.
    ///
    /// # Errors
    ///
    /// Returns `Err(ArenaError::Config)` for an invalid configuration and
    /// `Err(ArenaError::Distribution)` if the strategy could not be
    /// initialized (e.g. an infeasible power-law layout).
    pub fn new(config: &ArenaMapConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let upper = config.grid.upper;
        let grid = ArenaGrid::from_real(
            upper.x + ARENA_PADDING,
            upper.y + ARENA_PADDING,
            config.grid.resolution,
        )?;
        let mut dispatcher = Dispatcher::new(config.dist.clone(), ARENA_PADDING);
        dispatcher.try_initialize(&grid)?;

        let blocks: IndexMap<BlockId, Block> = config
            .manifest
            .create_blocks()
            .into_iter()
            .map(|b| (b.id(), b))
            .collect();
        info!(
            xdsize = grid.xdsize(),
            ydsize = grid.ydsize(),
            resolution = grid.resolution(),
            n_blocks = blocks.len(),
            dist = %config.dist.kind,
            "arena map created"
        );

        let extent = Vec2::new(grid.xrsize(), grid.yrsize());
        Ok(Self {
            grid: Mutex::new(grid),
            caches: Mutex::new(IndexMap::new()),
            blocks: Mutex::new(BlockStore {
                blocks,
                dispatcher,
                governor: RedistGovernor::new(config.redist),
            }),
            nest: Nest::new(config.nest.center, config.nest.dims),
            extent,
        })
    }

    // ── Distribution ───────────────────────────────────────────────

    /// Place one block with the configured strategy.
    ///
    /// Returns `true` without placing anything once the redistribution
    /// governor has fired. On failure the block and grid are unchanged.
    pub fn distribute_single_block(&self, id: BlockId) -> bool {
        let mut grid = lock(&self.grid);
        let caches = lock(&self.caches);
        let mut store = lock(&self.blocks);
        let BlockStore {
            blocks,
            dispatcher,
            governor,
        } = &mut *store;

        if !governor.enabled() {
            trace!(block = %id, "redistribution disabled");
            return true;
        }
        let mut exclusions = collect_exclusions(&self.nest, &caches, blocks, Some(id));
        let Some(block) = blocks.get_mut(&id) else {
            warn!(block = %id, "cannot distribute unknown block");
            return false;
        };

        let vacated = block
            .dloc()
            .filter(|&c| grid.state(c) == Some(CellState::HasBlock(id)));
        if let Some(c) = vacated {
            set_state(&mut grid, c, CellState::Empty);
        }
        match dispatcher.distribute_block(&mut grid, block, &mut exclusions) {
            Ok(coord) => {
                debug!(block = %id, cell = %coord, "block distributed");
                true
            }
            Err(err) => {
                if let Some(c) = vacated {
                    set_state(&mut grid, c, CellState::HasBlock(id));
                }
                warn!(block = %id, %err, "block distribution failed");
                false
            }
        }
    }

    /// Reset the grid and place every block not held by a cache.
    ///
    /// Intended for initialization and reset only. On success every free
    /// block occupies a distinct cell and no placed entities overlap.
    ///
    /// # Errors
    ///
    /// Returns the first placement error. Blocks after the failing one
    /// stay out of sight.
    pub fn distribute_all_blocks(&self) -> Result<(), PlacementError> {
        let mut grid = lock(&self.grid);
        let caches = lock(&self.caches);
        let mut store = lock(&self.blocks);
        let BlockStore {
            blocks, dispatcher, ..
        } = &mut *store;

        grid.reset();
        for cache in caches.values() {
            mark_cache(&mut grid, cache);
        }
        let cached: HashSet<BlockId> = caches
            .values()
            .flat_map(|c| c.blocks().iter().copied())
            .collect();
        for b in blocks.values_mut().filter(|b| !cached.contains(&b.id())) {
            b.move_out_of_sight();
        }

        let mut exclusions = collect_exclusions(&self.nest, &caches, blocks, None);
        let free = blocks.values_mut().filter(|b| !cached.contains(&b.id()));
        let result = dispatcher.distribute_blocks(&mut grid, free, &mut exclusions);
        match &result {
            Ok(()) => info!(
                n_blocks = blocks.len() - cached.len(),
                strategy = %dispatcher.config().kind,
                "distributed all blocks"
            ),
            Err(err) => error!(%err, "unable to distribute all blocks"),
        }
        result
    }

    /// Feed the redistribution governor.
    pub fn redist_governor_update(&self, now: Timestep, blocks_collected: u64) {
        lock(&self.blocks).governor.update(now, blocks_collected);
    }

    /// `true` while collected blocks are still redistributed.
    pub fn redist_enabled(&self) -> bool {
        lock(&self.blocks).governor.enabled()
    }

    // ── Caches ─────────────────────────────────────────────────────

    /// Add caches and mark the cells they cover.
    ///
    /// The host cell of each cache becomes [`CellState::HasCache`], every
    /// other covered cell [`CellState::CacheExtent`]. Free blocks under the
    /// new footprint are absorbed into the cache, and every block a cache
    /// holds is moved to the cache location.
    pub fn caches_add(&self, new_caches: impl IntoIterator<Item = Cache>) {
        let mut grid = lock(&self.grid);
        let mut caches = lock(&self.caches);
        let mut store = lock(&self.blocks);
        for mut cache in new_caches {
            let covered = grid.cells_covering(cache.xspan(), cache.yspan());
            let buried: Vec<BlockId> = covered
                .iter()
                .chain(std::iter::once(cache.dloc()))
                .filter_map(|c| grid.state(c).and_then(|s| s.block()))
                .collect();
            for bid in buried {
                if !cache.blocks().contains(&bid) {
                    debug!(cache = %cache.id(), block = %bid, "block absorbed by new cache");
                    cache.block_add(bid);
                }
            }
            for &bid in cache.blocks() {
                let Some(block) = store.blocks.get_mut(&bid) else {
                    warn!(cache = %cache.id(), block = %bid, "cache holds unknown block");
                    continue;
                };
                if let Some(c) = block.dloc() {
                    if grid.state(c) == Some(CellState::HasBlock(bid)) {
                        set_state(&mut grid, c, CellState::Empty);
                    }
                }
                block.move_to(cache.rloc(), cache.dloc());
            }
            mark_cache(&mut grid, &cache);
            info!(
                cache = %cache.id(),
                loc = %cache.rloc(),
                n_blocks = cache.n_blocks(),
                "cache added"
            );
            if let Some(old) = caches.insert(cache.id(), cache) {
                warn!(cache = %old.id(), "cache replaced");
            }
        }
    }

    /// Reset the extent cells of a cache to empty. The host cell and the
    /// cache itself are untouched. Returns `false` if the cache is gone.
    pub fn cache_extent_clear(&self, id: CacheId) -> bool {
        let mut grid = lock(&self.grid);
        let caches = lock(&self.caches);
        match caches.get(&id) {
            Some(cache) => {
                clear_cache_extent(&mut grid, cache);
                true
            }
            None => false,
        }
    }

    /// Clear every cell of a cache, then drop it from the collection.
    pub fn cache_remove(&self, id: CacheId) -> Option<Cache> {
        let mut grid = lock(&self.grid);
        let mut caches = lock(&self.caches);
        remove_cache(&mut grid, &mut caches, id)
    }

    /// Take the most recently added block from a cache.
    ///
    /// A cache emptied this way is removed.
    pub fn cache_pickup_block(&self, id: CacheId) -> ResourceLookup<BlockId> {
        let mut grid = lock(&self.grid);
        let mut caches = lock(&self.caches);
        let mut store = lock(&self.blocks);

        let Some(cache) = caches.get_mut(&id) else {
            return ResourceLookup::Vanished;
        };
        let taken = cache.block_take();
        let depleted = cache.n_blocks() == 0;
        if let Some(bid) = taken {
            if let Some(block) = store.blocks.get_mut(&bid) {
                block.move_out_of_sight();
            }
            debug!(
                cache = %id,
                block = %bid,
                remaining = cache.n_blocks(),
                "block taken from cache"
            );
        }
        if depleted {
            remove_cache(&mut grid, &mut caches, id);
        }
        taken.into()
    }

    /// Drop a carried block into a cache.
    ///
    /// Returns [`ResourceLookup::Vanished`] if the cache or block is gone,
    /// or if the block is not carried (it is placed in the arena or
    /// already held by a cache).
    pub fn cache_drop_block(&self, cache_id: CacheId, block_id: BlockId) -> ResourceLookup<()> {
        let mut caches = lock(&self.caches);
        let mut store = lock(&self.blocks);

        if caches.values().any(|c| c.blocks().contains(&block_id)) {
            debug!(cache = %cache_id, block = %block_id, "block already cached");
            return ResourceLookup::Vanished;
        }
        let Some(cache) = caches.get_mut(&cache_id) else {
            return ResourceLookup::Vanished;
        };
        let Some(block) = store.blocks.get_mut(&block_id) else {
            return ResourceLookup::Vanished;
        };
        if !block.is_out_of_sight() {
            debug!(cache = %cache_id, block = %block_id, "block is not carried");
            return ResourceLookup::Vanished;
        }
        block.move_to(cache.rloc(), cache.dloc());
        cache.block_add(block_id);
        debug!(
            cache = %cache_id,
            block = %block_id,
            n_blocks = cache.n_blocks(),
            "block dropped in cache"
        );
        ResourceLookup::Present(())
    }

    // ── Blocks ─────────────────────────────────────────────────────

    /// Pick up a free block: its cell empties and it leaves the arena.
    pub fn block_pickup(&self, id: BlockId) -> ResourceLookup<Block> {
        let mut grid = lock(&self.grid);
        let mut store = lock(&self.blocks);
        let Some(block) = store.blocks.get_mut(&id) else {
            return ResourceLookup::Vanished;
        };
        let Some(c) = block.dloc() else {
            return ResourceLookup::Vanished;
        };
        if grid.state(c) != Some(CellState::HasBlock(id)) {
            // Held by a cache, not free.
            return ResourceLookup::Vanished;
        }
        set_state(&mut grid, c, CellState::Empty);
        let snapshot = block.clone();
        block.move_out_of_sight();
        trace!(block = %id, cell = %c, "block picked up");
        ResourceLookup::Present(snapshot)
    }

    /// Drop a carried block at `pos`, snapped to the containing cell.
    ///
    /// Fails without side effects if the block is not carried, the cell is
    /// occupied, or the block would overlap the nest, a cache or another
    /// block.
    pub fn block_drop(&self, id: BlockId, pos: Vec2) -> bool {
        let mut grid = lock(&self.grid);
        let caches = lock(&self.caches);
        let mut store = lock(&self.blocks);

        let Some(coord) = grid.discretize(pos) else {
            return false;
        };
        if grid.state(coord) != Some(CellState::Empty) {
            return false;
        }
        let exclusions = collect_exclusions(&self.nest, &caches, &store.blocks, Some(id));
        let Some(block) = store.blocks.get_mut(&id) else {
            return false;
        };
        if !block.is_out_of_sight() {
            return false;
        }
        let center = grid.cell_center(coord);
        if exclusions
            .iter()
            .any(|e| placement_conflict(center, block.dims(), e).conflicts())
        {
            debug!(block = %id, cell = %coord, "drop site conflicts");
            return false;
        }
        set_state(&mut grid, coord, CellState::HasBlock(id));
        block.move_to(center, coord);
        true
    }

    // ── Queries ────────────────────────────────────────────────────

    /// The free block under `pos`, if any. Positions on a cache never
    /// report a block.
    pub fn robot_on_block(&self, pos: Vec2) -> Option<BlockId> {
        let caches = lock(&self.caches);
        if caches.values().any(|c| c.contains_point(pos)) {
            return None;
        }
        let store = lock(&self.blocks);
        store
            .blocks
            .values()
            .find(|b| b.contains_point(pos))
            .map(Block::id)
    }

    /// The cache under `pos`, if any.
    pub fn robot_on_cache(&self, pos: Vec2) -> Option<CacheId> {
        lock(&self.caches)
            .values()
            .find(|c| c.contains_point(pos))
            .map(Cache::id)
    }

    /// Id of the cache a block of `dims` dropped at `pos` would overlap.
    pub fn drop_overlaps_cache(&self, pos: Vec2, dims: Vec2) -> Option<CacheId> {
        lock(&self.caches)
            .values()
            .find(|c| {
                c.extent()
                    .is_some_and(|e| placement_conflict(pos, dims, &e).conflicts())
            })
            .map(Cache::id)
    }

    /// `true` if a block of `dims` dropped at `pos` would overlap the nest.
    pub fn drop_overlaps_nest(&self, pos: Vec2, dims: Vec2) -> bool {
        self.nest
            .extent()
            .is_some_and(|e| placement_conflict(pos, dims, &e).conflicts())
    }

    /// `true` if `pos` is within two block sizes of an arena wall.
    pub fn drop_near_arena_boundary(&self, pos: Vec2, dims: Vec2) -> bool {
        pos.x <= dims.x * 2.0
            || pos.x >= self.extent.x - dims.x * 2.0
            || pos.y <= dims.y * 2.0
            || pos.y >= self.extent.y - dims.y * 2.0
    }

    /// Bounds-checked copy of the window of `radius` cells around
    /// `origin`.
    pub fn subgrid(&self, origin: CellCoord, radius: usize) -> Result<OwnedGridView, SpaceError> {
        let grid = lock(&self.grid);
        let view = grid.subgrid(origin, radius)?.to_owned_view();
        Ok(view)
    }

    /// Run `f` against the grid under the grid lock.
    pub fn with_grid<R>(&self, f: impl FnOnce(&ArenaGrid) -> R) -> R {
        let grid = lock(&self.grid);
        f(&grid)
    }

    /// Current state of a cache.
    pub fn cache_lookup(&self, id: CacheId) -> ResourceLookup<Cache> {
        lock(&self.caches).get(&id).cloned().into()
    }

    /// Current state of a block.
    pub fn block_lookup(&self, id: BlockId) -> ResourceLookup<Block> {
        lock(&self.blocks).blocks.get(&id).cloned().into()
    }

    /// Snapshot of all blocks in id order.
    pub fn blocks(&self) -> Vec<Block> {
        lock(&self.blocks).blocks.values().cloned().collect()
    }

    /// Snapshot of all caches in insertion order.
    pub fn caches(&self) -> Vec<Cache> {
        lock(&self.caches).values().cloned().collect()
    }

    /// Number of blocks.
    pub fn n_blocks(&self) -> usize {
        lock(&self.blocks).blocks.len()
    }

    /// Number of caches.
    pub fn n_caches(&self) -> usize {
        lock(&self.caches).len()
    }

    /// The nest.
    pub fn nest(&self) -> &Nest {
        &self.nest
    }

    /// Real size of the arena, padding included.
    pub fn extent(&self) -> Vec2 {
        self.extent
    }
}

fn collect_exclusions(
    nest: &Nest,
    caches: &IndexMap<CacheId, Cache>,
    blocks: &IndexMap<BlockId, Block>,
    skip: Option<BlockId>,
) -> Vec<EntityExtent> {
    nest.extent()
        .into_iter()
        .chain(caches.values().filter_map(|c| c.extent()))
        .chain(
            blocks
                .values()
                .filter(|b| Some(b.id()) != skip)
                .filter_map(|b| b.extent()),
        )
        .collect()
}

fn set_state(grid: &mut ArenaGrid, coord: CellCoord, state: CellState) {
    if let Some(cell) = grid.access_mut(coord) {
        cell.set_state(state);
    }
}

fn mark_cache(grid: &mut ArenaGrid, cache: &Cache) {
    let id = cache.id();
    for c in grid.cells_covering(cache.xspan(), cache.yspan()).iter() {
        set_state(grid, c, CellState::CacheExtent(id));
    }
    set_state(grid, cache.dloc(), CellState::HasCache(id));
}

fn clear_cache_extent(grid: &mut ArenaGrid, cache: &Cache) {
    let id = cache.id();
    for c in grid.cells_covering(cache.xspan(), cache.yspan()).iter() {
        if grid.state(c) == Some(CellState::CacheExtent(id)) {
            set_state(grid, c, CellState::Empty);
        }
    }
}

fn remove_cache(
    grid: &mut ArenaGrid,
    caches: &mut IndexMap<CacheId, Cache>,
    id: CacheId,
) -> Option<Cache> {
    let cache = caches.get(&id)?;
    clear_cache_extent(grid, cache);
    if grid.state(cache.dloc()) == Some(CellState::HasCache(id)) {
        set_state(grid, cache.dloc(), CellState::Empty);
    }
    let removed = caches.shift_remove(&id);
    info!(cache = %id, "cache removed");
    removed
}
