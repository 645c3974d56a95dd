//! Spatial entities that occupy the arena.
//!
//! Every entity that must be avoided during placement exposes an
//! [`EntityExtent`]: a snapshot of its kind, id and real-valued X/Y
//! spans. Exclusion lists are plain `Vec<EntityExtent>`, so placement
//! code never holds a borrow into the collections that own the
//! entities themselves.

use crate::geometry::{CellCoord, Span, Vec2};
use crate::id::{BlockId, CacheId};

/// What kind of entity an [`EntityExtent`] describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A carryable block.
    Block,
    /// A stationary multi-block cache.
    Cache,
    /// The nest where blocks are delivered.
    Nest,
    /// A rectangular block-cluster region.
    Cluster,
}

/// Snapshot of an entity's bounding box, used as a placement exclusion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityExtent {
    /// Entity kind.
    pub kind: EntityKind,
    /// Numeric id of the entity, if it has one (the nest does not).
    pub id: Option<u32>,
    /// Real X span.
    pub xspan: Span,
    /// Real Y span.
    pub yspan: Span,
}

impl EntityExtent {
    /// `true` if the two extents overlap on both axes.
    pub fn overlaps(&self, other: &EntityExtent) -> bool {
        self.xspan.overlaps_with(&other.xspan) && self.yspan.overlaps_with(&other.yspan)
    }

    /// `true` if `pos` lies inside the extent.
    pub fn contains_point(&self, pos: Vec2) -> bool {
        self.xspan.contains(pos.x) && self.yspan.contains(pos.y)
    }
}

/// Common interface of everything that occupies space in the arena.
pub trait SpatialEntity {
    /// The entity kind.
    fn kind(&self) -> EntityKind;

    /// Bounding box at the entity's current location, or `None` if the
    /// entity is not currently in the arena (e.g. a carried block).
    fn extent(&self) -> Option<EntityExtent>;

    /// `true` if `pos` lies within the entity's current bounding box.
    fn contains_point(&self, pos: Vec2) -> bool {
        self.extent().is_some_and(|e| e.contains_point(pos))
    }
}

/// Per-axis conflict result of [`placement_conflict`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementStatus {
    /// The X spans overlap.
    pub x_conflict: bool,
    /// The Y spans overlap.
    pub y_conflict: bool,
}

impl PlacementStatus {
    /// A real conflict requires overlap on both axes.
    pub fn conflicts(&self) -> bool {
        self.x_conflict && self.y_conflict
    }
}

/// Test whether an entity of size `dims` centred on `loc` would overlap
/// `other`.
pub fn placement_conflict(loc: Vec2, dims: Vec2, other: &EntityExtent) -> PlacementStatus {
    let xspan = Span::from_center(loc.x, dims.x);
    let yspan = Span::from_center(loc.y, dims.y);
    PlacementStatus {
        x_conflict: xspan.overlaps_with(&other.xspan),
        y_conflict: yspan.overlaps_with(&other.yspan),
    }
}

// ── Block ──────────────────────────────────────────────────────────

/// Shape of a block, as listed in the block manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Square block, one unit on each side.
    Cube,
    /// Ramp block, two units long and one unit wide.
    Ramp,
}

/// A discrete, carryable resource.
///
/// A block is either *placed* (it has a real and a discrete location and
/// its host cell is `HasBlock`) or *out of sight* (carried by an agent,
/// held by a cache, or not yet distributed).
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    id: BlockId,
    kind: BlockKind,
    dims: Vec2,
    rloc: Option<Vec2>,
    dloc: Option<CellCoord>,
}

impl Block {
    /// Create an out-of-sight block.
    pub fn new(id: BlockId, kind: BlockKind, dims: Vec2) -> Self {
        Self {
            id,
            kind,
            dims,
            rloc: None,
            dloc: None,
        }
    }

    /// Block id.
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Block shape.
    pub fn block_kind(&self) -> BlockKind {
        self.kind
    }

    /// Block dimensions in arena units.
    pub fn dims(&self) -> Vec2 {
        self.dims
    }

    /// Real location of the block centre, if placed.
    pub fn rloc(&self) -> Option<Vec2> {
        self.rloc
    }

    /// Host cell of the block, if placed.
    pub fn dloc(&self) -> Option<CellCoord> {
        self.dloc
    }

    /// `true` if the block is not currently in the arena.
    pub fn is_out_of_sight(&self) -> bool {
        self.rloc.is_none()
    }

    /// Place the block centred on `rloc`, hosted by cell `dloc`.
    pub fn move_to(&mut self, rloc: Vec2, dloc: CellCoord) {
        self.rloc = Some(rloc);
        self.dloc = Some(dloc);
    }

    /// Take the block out of the arena.
    pub fn move_out_of_sight(&mut self) {
        self.rloc = None;
        self.dloc = None;
    }

    /// Bounding box the block would have if centred on `loc`.
    pub fn extent_at(&self, loc: Vec2) -> EntityExtent {
        EntityExtent {
            kind: EntityKind::Block,
            id: Some(self.id.0),
            xspan: Span::from_center(loc.x, self.dims.x),
            yspan: Span::from_center(loc.y, self.dims.y),
        }
    }
}

impl SpatialEntity for Block {
    fn kind(&self) -> EntityKind {
        EntityKind::Block
    }

    fn extent(&self) -> Option<EntityExtent> {
        self.rloc.map(|loc| self.extent_at(loc))
    }
}

// ── Cache ──────────────────────────────────────────────────────────

/// A stationary, square, multi-block resource.
#[derive(Clone, Debug, PartialEq)]
pub struct Cache {
    id: CacheId,
    rloc: Vec2,
    dloc: CellCoord,
    dim: f64,
    blocks: Vec<BlockId>,
}

impl Cache {
    /// Create a cache of side `dim` centred on `rloc`, hosted by `dloc`,
    /// initially holding `blocks`.
    pub fn new(id: CacheId, rloc: Vec2, dloc: CellCoord, dim: f64, blocks: Vec<BlockId>) -> Self {
        Self {
            id,
            rloc,
            dloc,
            dim,
            blocks,
        }
    }

    /// Cache id.
    pub fn id(&self) -> CacheId {
        self.id
    }

    /// Real location of the cache centre.
    pub fn rloc(&self) -> Vec2 {
        self.rloc
    }

    /// Host cell.
    pub fn dloc(&self) -> CellCoord {
        self.dloc
    }

    /// Side length in arena units.
    pub fn dim(&self) -> f64 {
        self.dim
    }

    /// Blocks currently held.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Number of blocks currently held.
    pub fn n_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Add a block to the cache.
    pub fn block_add(&mut self, block: BlockId) {
        self.blocks.push(block);
    }

    /// Remove and return the most recently added block.
    pub fn block_take(&mut self) -> Option<BlockId> {
        self.blocks.pop()
    }

    /// Real X span of the cache.
    pub fn xspan(&self) -> Span {
        Span::from_center(self.rloc.x, self.dim)
    }

    /// Real Y span of the cache.
    pub fn yspan(&self) -> Span {
        Span::from_center(self.rloc.y, self.dim)
    }
}

impl SpatialEntity for Cache {
    fn kind(&self) -> EntityKind {
        EntityKind::Cache
    }

    fn extent(&self) -> Option<EntityExtent> {
        Some(EntityExtent {
            kind: EntityKind::Cache,
            id: Some(self.id.0),
            xspan: self.xspan(),
            yspan: self.yspan(),
        })
    }
}

// ── Nest ───────────────────────────────────────────────────────────

/// The fixed rectangular region blocks are delivered to.
#[derive(Clone, Debug, PartialEq)]
pub struct Nest {
    center: Vec2,
    dims: Vec2,
}

impl Nest {
    /// Create a nest of size `dims` centred on `center`.
    pub fn new(center: Vec2, dims: Vec2) -> Self {
        Self { center, dims }
    }

    /// Nest centre.
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Nest dimensions.
    pub fn dims(&self) -> Vec2 {
        self.dims
    }

    /// Real X span.
    pub fn xspan(&self) -> Span {
        Span::from_center(self.center.x, self.dims.x)
    }

    /// Real Y span.
    pub fn yspan(&self) -> Span {
        Span::from_center(self.center.y, self.dims.y)
    }
}

impl SpatialEntity for Nest {
    fn kind(&self) -> EntityKind {
        EntityKind::Nest
    }

    fn extent(&self) -> Option<EntityExtent> {
        Some(EntityExtent {
            kind: EntityKind::Nest,
            id: None,
            xspan: self.xspan(),
            yspan: self.yspan(),
        })
    }
}
