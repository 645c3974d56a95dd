//! A minimal block-collecting agent.

use hive_arena::{ArenaMap, ResourceLookup};
use hive_core::{AgentId, BlockId, Timestep, Vec2};
use hive_penalty::{PenaltyLedger, ResourceKey};

pub type AgentLedger = PenaltyLedger<AgentId, ResourceKey>;

/// What a [`ForagingAgent`] did on one timestep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentEvent {
    /// Nothing to do.
    Idle,
    /// Started serving a penalty of this length.
    PenaltyBegun(u64),
    /// Still serving.
    Waiting,
    /// Picked up this block.
    PickedUp(BlockId),
    /// The block went away while the penalty was served.
    Vanished,
}

/// Minimal interactor: walk onto a block, serve a penalty, pick it up.
#[derive(Clone, Debug)]
pub struct ForagingAgent {
    pub id: AgentId,
    pub pos: Vec2,
    pub carrying: Option<BlockId>,
}

impl ForagingAgent {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id: AgentId(id),
            pos,
            carrying: None,
        }
    }

    pub fn step(&mut self, map: &ArenaMap, ledger: &AgentLedger, now: Timestep) -> AgentEvent {
        if self.carrying.is_some() {
            return AgentEvent::Idle;
        }
        if let Some(rec) = ledger.find(self.id) {
            if !rec.is_satisfied(now) {
                return AgentEvent::Waiting;
            }
            let Some(rec) = ledger.take_satisfied(self.id, now) else {
                return AgentEvent::Waiting;
            };
            return match rec.key() {
                ResourceKey::Block(bid) => match map.block_pickup(bid) {
                    ResourceLookup::Present(_) => {
                        self.carrying = Some(bid);
                        AgentEvent::PickedUp(bid)
                    }
                    ResourceLookup::Vanished => AgentEvent::Vanished,
                },
                _ => AgentEvent::Idle,
            };
        }
        match map.robot_on_block(self.pos) {
            Some(bid) => {
                AgentEvent::PenaltyBegun(ledger.begin(self.id, ResourceKey::Block(bid), now))
            }
            None => AgentEvent::Idle,
        }
    }
}
