//! Test fixtures for Hive development.
//!
//! Small arena configurations, block and cache factories, and a
//! [`ForagingAgent`] that drives an [`ArenaMap`](hive_arena::ArenaMap)
//! and a [`PenaltyLedger`](hive_penalty::PenaltyLedger) the way a
//! resource interactor would.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod agent;
pub mod fixtures;

pub use agent::{AgentEvent, AgentLedger, ForagingAgent};
pub use fixtures::{arena_config, cache_on, cube, cubes, populated_arena, unit_grid};
