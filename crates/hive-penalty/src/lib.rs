//! Temporal penalties for exclusive resource operations.
//!
//! An agent that starts an exclusive operation (picking up from a cache,
//! dropping in the nest) must first serve a penalty whose length comes
//! from a [`Waveform`]. The [`PenaltyLedger`] records who is serving
//! what, answers "is this agent done yet?" each timestep, and spreads
//! completions so that at most one exclusive operation per resource
//! class finishes on any timestep.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod key;
pub mod ledger;
pub mod waveform;

pub use error::PenaltyError;
pub use key::{PenaltyKey, ResourceKey};
pub use ledger::{PenaltyLedger, PenaltyRecord};
pub use waveform::{Waveform, WaveformConfig, WaveformKind};
