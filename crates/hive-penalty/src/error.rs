//! Error types for penalty bookkeeping.

use std::fmt;

/// Errors from [`PenaltyLedger`](crate::PenaltyLedger) operations and
/// waveform construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PenaltyError {
    /// The agent already has an active penalty.
    DoubleBooking {
        /// The agent, rendered for diagnostics.
        agent: String,
    },
    /// A satisfied penalty references a resource that no longer exists.
    /// The record has been dropped.
    StaleResourceReference {
        /// The resource, rendered for diagnostics.
        resource: String,
    },
    /// A waveform parameter is out of range.
    InvalidWaveform {
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for PenaltyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DoubleBooking { agent } => {
                write!(f, "{agent} is already serving a penalty")
            }
            Self::StaleResourceReference { resource } => {
                write!(f, "{resource} vanished while its penalty was served")
            }
            Self::InvalidWaveform { reason } => write!(f, "invalid waveform: {reason}"),
        }
    }
}

impl std::error::Error for PenaltyError {}
