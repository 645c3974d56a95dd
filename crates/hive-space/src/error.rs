//! Error types for grid construction and spatial queries.

use hive_core::CellCoord;
use std::fmt;

/// Errors arising from grid construction or sub-view extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceError {
    /// Attempted to construct a grid with zero cells.
    EmptyGrid,
    /// Resolution is NaN, infinite, zero or negative.
    InvalidResolution {
        /// The offending value.
        value: f64,
    },
    /// A coordinate is outside the bounds of the grid.
    CoordOutOfBounds {
        /// The offending coordinate.
        coord: CellCoord,
        /// Human-readable description of the valid range.
        bounds: String,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
            Self::InvalidResolution { value } => {
                write!(f, "resolution must be finite and positive, got {value}")
            }
            Self::CoordOutOfBounds { coord, bounds } => {
                write!(f, "coordinate {coord} out of bounds: {bounds}")
            }
        }
    }
}

impl std::error::Error for SpaceError {}
