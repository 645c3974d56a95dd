//! Arena occupancy grid for Hive simulations.
//!
//! This crate defines the [`ArenaGrid`], a bounded 2D array of [`Cell`]s
//! each carrying a [`CellState`], along with the rectangle and view types
//! used by placement strategies (clusters are [`GridRect`]s) and by
//! downstream perception ([`ArenaGrid::subgrid`]).
//!
//! # Coordinates
//!
//! Cell `(x, y)` covers the real square
//! `[x * res, (x + 1) * res) x [y * res, (y + 1) * res)`, where `res` is
//! the grid resolution in arena units per cell. Entities placed on a cell
//! are centred on [`ArenaGrid::cell_center`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod error;
pub mod grid;
pub mod rect;
pub mod view;

pub use cell::{Cell, CellState};
pub use error::SpaceError;
pub use grid::{ArenaGrid, SUBGRID_PADDING};
pub use rect::GridRect;
pub use view::{GridView, OwnedGridView};
