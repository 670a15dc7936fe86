//! Board model: static geometry of the grid.
//!
//! The board is pure data. It is parsed and validated once, then shared
//! read-only (`Arc<Board>`) by every player and every game.
//!
//! - `Position`, `CellType`: coordinates and cell classification
//! - `Board`: the validated grid with door, passage and start-square queries
//! - `layout`: the built-in classic layout

pub mod cell;
pub mod layout;
pub mod model;

pub use cell::{CellType, Position};
pub use layout::{CLASSIC_LAYOUT, CLASSIC_PASSAGES};
pub use model::{Board, BoardError};
