//! Grid coordinates and cell classification.

use serde::{Deserialize, Serialize};

use crate::cards::{Room, Suspect};

/// A grid coordinate. Row 0 is the top edge, column 0 the left edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Manhattan distance; orthogonal neighbours are at distance 1.
    #[must_use]
    pub fn manhattan(self, other: Position) -> u32 {
        u32::from(self.row.abs_diff(other.row)) + u32::from(self.col.abs_diff(other.col))
    }

    #[must_use]
    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// What occupies a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    /// Impassable. Also returned for out-of-bounds queries.
    Wall,
    Hallway,
    /// A character's start square; walkable like a hallway.
    Start(Suspect),
    /// Room entrance. Stepping here enters the room.
    Door(Room),
    /// Inside a room; never stepped on directly.
    RoomInterior(Room),
}

impl CellType {
    /// Hallway and start cells: the only cells a search may expand through.
    #[must_use]
    pub fn is_walkable(self) -> bool {
        matches!(self, CellType::Hallway | CellType::Start(_))
    }

    #[must_use]
    pub fn room(self) -> Option<Room> {
        match self {
            CellType::Door(room) | CellType::RoomInterior(room) => Some(room),
            _ => None,
        }
    }

    #[must_use]
    pub fn door_room(self) -> Option<Room> {
        match self {
            CellType::Door(room) => Some(room),
            _ => None,
        }
    }
}
