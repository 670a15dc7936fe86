//! Movement engine: dice, step legality and room reachability.
//!
//! ## Rules
//!
//! - A turn's budget is the sum of two dice; each face of 1 also earns a clue.
//! - Steps are orthogonal. Walls, room interiors, cells visited this turn and
//!   cells holding another token are off limits.
//! - Stepping onto a door enters the room and ends movement for the turn.
//! - Leaving a room costs one step through one of its free doors.
//! - A secret passage moves between corner rooms without using the budget.

pub mod dice;
pub mod engine;
pub mod search;

pub use dice::{DiceRoll, MAGNIFYING_GLASS};
pub use engine::{MoveError, MoveOption, MovementEngine, RoomMove};
pub use search::{path_to_room, rooms_within, ReachableRoom, Route, SearchBounds};
