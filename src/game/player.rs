//! The player entity: identity, hand, token location and turn flags.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::Position;
use crate::cards::{Card, Room, Suspect, Weapon};

/// Where a player's token is. A token is either on a hallway cell or
/// inside a room, never both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Hallway(Position),
    Room(Room),
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Hallway(pos) => write!(f, "hallway {pos}"),
            Location::Room(room) => write!(f, "{room}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub character: Suspect,
    pub hand: Vec<Card>,
    pub location: Location,

    /// Steps left this turn.
    pub moves_remaining: u8,

    /// Cells stood on this turn; none may be re-entered.
    pub visited: FxHashSet<Position>,

    /// False once eliminated by a wrong accusation.
    pub is_active: bool,

    pub has_rolled: bool,
    pub entered_room_this_turn: bool,

    /// The room this player walked out of this turn; it may not be re-entered.
    pub left_room_this_turn: Option<Room>,

    /// Pulled into a room by someone else's suggestion. Cleared on leaving
    /// that room or suggesting there.
    pub moved_by_suggestion: bool,

    /// Set whenever the token changes room; cleared by suggesting.
    pub moved_since_suggestion: bool,

    pub has_accused_this_turn: bool,
    pub last_suggestion_room: Option<Room>,
}

impl Player {
    pub fn new(name: impl Into<String>, character: Suspect, hand: Vec<Card>, start: Position) -> Self {
        Self {
            name: name.into(),
            character,
            hand,
            location: Location::Hallway(start),
            moves_remaining: 0,
            visited: FxHashSet::default(),
            is_active: true,
            has_rolled: false,
            entered_room_this_turn: false,
            left_room_this_turn: None,
            moved_by_suggestion: false,
            moved_since_suggestion: true,
            has_accused_this_turn: false,
            last_suggestion_room: None,
        }
    }

    #[must_use]
    pub fn current_room(&self) -> Option<Room> {
        match self.location {
            Location::Room(room) => Some(room),
            Location::Hallway(_) => None,
        }
    }

    #[must_use]
    pub fn hallway_position(&self) -> Option<Position> {
        match self.location {
            Location::Hallway(pos) => Some(pos),
            Location::Room(_) => None,
        }
    }

    #[must_use]
    pub fn holds(&self, card: Card) -> bool {
        self.hand.contains(&card)
    }

    /// Cards in hand that refute the named triple, in hand order.
    #[must_use]
    pub fn matching_cards(&self, suspect: Suspect, weapon: Weapon, room: Room) -> SmallVec<[Card; 3]> {
        let named = [Card::Suspect(suspect), Card::Weapon(weapon), Card::Room(room)];
        self.hand.iter().copied().filter(|card| named.contains(card)).collect()
    }

    /// Reset per-turn state at the start of this player's turn.
    pub fn begin_turn(&mut self) {
        self.moves_remaining = 0;
        self.visited.clear();
        if let Location::Hallway(pos) = self.location {
            self.visited.insert(pos);
        }
        self.has_rolled = false;
        self.entered_room_this_turn = false;
        self.left_room_this_turn = None;
        self.has_accused_this_turn = false;
    }

    /// Set the movement budget from a roll.
    pub fn start_moving(&mut self, budget: u8) {
        self.has_rolled = true;
        self.moves_remaining = budget;
    }

    /// Move onto a hallway (or exited door) cell.
    pub fn place_in_hallway(&mut self, pos: Position) {
        if let Location::Room(room) = self.location {
            self.left_room_this_turn = Some(room);
            self.moved_by_suggestion = false;
            self.moved_since_suggestion = true;
        }
        self.location = Location::Hallway(pos);
        self.visited.insert(pos);
    }

    /// Enter a room under the player's own movement. Movement ends here.
    pub fn enter_room(&mut self, room: Room) {
        self.location = Location::Room(room);
        self.moves_remaining = 0;
        self.entered_room_this_turn = true;
        self.moved_by_suggestion = false;
        self.moved_since_suggestion = true;
    }

    /// Relocated into `room` because someone suggested this character.
    pub fn pulled_into(&mut self, room: Room) {
        self.location = Location::Room(room);
        self.moved_by_suggestion = true;
        self.moved_since_suggestion = true;
    }
}
