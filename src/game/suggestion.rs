//! Suggestions and their resolution.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Room, Suspect, Weapon};
use crate::core::PlayerId;
use crate::notebook::SuggestionReport;

/// The card one player privately showed the suggester.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Disproof {
    pub disprover: PlayerId,
    pub card: Card,
}

/// A resolved suggestion. The room is always the suggester's room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub turn: u32,
    pub suggester: PlayerId,
    pub suspect: Suspect,
    pub weapon: Weapon,
    pub room: Room,
    pub disproof: Option<Disproof>,
    /// Players asked before the disprover (or everyone, if nobody could)
    /// who held none of the three cards.
    pub passed: Vec<PlayerId>,
}

impl Suggestion {
    #[must_use]
    pub fn cards(&self) -> [Card; 3] {
        [
            Card::Suspect(self.suspect),
            Card::Weapon(self.weapon),
            Card::Room(self.room),
        ]
    }

    #[must_use]
    pub fn is_disproved(&self) -> bool {
        self.disproof.is_some()
    }

    #[must_use]
    pub fn disprover(&self) -> Option<PlayerId> {
        self.disproof.map(|d| d.disprover)
    }

    /// What `viewer` saw of this suggestion. The shown card is visible only
    /// to the suggester.
    #[must_use]
    pub fn report_for(&self, viewer: PlayerId) -> SuggestionReport {
        SuggestionReport {
            turn: self.turn,
            suggester: self.suggester,
            suspect: self.suspect,
            weapon: self.weapon,
            room: self.room,
            disprover: self.disprover(),
            shown: self
                .disproof
                .filter(|_| viewer == self.suggester)
                .map(|d| d.card),
            passed: self.passed.clone(),
        }
    }
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} suggests {} with the {} in the {}",
            self.suggester, self.suspect, self.weapon, self.room
        )?;
        match self.disproof {
            Some(d) => write!(f, ", disproved by {}", d.disprover),
            None => write!(f, ", not disproved"),
        }
    }
}
