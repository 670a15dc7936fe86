//! Events emitted by the game for the notebooks to consume.

use serde::{Deserialize, Serialize};

use super::suggestion::Suggestion;
use crate::cards::{Card, Room, Suspect, Weapon};
use crate::core::PlayerId;
use crate::rules::GameResult;

/// A magnifying-glass clue: `card` is not in the envelope, and `holder` has it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clue {
    pub card: Card,
    pub holder: PlayerId,
}

impl std::fmt::Display for Clue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is NOT the murder {}", self.card, self.card.category())
    }
}

/// Something that happened, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Private to `player`.
    CardsDealt { player: PlayerId, hand: Vec<Card> },

    /// Public, except the shown card, which only the suggester sees.
    SuggestionResolved(Suggestion),

    /// `player` rolled a magnifying glass. The ownership fact is public.
    ClueRevealed { player: PlayerId, clue: Clue },

    AccusationMade {
        player: PlayerId,
        suspect: Suspect,
        weapon: Weapon,
        room: Room,
        correct: bool,
    },

    TurnAdvanced { player: PlayerId, turn: u32 },

    GameEnded(GameResult),
}

impl GameEvent {
    /// Short, stable label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::CardsDealt { .. } => "cards_dealt",
            GameEvent::SuggestionResolved(_) => "suggestion_resolved",
            GameEvent::ClueRevealed { .. } => "clue_revealed",
            GameEvent::AccusationMade { .. } => "accusation_made",
            GameEvent::TurnAdvanced { .. } => "turn_advanced",
            GameEvent::GameEnded(_) => "game_ended",
        }
    }
}
