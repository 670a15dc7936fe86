//! The closed set of player actions and the history record.
//!
//! Every accepted action is appended to the game's history as an
//! `ActionRecord`, ordered by (turn, sequence).

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::board::Position;
use crate::cards::{Room, Suspect, Weapon};

/// One discrete player action.
///
/// ```
/// use clue_engine::cards::{Suspect, Weapon};
/// use clue_engine::core::Action;
///
/// let action = Action::Suggest { suspect: Suspect::MrGreen, weapon: Weapon::Rope };
/// assert_eq!(action.kind(), "suggest");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Roll both dice to start moving.
    RollDice,
    /// Take a single orthogonal step onto a cell (or out of a room through a door).
    Step(Position),
    /// Walk the shortest legal route to a room.
    MoveToRoom(Room),
    /// Take the current room's secret passage.
    SecretPassage,
    /// Suggest in the current room.
    Suggest { suspect: Suspect, weapon: Weapon },
    /// Name the solution.
    Accuse {
        suspect: Suspect,
        weapon: Weapon,
        room: Room,
    },
    /// Hand the turn to the next active player.
    EndTurn,
}

impl Action {
    /// Short, stable label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Action::RollDice => "roll_dice",
            Action::Step(_) => "step",
            Action::MoveToRoom(_) => "move_to_room",
            Action::SecretPassage => "secret_passage",
            Action::Suggest { .. } => "suggest",
            Action::Accuse { .. } => "accuse",
            Action::EndTurn => "end_turn",
        }
    }

    /// Whether the action can move the player's token.
    #[must_use]
    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            Action::Step(_) | Action::MoveToRoom(_) | Action::SecretPassage
        )
    }
}

/// A recorded action with ordering metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Position within the turn, from 0.
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}
