//! Game configuration.
//!
//! `GameConfig` is plain data: every field has a default, so partial
//! documents deserialize cleanly. Builder-style setters cover programmatic
//! construction.

use serde::{Deserialize, Serialize};

use crate::cards::Suspect;

/// Fewest players a game can be set up with.
pub const MIN_PLAYERS: usize = 3;

/// Most players a game can be set up with (one per character).
pub const MAX_PLAYERS: usize = 6;

/// Session-wide game settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the deterministic RNG (solution, shuffle, dice, clues).
    pub seed: u64,

    /// End the game as a draw once the turn counter passes this value.
    pub max_turns: Option<u32>,

    /// The holder of this character takes the first turn.
    pub first_character: Suspect,

    /// Refuse accusations that the accuser's own notebook proves wrong.
    pub notebook_gates_accusations: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_turns: None,
            first_character: Suspect::MissScarlet,
            notebook_gates_accusations: true,
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    #[must_use]
    pub fn with_first_character(mut self, character: Suspect) -> Self {
        self.first_character = character;
        self
    }

    /// Allow accusations the notebook contradicts (they simply fail).
    #[must_use]
    pub fn ungated(mut self) -> Self {
        self.notebook_gates_accusations = false;
        self
    }

    /// Whether `player_count` is a legal table size.
    #[must_use]
    pub fn accepts_player_count(player_count: usize) -> bool {
        (MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count)
    }
}
