//! The two movement dice.
//!
//! A face of 1 doubles as the magnifying glass: each one earns a clue on
//! top of its movement value.

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, DIE_FACES};

/// The face that grants a clue.
pub const MAGNIFYING_GLASS: u8 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceRoll {
    pub die1: u8,
    pub die2: u8,
}

impl DiceRoll {
    /// A roll with explicit faces, or `None` if either face is not in `1..=6`.
    #[must_use]
    pub fn new(die1: u8, die2: u8) -> Option<Self> {
        let valid = |face: u8| (1..=DIE_FACES).contains(&face);
        (valid(die1) && valid(die2)).then_some(Self { die1, die2 })
    }

    /// Roll both dice.
    pub fn roll(rng: &mut GameRng) -> Self {
        Self {
            die1: rng.roll_die(),
            die2: rng.roll_die(),
        }
    }

    /// Steps granted: the sum of both faces.
    #[must_use]
    pub fn budget(&self) -> u8 {
        self.die1 + self.die2
    }

    /// Number of magnifying glasses showing (0, 1 or 2).
    #[must_use]
    pub fn clue_count(&self) -> usize {
        [self.die1, self.die2]
            .iter()
            .filter(|&&face| face == MAGNIFYING_GLASS)
            .count()
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} + {} = {}", self.die1, self.die2, self.budget())
    }
}
