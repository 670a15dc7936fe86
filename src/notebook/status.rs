//! Grid cell values and notebook errors.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::PlayerId;

/// What a notebook knows about one (card, owner) cell.
///
/// Cells only ever move from `Unknown` to one of the two terminal values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardStatus {
    #[default]
    Unknown,
    Has,
    DoesNotHave,
}

impl CardStatus {
    #[must_use]
    pub fn is_known(self) -> bool {
        self != CardStatus::Unknown
    }

    /// Grid glyph.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            CardStatus::Unknown => '?',
            CardStatus::Has => '✓',
            CardStatus::DoesNotHave => '✗',
        }
    }
}

impl std::fmt::Display for CardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CardStatus::Unknown => "unknown",
            CardStatus::Has => "has",
            CardStatus::DoesNotHave => "does not have",
        })
    }
}

/// A column of the grid: a seat, or the envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Owner {
    Player(PlayerId),
    Envelope,
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Owner::Player(p) => write!(f, "{p}"),
            Owner::Envelope => f.write_str("the envelope"),
        }
    }
}

impl From<PlayerId> for Owner {
    fn from(p: PlayerId) -> Self {
        Owner::Player(p)
    }
}

/// A mark that would contradict what the notebook already knows.
/// The grid is left unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NotebookError {
    #[error("{owner} is already marked '{current}' for {card}, cannot mark '{attempted}'")]
    Contradiction {
        card: Card,
        owner: Owner,
        current: CardStatus,
        attempted: CardStatus,
    },

    #[error("{card} is already known to be with {holder}")]
    AlreadyHeld { card: Card, holder: Owner },

    #[error("{existing} is already known to be in the envelope, so {card} cannot be")]
    EnvelopeConflict { card: Card, existing: Card },

    #[error("no such seat: {0}")]
    UnknownSeat(PlayerId),
}
