//! Engine error types.
//!
//! Component errors (`BoardError`, `MoveError`, `NotebookError`) live with
//! their components and fold into `GameError` through `#[from]`. Every
//! variant is classified by [`ErrorKind`]:
//!
//! - `Validation`: the caller asked for something illegal; state is unchanged
//! - `Invariant`: static data or internal state is corrupt

use crate::board::BoardError;
use crate::cards::{Room, UnknownCardName};
use crate::movement::MoveError;
use crate::notebook::{CardIssue, NotebookError};

/// Severity class of a [`GameError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Invariant,
}

/// Every way an engine operation can be rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("a game needs between {min} and {max} players, got {found}")]
    InvalidPlayerCount { found: usize, min: usize, max: usize },

    #[error("player name '{0}' is used more than once")]
    DuplicatePlayerName(String),

    #[error("invalid setup: {0}")]
    InvalidSetup(&'static str),

    #[error("no player named '{0}'")]
    UnknownPlayer(String),

    #[error(transparent)]
    UnknownCard(#[from] UnknownCardName),

    #[error("no game in progress; call setup first")]
    NoGame,

    #[error("the game is over")]
    GameOver,

    #[error("it is {current}'s turn, not {player}'s")]
    NotYourTurn { player: String, current: String },

    #[error("{0} has been eliminated")]
    PlayerEliminated(String),

    #[error("dice were already rolled this turn")]
    AlreadyRolled,

    #[error("roll the dice before moving")]
    NotRolled,

    #[error("you must be in a room to make a suggestion")]
    NotInRoom,

    #[error("you must enter the {0} this turn before suggesting there")]
    MustEnterRoom(Room),

    #[error("leave and re-enter the {0} before suggesting there again")]
    RepeatedSuggestion(Room),

    #[error("only one suggestion per turn")]
    AlreadySuggested,

    #[error("only one accusation per turn")]
    AlreadyAccused,

    #[error("accusation blocked by your notebook: {}", join_problems(.problems))]
    AccusationBlocked { problems: Vec<CardIssue> },

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Notebook(#[from] NotebookError),

    #[error(transparent)]
    Board(#[from] BoardError),
}

fn join_problems(problems: &[CardIssue]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl GameError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::Board(_) => ErrorKind::Invariant,
            _ => ErrorKind::Validation,
        }
    }

    /// Whether the rejected call left state untouched (always, for validation errors).
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}
