//! # clue-engine
//!
//! A deterministic rules engine for the Clue board game, with a per-player
//! deduction notebook.
//!
//! ## Design Principles
//!
//! 1. **Explicit Context**: all state lives in a [`GameSession`] owned by the
//!    caller. There are no globals.
//!
//! 2. **Atomic Actions**: every action either applies completely or is
//!    rejected with a [`GameError`] and leaves state untouched.
//!
//! 3. **Reproducible**: dice, seating and the deal all draw from one seeded
//!    [`GameRng`], so a seed replays a game exactly.
//!
//! 4. **Honest Notebooks**: a [`DetectiveNotebook`] learns only what its
//!    owner could see, and derives the rest by propagation.
//!
//! ## Modules
//!
//! - `core`: seats, actions, configuration, errors, RNG
//! - `cards`: the 21 cards, the envelope and the deal
//! - `board`: the grid, doors, secret passages and start squares
//! - `movement`: dice, step validation and BFS room reachability
//! - `game`: players, suggestions, events and the turn state machine
//! - `notebook`: the deduction grid
//! - `rules`: game results and the name-addressed session API
//!
//! ## Example
//!
//! ```
//! use clue_engine::{GameConfig, GameSession};
//!
//! let mut session = GameSession::new(GameConfig::new(7));
//! session.setup(&["Ann", "Bob", "Cat"]).unwrap();
//!
//! let first = session.current_player().unwrap().to_string();
//! let roll = session.roll_dice(&first).unwrap();
//! assert!((2..=12).contains(&roll.budget()));
//! ```

pub mod board;
pub mod cards;
pub mod core;
pub mod game;
pub mod movement;
pub mod notebook;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, ErrorKind, GameConfig, GameError, GameRng, GameRngState, PlayerId, PlayerMap,
};

pub use crate::board::{Board, BoardError, CellType, Position};

pub use crate::cards::{Card, Category, Deal, Room, Solution, Suspect, Weapon};

pub use crate::movement::{DiceRoll, MoveError, MoveOption, MovementEngine, ReachableRoom, RoomMove};

pub use crate::game::{AccusationOutcome, GameEvent, GameState, Player, RollOutcome, Suggestion, TurnPhase};

pub use crate::notebook::{CardStatus, DetectiveNotebook, NotebookError, Owner, PossibleSolution};

pub use crate::rules::{AccusationReply, ActionOutcome, GameResult, GameSession, SuggestionReply};
