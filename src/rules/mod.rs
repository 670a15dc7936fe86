//! The session layer: one explicit context object per table.
//!
//! `GameSession` owns the game state and every player's notebook. Callers
//! address players by name and cards by (case-insensitive) name; the
//! session resolves them, runs the action against `GameState`, then feeds
//! the resulting events to the notebooks, each seeing only what its owner
//! is allowed to see.

pub mod result;
pub mod session;

pub use result::GameResult;
pub use session::{ActionOutcome, AccusationReply, GameSession, SuggestionReply};
