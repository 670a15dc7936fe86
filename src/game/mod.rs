//! Game state machine and the mutable entities it owns.
//!
//! ## Key Types
//!
//! - `Player`: hand, token location and per-turn flags
//! - `Suggestion`: a suggestion with its disproof
//! - `GameState`: seats, envelope, RNG, turn sequencing and rule checks
//! - `GameEvent`: what happened, for the notebooks

pub mod event;
pub mod player;
pub mod state;
pub mod suggestion;

pub use event::{Clue, GameEvent};
pub use player::{Location, Player};
pub use state::{AccusationOutcome, GameState, RollOutcome, TurnPhase};
pub use suggestion::{Disproof, Suggestion};
