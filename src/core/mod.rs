//! Core engine types: seats, RNG, configuration, actions and errors.
//!
//! Nothing here knows about rooms or movement rules; the game and session
//! layers build on these pieces.

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use action::{Action, ActionRecord};
pub use config::{GameConfig, MAX_PLAYERS, MIN_PLAYERS};
pub use error::{ErrorKind, GameError};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState, DIE_FACES};
