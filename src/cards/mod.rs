//! Card system: the fixed enumerations, the envelope and the deal.
//!
//! ## Key Types
//!
//! - `Suspect`, `Weapon`, `Room`: the fixed name sets
//! - `Card`: one of the 21 cards, identified by (category, name)
//! - `Solution`: the envelope, one card per category
//! - `Deal`: the envelope plus the per-seat hands

pub mod deck;
pub mod definition;

pub use deck::{Deal, Solution};
pub use definition::{Card, Category, Room, Suspect, UnknownCardName, Weapon, CARD_COUNT};
