//! The fixed card enumerations.
//!
//! Clue has exactly 21 cards: 6 suspects, 6 weapons and 9 rooms. A `Card`
//! is identified by its category and name, which the enum representation
//! gives us for free: equality and hashing are structural.
//!
//! Names parse case-insensitively:
//!
//! ```
//! use clue_engine::cards::{Card, Room, Suspect};
//!
//! assert_eq!("miss scarlet".parse::<Suspect>().unwrap(), Suspect::MissScarlet);
//! assert_eq!(Card::parse("BILLIARD ROOM").unwrap(), Card::Room(Room::BilliardRoom));
//! ```

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Card category.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Suspect,
    Weapon,
    Room,
}

/// The six suspects. Each is also a playable character.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Suspect {
    #[strum(to_string = "Miss Scarlet")]
    MissScarlet,
    #[strum(to_string = "Colonel Mustard")]
    ColonelMustard,
    #[strum(to_string = "Mrs. White")]
    MrsWhite,
    #[strum(to_string = "Mr. Green")]
    MrGreen,
    #[strum(to_string = "Mrs. Peacock")]
    MrsPeacock,
    #[strum(to_string = "Professor Plum")]
    ProfessorPlum,
}

impl Suspect {
    /// Position of this suspect in the fixed enumeration order.
    #[must_use]
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

/// The six weapons.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Weapon {
    Candlestick,
    Knife,
    #[strum(to_string = "Lead Pipe")]
    LeadPipe,
    Revolver,
    Rope,
    Wrench,
}

/// The nine rooms.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Room {
    Kitchen,
    Ballroom,
    Conservatory,
    #[strum(to_string = "Billiard Room")]
    BilliardRoom,
    Library,
    Study,
    Hall,
    Lounge,
    #[strum(to_string = "Dining Room")]
    DiningRoom,
}

/// Total number of cards in a game.
pub const CARD_COUNT: usize = Suspect::COUNT + Weapon::COUNT + Room::COUNT;

/// A name that matches no card of the requested category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {} '{name}'", category_label(.category))]
pub struct UnknownCardName {
    /// The category searched, or `None` when every category was searched.
    pub category: Option<Category>,
    pub name: String,
}

fn category_label(category: &Option<Category>) -> String {
    category.map_or_else(|| "card".to_string(), |c| c.to_string())
}

/// One of the 21 cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Card {
    Suspect(Suspect),
    Weapon(Weapon),
    Room(Room),
}

impl Card {
    /// The card's category.
    #[must_use]
    pub fn category(self) -> Category {
        match self {
            Card::Suspect(_) => Category::Suspect,
            Card::Weapon(_) => Category::Weapon,
            Card::Room(_) => Category::Room,
        }
    }

    /// The card's printed name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Card::Suspect(s) => s.into(),
            Card::Weapon(w) => w.into(),
            Card::Room(r) => r.into(),
        }
    }

    #[must_use]
    pub fn as_suspect(self) -> Option<Suspect> {
        match self {
            Card::Suspect(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_weapon(self) -> Option<Weapon> {
        match self {
            Card::Weapon(w) => Some(w),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_room(self) -> Option<Room> {
        match self {
            Card::Room(r) => Some(r),
            _ => None,
        }
    }

    /// All 21 cards: suspects, then weapons, then rooms.
    pub fn all() -> impl Iterator<Item = Card> {
        Suspect::iter()
            .map(Card::Suspect)
            .chain(Weapon::iter().map(Card::Weapon))
            .chain(Room::iter().map(Card::Room))
    }

    /// All cards of one category, in enumeration order.
    pub fn of_category(category: Category) -> impl Iterator<Item = Card> {
        Card::all().filter(move |c| c.category() == category)
    }

    /// Parse a card name from any category, case-insensitively.
    ///
    /// Card names are unique across categories, so this is unambiguous.
    pub fn parse(name: &str) -> Result<Card, UnknownCardName> {
        let trimmed = name.trim();
        if let Ok(s) = trimmed.parse::<Suspect>() {
            return Ok(Card::Suspect(s));
        }
        if let Ok(w) = trimmed.parse::<Weapon>() {
            return Ok(Card::Weapon(w));
        }
        if let Ok(r) = trimmed.parse::<Room>() {
            return Ok(Card::Room(r));
        }
        Err(UnknownCardName {
            category: None,
            name: name.to_string(),
        })
    }

    /// Parse a card name restricted to one category.
    pub fn parse_in(category: Category, name: &str) -> Result<Card, UnknownCardName> {
        let unknown = || UnknownCardName {
            category: Some(category),
            name: name.to_string(),
        };
        let trimmed = name.trim();
        match category {
            Category::Suspect => trimmed.parse().map(Card::Suspect).map_err(|_| unknown()),
            Category::Weapon => trimmed.parse().map(Card::Weapon).map_err(|_| unknown()),
            Category::Room => trimmed.parse().map(Card::Room).map_err(|_| unknown()),
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Suspect> for Card {
    fn from(s: Suspect) -> Self {
        Card::Suspect(s)
    }
}

impl From<Weapon> for Card {
    fn from(w: Weapon) -> Self {
        Card::Weapon(w)
    }
}

impl From<Room> for Card {
    fn from(r: Room) -> Self {
        Card::Room(r)
    }
}
