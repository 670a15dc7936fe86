//! Inputs to and answers from the notebook.

use serde::{Deserialize, Serialize};

use super::status::{CardStatus, Owner};
use crate::cards::{Card, Category, Room, Solution, Suspect, Weapon};
use crate::core::PlayerId;

/// A suggestion as one notebook owner witnessed it.
///
/// `shown` is only set in the suggester's own report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionReport {
    pub turn: u32,
    pub suggester: PlayerId,
    pub suspect: Suspect,
    pub weapon: Weapon,
    pub room: Room,
    pub disprover: Option<PlayerId>,
    pub shown: Option<Card>,
    pub passed: Vec<PlayerId>,
}

impl SuggestionReport {
    #[must_use]
    pub fn cards(&self) -> [Card; 3] {
        [
            Card::Suspect(self.suspect),
            Card::Weapon(self.weapon),
            Card::Room(self.room),
        ]
    }
}

impl std::fmt::Display for SuggestionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Turn {}: {} suggested {} with the {} in the {}",
            self.turn, self.suggester, self.suspect, self.weapon, self.room
        )?;
        match (self.disprover, self.shown) {
            (Some(d), Some(card)) => write!(f, "; disproved by {d} (showed {card})")?,
            (Some(d), None) => write!(f, "; disproved by {d}")?,
            (None, _) => write!(f, "; not disproved")?,
        }
        if !self.passed.is_empty() {
            let passed: Vec<String> = self.passed.iter().map(ToString::to_string).collect();
            write!(f, "; passed: {}", passed.join(", "))?;
        }
        Ok(())
    }
}

/// One line of the deduction log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEntry {
    /// Set directly by a mark or an observed event.
    Marked { card: Card, owner: Owner, status: CardStatus },
    /// Derived by propagation.
    Deduced { card: Card, owner: Owner, status: CardStatus },
    Suggestion { number: usize, report: SuggestionReport },
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogEntry::Marked { card, owner, status } => write!(f, "marked: {owner} {status} {card}"),
            LogEntry::Deduced {
                card,
                owner: Owner::Envelope,
                status: CardStatus::Has,
            } => write!(f, "deduced: {card} is in the envelope"),
            LogEntry::Deduced { card, owner, status } => write!(f, "deduced: {owner} {status} {card}"),
            LogEntry::Suggestion { number, report } => write!(f, "suggestion #{number}: {report}"),
        }
    }
}

/// A named card the notebook already has an answer for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardIssue {
    /// A player is known to hold it, so it is not in the envelope.
    HeldBy { card: Card, holder: PlayerId },
    /// Ruled out of the envelope without a known holder.
    ExcludedFromEnvelope(Card),
}

impl CardIssue {
    #[must_use]
    pub fn card(&self) -> Card {
        match self {
            CardIssue::HeldBy { card, .. } | CardIssue::ExcludedFromEnvelope(card) => *card,
        }
    }
}

impl std::fmt::Display for CardIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardIssue::HeldBy { card, holder } => write!(f, "{card} is held by {holder}"),
            CardIssue::ExcludedFromEnvelope(card) => write!(f, "{card} is not in the envelope"),
        }
    }
}

/// Envelope candidates for one category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCandidates {
    pub category: Category,
    /// The card known to be in the envelope, if deduced.
    pub confirmed: Option<Card>,
    /// Cards that may still be in the envelope. Only the confirmed card
    /// once there is one.
    pub candidates: Vec<Card>,
}

impl CategoryCandidates {
    /// The single remaining candidate, confirmed or by elimination.
    #[must_use]
    pub fn sole(&self) -> Option<Card> {
        match self.candidates.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

/// What could still be in the envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossibleSolution {
    pub suspects: CategoryCandidates,
    pub weapons: CategoryCandidates,
    pub rooms: CategoryCandidates,
}

impl PossibleSolution {
    #[must_use]
    pub fn category(&self, category: Category) -> &CategoryCandidates {
        match category {
            Category::Suspect => &self.suspects,
            Category::Weapon => &self.weapons,
            Category::Room => &self.rooms,
        }
    }

    /// Every category is down to exactly one candidate.
    #[must_use]
    pub fn is_accusable(&self) -> bool {
        self.accusation().is_some()
    }

    /// The sanctioned accusation, if every category has one candidate.
    #[must_use]
    pub fn accusation(&self) -> Option<Solution> {
        Some(Solution::new(
            self.suspects.sole()?.as_suspect()?,
            self.weapons.sole()?.as_weapon()?,
            self.rooms.sole()?.as_room()?,
        ))
    }
}

impl std::fmt::Display for PossibleSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in [&self.suspects, &self.weapons, &self.rooms] {
            match (c.confirmed, c.sole()) {
                (Some(card), _) => writeln!(f, "{}: {card} (confirmed)", c.category)?,
                (None, Some(card)) => writeln!(f, "{}: {card} (only possibility)", c.category)?,
                (None, None) => {
                    let names: Vec<&str> = c.candidates.iter().map(|card| card.name()).collect();
                    writeln!(f, "{}: {} possibilities - {}", c.category, names.len(), names.join(", "))?;
                }
            }
        }
        Ok(())
    }
}

/// Verdict on a proposed accusation. Valid when there are no issues.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccusationCheck {
    pub issues: Vec<CardIssue>,
}

impl AccusationCheck {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Advisory verdict on a proposed suggestion. Never blocks anything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionCheck {
    /// Named cards that are already resolved and so reveal nothing new.
    pub wasted: Vec<CardIssue>,
    /// Unresolved suspects worth asking about instead.
    pub better_suspects: Vec<Suspect>,
    /// Unresolved weapons worth asking about instead.
    pub better_weapons: Vec<Weapon>,
}

impl SuggestionCheck {
    #[must_use]
    pub fn is_useful(&self) -> bool {
        self.wasted.is_empty()
    }
}

/// The first unresolved suspect and weapon, in enumeration order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicSuggestion {
    pub suspect: Option<Suspect>,
    pub weapon: Option<Weapon>,
}
