//! The per-player deduction grid.
//!
//! A notebook holds one cell per (card, owner) pair, where the owners are the
//! seats plus the envelope. Every mutation is applied to a draft copy of the
//! grid, propagated to a fixed point and only then committed, so a rejected
//! mark never leaves a half-updated grid behind.
//!
//! Propagation has exactly two rules:
//!
//! - every seat lacks a card, so the envelope has it;
//! - the envelope has a card, so no seat does.
//!
//! The notebook never sees the solution. Everything it knows comes from the
//! owner's hand, the suggestions the owner witnessed and the public clues.

use std::iter;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::report::{
    AccusationCheck, CardIssue, CategoryCandidates, LogEntry, PossibleSolution, StrategicSuggestion,
    SuggestionCheck, SuggestionReport,
};
use super::status::{CardStatus, NotebookError, Owner};
use crate::cards::{Card, Category, Room, Solution, Suspect, Weapon};
use crate::core::{PlayerId, PlayerMap};
use crate::game::{Clue, GameEvent};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Row {
    players: PlayerMap<CardStatus>,
    envelope: CardStatus,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Grid {
    player_count: usize,
    rows: FxHashMap<Card, Row>,
}

impl Grid {
    fn new(player_count: usize) -> Self {
        let rows = Card::all()
            .map(|card| {
                let row = Row {
                    players: PlayerMap::with_value(player_count, CardStatus::Unknown),
                    envelope: CardStatus::Unknown,
                };
                (card, row)
            })
            .collect();
        Self { player_count, rows }
    }

    fn row(&self, card: Card) -> &Row {
        &self.rows[&card]
    }

    fn get(&self, card: Card, owner: Owner) -> CardStatus {
        let row = self.row(card);
        match owner {
            Owner::Player(p) => row.players[p],
            Owner::Envelope => row.envelope,
        }
    }

    fn set(&mut self, card: Card, owner: Owner, status: CardStatus) {
        if let Some(row) = self.rows.get_mut(&card) {
            match owner {
                Owner::Player(p) => row.players[p] = status,
                Owner::Envelope => row.envelope = status,
            }
        }
    }

    fn owners(&self) -> impl Iterator<Item = Owner> {
        PlayerId::all(self.player_count)
            .map(Owner::Player)
            .chain(iter::once(Owner::Envelope))
    }

    /// The owner marked `Has` for `card`, if any.
    fn holder(&self, card: Card) -> Option<Owner> {
        self.owners().find(|&o| self.get(card, o) == CardStatus::Has)
    }

    /// The card of `category` the envelope is known to hold.
    fn envelope_card(&self, category: Category) -> Option<Card> {
        Card::of_category(category).find(|&c| self.get(c, Owner::Envelope) == CardStatus::Has)
    }

    fn held_by_player(&self, card: Card) -> Option<PlayerId> {
        match self.holder(card) {
            Some(Owner::Player(p)) => Some(p),
            _ => None,
        }
    }

    fn issue(&self, card: Card) -> Option<CardIssue> {
        if let Some(holder) = self.held_by_player(card) {
            Some(CardIssue::HeldBy { card, holder })
        } else if self.get(card, Owner::Envelope) == CardStatus::DoesNotHave
            || self.envelope_card(card.category()).is_some_and(|other| other != card)
        {
            Some(CardIssue::ExcludedFromEnvelope(card))
        } else {
            None
        }
    }

    /// Nobody is known to hold it and it is not ruled out of the envelope.
    fn is_open(&self, card: Card) -> bool {
        self.holder(card).is_none() && self.get(card, Owner::Envelope) != CardStatus::DoesNotHave
    }
}

/// Pending edits against a copy of the grid.
struct Draft {
    grid: Grid,
    entries: Vec<LogEntry>,
    changed: usize,
}

impl Draft {
    fn set(
        &mut self,
        card: Card,
        owner: Owner,
        status: CardStatus,
        deduced: bool,
    ) -> Result<bool, NotebookError> {
        let current = self.grid.get(card, owner);
        if current == status {
            return Ok(false);
        }
        if current.is_known() {
            return Err(NotebookError::Contradiction {
                card,
                owner,
                current,
                attempted: status,
            });
        }
        self.grid.set(card, owner, status);
        self.changed += 1;
        if deduced {
            trace!(%card, %owner, %status, "deduced");
            self.entries.push(LogEntry::Deduced { card, owner, status });
        } else {
            self.entries.push(LogEntry::Marked { card, owner, status });
        }
        Ok(true)
    }

    fn mark_has(&mut self, card: Card, owner: Owner) -> Result<(), NotebookError> {
        if let Some(holder) = self.grid.holder(card).filter(|&h| h != owner) {
            return Err(NotebookError::AlreadyHeld { card, holder });
        }
        if owner == Owner::Envelope {
            if let Some(existing) = self
                .grid
                .envelope_card(card.category())
                .filter(|&c| c != card)
            {
                return Err(NotebookError::EnvelopeConflict { card, existing });
            }
        }
        self.set(card, owner, CardStatus::Has, false)?;
        let others: Vec<Owner> = self.grid.owners().filter(|&o| o != owner).collect();
        for other in others {
            self.set(card, other, CardStatus::DoesNotHave, true)?;
        }
        Ok(())
    }

    fn mark_does_not_have(&mut self, card: Card, owner: Owner) -> Result<(), NotebookError> {
        self.set(card, owner, CardStatus::DoesNotHave, false)?;
        Ok(())
    }

    /// Apply both propagation rules until a full pass changes nothing.
    fn propagate(&mut self) -> Result<(), NotebookError> {
        loop {
            let mut progressed = false;
            for card in Card::all() {
                let row = self.grid.row(card);
                let nobody_has = row.players.values().all(|&s| s == CardStatus::DoesNotHave);
                let envelope = row.envelope;
                match envelope {
                    CardStatus::Unknown if nobody_has => {
                        if let Some(existing) = self.grid.envelope_card(card.category()) {
                            return Err(NotebookError::EnvelopeConflict { card, existing });
                        }
                        progressed |= self.set(card, Owner::Envelope, CardStatus::Has, true)?;
                    }
                    CardStatus::DoesNotHave if nobody_has => {
                        return Err(NotebookError::Contradiction {
                            card,
                            owner: Owner::Envelope,
                            current: CardStatus::DoesNotHave,
                            attempted: CardStatus::Has,
                        });
                    }
                    _ => {}
                }

                if self.grid.get(card, Owner::Envelope) == CardStatus::Has {
                    for p in PlayerId::all(self.grid.player_count) {
                        let owner = Owner::Player(p);
                        if self.grid.get(card, owner) == CardStatus::Unknown {
                            progressed |= self.set(card, owner, CardStatus::DoesNotHave, true)?;
                        }
                    }
                }
            }
            if !progressed {
                return Ok(());
            }
        }
    }
}

/// One player's private deduction grid.
#[derive(Clone, Debug)]
pub struct DetectiveNotebook {
    owner: PlayerId,
    names: PlayerMap<String>,
    grid: Grid,
    suggestions: Vec<SuggestionReport>,
    log: Vec<LogEntry>,
}

impl DetectiveNotebook {
    /// An empty notebook for `owner`, with one column per named seat.
    ///
    /// # Panics
    ///
    /// Panics if `player_names` is empty or `owner` is not one of its seats.
    pub fn new<S: Into<String>>(owner: PlayerId, player_names: impl IntoIterator<Item = S>) -> Self {
        let names = PlayerMap::from_vec(player_names.into_iter().map(Into::into).collect());
        assert!(
            owner.index() < names.player_count(),
            "notebook owner must be one of the seats"
        );
        let grid = Grid::new(names.player_count());
        Self {
            owner,
            names,
            grid,
            suggestions: Vec::new(),
            log: Vec::new(),
        }
    }

    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.names.player_count()
    }

    /// Run `edit` on a draft, propagate, and commit only on success.
    /// Returns the number of cells that changed.
    fn apply(
        &mut self,
        edit: impl FnOnce(&mut Draft) -> Result<(), NotebookError>,
    ) -> Result<usize, NotebookError> {
        let mut draft = Draft {
            grid: self.grid.clone(),
            entries: Vec::new(),
            changed: 0,
        };
        edit(&mut draft)?;
        draft.propagate()?;

        self.grid = draft.grid;
        self.log.extend(draft.entries);
        Ok(draft.changed)
    }

    fn check_seat(&self, player: PlayerId) -> Result<(), NotebookError> {
        if player.index() < self.player_count() {
            Ok(())
        } else {
            Err(NotebookError::UnknownSeat(player))
        }
    }

    fn check_owner(&self, owner: Owner) -> Result<(), NotebookError> {
        match owner {
            Owner::Player(p) => self.check_seat(p),
            Owner::Envelope => Ok(()),
        }
    }

    /// `owner` holds `card`; nobody else does.
    pub fn mark_has(&mut self, card: Card, owner: Owner) -> Result<usize, NotebookError> {
        self.check_owner(owner)?;
        self.apply(|d| d.mark_has(card, owner))
    }

    /// `owner` does not hold `card`. Other cells are untouched, apart from
    /// what propagation derives.
    pub fn mark_does_not_have(&mut self, card: Card, owner: Owner) -> Result<usize, NotebookError> {
        self.check_owner(owner)?;
        self.apply(|d| d.mark_does_not_have(card, owner))
    }

    /// The owner's dealt hand. Every card outside it is absent from the hand.
    pub fn record_hand(&mut self, hand: &[Card]) -> Result<usize, NotebookError> {
        let me = Owner::Player(self.owner);
        let changed = self.apply(|d| {
            for &card in hand {
                d.mark_has(card, me)?;
            }
            for card in Card::all().filter(|c| !hand.contains(c)) {
                d.mark_does_not_have(card, me)?;
            }
            Ok(())
        })?;
        debug!(owner = %self.owner, cards = hand.len(), changed, "hand recorded");
        Ok(changed)
    }

    /// Ingest a witnessed suggestion.
    ///
    /// A shown card is only acted on when this notebook's owner made the
    /// suggestion. Every passer is marked as lacking each named card whose
    /// cell is still unknown.
    pub fn record_suggestion(&mut self, report: &SuggestionReport) -> Result<usize, NotebookError> {
        self.check_seat(report.suggester)?;
        if let Some(d) = report.disprover {
            self.check_seat(d)?;
        }
        for &p in &report.passed {
            self.check_seat(p)?;
        }

        let number = self.suggestions.len() + 1;
        let me = self.owner;
        let changed = self.apply(|d| {
            d.entries.push(LogEntry::Suggestion {
                number,
                report: report.clone(),
            });
            if report.suggester == me {
                if let (Some(disprover), Some(card)) = (report.disprover, report.shown) {
                    d.mark_has(card, Owner::Player(disprover))?;
                }
            }
            for &passer in &report.passed {
                let owner = Owner::Player(passer);
                for card in report.cards() {
                    if d.grid.get(card, owner) == CardStatus::Unknown {
                        d.mark_does_not_have(card, owner)?;
                    }
                }
            }
            Ok(())
        })?;
        self.suggestions.push(report.clone());
        Ok(changed)
    }

    /// A public magnifying-glass clue: the holder has the card.
    pub fn record_clue(&mut self, clue: &Clue) -> Result<usize, NotebookError> {
        self.mark_has(clue.card, Owner::Player(clue.holder))
    }

    /// Feed one game event through this owner's view of it.
    pub fn observe(&mut self, event: &GameEvent) -> Result<usize, NotebookError> {
        match event {
            GameEvent::CardsDealt { player, hand } if *player == self.owner => self.record_hand(hand),
            GameEvent::SuggestionResolved(suggestion) => {
                let report = suggestion.report_for(self.owner);
                self.record_suggestion(&report)
            }
            GameEvent::ClueRevealed { clue, .. } => self.record_clue(clue),
            GameEvent::CardsDealt { .. }
            | GameEvent::AccusationMade { .. }
            | GameEvent::TurnAdvanced { .. }
            | GameEvent::GameEnded(_) => Ok(0),
        }
    }

    /// `None` for a seat outside the table.
    #[must_use]
    pub fn status(&self, card: Card, owner: Owner) -> Option<CardStatus> {
        self.check_owner(owner).ok()?;
        Some(self.grid.get(card, owner))
    }

    #[must_use]
    pub fn owner_of(&self, card: Card) -> Option<Owner> {
        self.grid.holder(card)
    }

    /// Cards of `category` with no known holder, envelope included.
    #[must_use]
    pub fn unknown_cards(&self, category: Category) -> Vec<Card> {
        Card::of_category(category)
            .filter(|&c| self.grid.holder(c).is_none())
            .collect()
    }

    fn candidates(&self, category: Category) -> CategoryCandidates {
        let confirmed = self.grid.envelope_card(category);
        let candidates = match confirmed {
            Some(card) => vec![card],
            None => Card::of_category(category)
                .filter(|&c| self.grid.is_open(c))
                .collect(),
        };
        CategoryCandidates {
            category,
            confirmed,
            candidates,
        }
    }

    #[must_use]
    pub fn possible_solution(&self) -> PossibleSolution {
        PossibleSolution {
            suspects: self.candidates(Category::Suspect),
            weapons: self.candidates(Category::Weapon),
            rooms: self.candidates(Category::Room),
        }
    }

    /// The accusation the grid sanctions, once every category is down to one.
    #[must_use]
    pub fn accusation_recommendation(&self) -> Option<Solution> {
        self.possible_solution().accusation()
    }

    /// Lists every named card the grid already rules out of the envelope.
    #[must_use]
    pub fn validate_accusation(&self, suspect: Suspect, weapon: Weapon, room: Room) -> AccusationCheck {
        let issues = [Card::Suspect(suspect), Card::Weapon(weapon), Card::Room(room)]
            .into_iter()
            .filter_map(|c| self.grid.issue(c))
            .collect();
        AccusationCheck { issues }
    }

    /// Advisory only. Flags named cards that are already resolved and, when
    /// any is flagged, lists the open suspects and weapons.
    #[must_use]
    pub fn validate_suggestion(&self, suspect: Suspect, weapon: Weapon, room: Room) -> SuggestionCheck {
        let wasted: Vec<CardIssue> = [Card::Suspect(suspect), Card::Weapon(weapon), Card::Room(room)]
            .into_iter()
            .filter_map(|c| self.grid.issue(c))
            .collect();
        if wasted.is_empty() {
            return SuggestionCheck {
                wasted,
                better_suspects: Vec::new(),
                better_weapons: Vec::new(),
            };
        }

        let better_suspects = self
            .open_cards(Category::Suspect)
            .filter_map(Card::as_suspect)
            .collect();
        let better_weapons = self
            .open_cards(Category::Weapon)
            .filter_map(Card::as_weapon)
            .collect();

        SuggestionCheck {
            wasted,
            better_suspects,
            better_weapons,
        }
    }

    fn open_cards(&self, category: Category) -> impl Iterator<Item = Card> + '_ {
        Card::of_category(category).filter(move |&c| self.grid.is_open(c))
    }

    #[must_use]
    pub fn strategic_suggestion(&self) -> StrategicSuggestion {
        StrategicSuggestion {
            suspect: self.open_cards(Category::Suspect).find_map(Card::as_suspect),
            weapon: self.open_cards(Category::Weapon).find_map(Card::as_weapon),
        }
    }

    #[must_use]
    pub fn suggestion_log(&self) -> &[SuggestionReport] {
        &self.suggestions
    }

    #[must_use]
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }
}

impl std::fmt::Display for DetectiveNotebook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label_width = Card::all().map(|c| c.name().len()).max().unwrap_or(0);
        let widths: Vec<usize> = self.names.values().map(|n| n.chars().count().max(3)).collect();

        write!(f, "{:label_width$}", "")?;
        for (name, w) in self.names.values().zip(&widths) {
            write!(f, " | {name:^w$}")?;
        }
        writeln!(f, " | Env")?;

        for category in [Category::Suspect, Category::Weapon, Category::Room] {
            writeln!(f, "{}", category.to_string().to_uppercase())?;
            for card in Card::of_category(category) {
                write!(f, "{:label_width$}", card.name())?;
                for (p, w) in PlayerId::all(self.player_count()).zip(&widths) {
                    let symbol = self.grid.get(card, Owner::Player(p)).symbol();
                    write!(f, " | {symbol:^w$}")?;
                }
                writeln!(f, " | {:^3}", self.grid.get(card, Owner::Envelope).symbol())?;
            }
        }
        Ok(())
    }
}
