//! The game state machine.
//!
//! `GameState` owns every entity of one game: the seated players, the
//! envelope, the RNG and the histories. Each public mutator validates the
//! request completely before touching state, so a rejected action leaves the
//! game exactly as it was.
//!
//! Events are queued as actions resolve and collected with
//! [`GameState::drain_events`].

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{debug, info};

use super::event::{Clue, GameEvent};
use super::player::{Location, Player};
use super::suggestion::{Disproof, Suggestion};
use crate::board::{Board, Position};
use crate::cards::{Card, Deal, Room, Solution, Suspect, Weapon, CARD_COUNT};
use crate::core::{Action, ActionRecord, GameConfig, GameError, GameRng, GameRngState, PlayerId, PlayerMap};
use crate::movement::{DiceRoll, MoveOption, MovementEngine, ReachableRoom, RoomMove};
use crate::rules::GameResult;

/// Where the current player is within their turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Nothing done yet (a player pulled into a room may still suggest).
    AwaitingRoll,
    /// Dice rolled; steps may remain.
    Moving,
    /// Movement ended inside a room.
    InRoom,
    /// A suggestion was made; only accusing and ending the turn remain.
    Suggested,
}

/// Result of a dice roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub roll: DiceRoll,
    /// One clue per magnifying glass rolled.
    pub clues: Vec<Clue>,
}

impl RollOutcome {
    #[must_use]
    pub fn budget(&self) -> u8 {
        self.roll.budget()
    }
}

/// How an accusation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccusationOutcome {
    /// The accuser named the solution and won.
    Won,
    /// The accuser was wrong and is out. `winner` is set when only one
    /// active player remains.
    Eliminated { winner: Option<PlayerId> },
}

#[derive(Clone, Debug)]
pub struct GameState {
    board: Arc<Board>,
    config: GameConfig,
    players: PlayerMap<Player>,
    solution: Solution,
    rng: GameRng,
    current: PlayerId,
    turn: u32,
    phase: TurnPhase,
    sequence: u32,
    suggestions: im::Vector<Suggestion>,
    history: im::Vector<ActionRecord>,
    events: Vec<GameEvent>,
    result: Option<GameResult>,
}

impl GameState {
    /// Seat the named players and deal a fresh game.
    ///
    /// Characters are assigned at random. The holder of
    /// `config.first_character` moves to the front of the table; the others
    /// keep their relative order.
    pub fn setup<S: AsRef<str>>(names: &[S], config: GameConfig, board: Arc<Board>) -> Result<Self, GameError> {
        validate_names(names)?;

        let mut rng = GameRng::new(config.seed);
        let mut characters: Vec<Suspect> = Suspect::iter().collect();
        rng.shuffle(&mut characters);

        let mut seats: Vec<(String, Suspect)> = names
            .iter()
            .zip(characters)
            .map(|(name, character)| (name.as_ref().to_string(), character))
            .collect();
        if let Some(first) = seats.iter().position(|(_, c)| *c == config.first_character) {
            let seat = seats.remove(first);
            seats.insert(0, seat);
        }

        let deal = Deal::new(seats.len(), &mut rng);
        Self::assemble(seats, deal, config, board, rng)
    }

    /// Build a game from a fixed seating and deal, for scripted scenarios
    /// and replays. Seat order is the order of `seats`.
    pub fn from_deal(
        seats: Vec<(String, Suspect)>,
        deal: Deal,
        config: GameConfig,
        board: Arc<Board>,
    ) -> Result<Self, GameError> {
        let names: Vec<&str> = seats.iter().map(|(name, _)| name.as_str()).collect();
        validate_names(&names)?;
        let characters: FxHashSet<Suspect> = seats.iter().map(|(_, c)| *c).collect();
        if characters.len() != seats.len() {
            return Err(GameError::InvalidSetup("characters must be unique per player"));
        }
        if deal.hands.len() != seats.len() {
            return Err(GameError::InvalidSetup("one hand per seat"));
        }
        let mut dealt: Vec<Card> = deal.hands.iter().flatten().copied().collect();
        dealt.extend(deal.solution.cards());
        dealt.sort_unstable();
        dealt.dedup();
        if dealt.len() != CARD_COUNT || deal.hands.iter().map(Vec::len).sum::<usize>() + 3 != CARD_COUNT {
            return Err(GameError::InvalidSetup("hands and envelope must hold every card exactly once"));
        }

        let rng = GameRng::new(config.seed);
        Self::assemble(seats, deal, config, board, rng)
    }

    fn assemble(
        seats: Vec<(String, Suspect)>,
        deal: Deal,
        config: GameConfig,
        board: Arc<Board>,
        rng: GameRng,
    ) -> Result<Self, GameError> {
        let players: Vec<Player> = seats
            .into_iter()
            .zip(deal.hands)
            .map(|((name, character), hand)| {
                let start = board.start_square(character);
                Player::new(name, character, hand, start)
            })
            .collect();
        let mut players = PlayerMap::from_vec(players);

        let events: Vec<GameEvent> = players
            .iter()
            .map(|(id, p)| GameEvent::CardsDealt {
                player: id,
                hand: p.hand.clone(),
            })
            .collect();

        let current = PlayerId::new(0);
        players[current].begin_turn();

        info!(
            players = players.player_count(),
            first = %players[current].name,
            seed = config.seed,
            "game set up"
        );

        Ok(Self {
            board,
            config,
            players,
            solution: deal.solution,
            rng,
            current,
            turn: 1,
            phase: TurnPhase::AwaitingRoll,
            sequence: 0,
            suggestions: im::Vector::new(),
            history: im::Vector::new(),
            events,
            result: None,
        })
    }

    // === Queries ===

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Seat of the player with exactly this name.
    pub fn player_id(&self, name: &str) -> Result<PlayerId, GameError> {
        self.players
            .position(|p| p.name == name)
            .ok_or_else(|| GameError::UnknownPlayer(name.to_string()))
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn suggestions(&self) -> &im::Vector<Suggestion> {
        &self.suggestions
    }

    #[must_use]
    pub fn history(&self) -> &im::Vector<ActionRecord> {
        &self.history
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self.result {
            Some(GameResult::Winner(p)) => Some(p),
            _ => None,
        }
    }

    /// Active (not eliminated) seats, in seat order.
    pub fn active_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().filter(|(_, p)| p.is_active).map(|(id, _)| id)
    }

    /// The envelope. For tests and debugging; players learn it only by deduction.
    #[must_use]
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Cells held by tokens other than `player`.
    #[must_use]
    pub fn occupied_cells(&self, player: PlayerId) -> FxHashSet<Position> {
        self.players
            .iter()
            .filter(|(id, _)| *id != player)
            .filter_map(|(_, p)| p.hallway_position())
            .collect()
    }

    /// Where every token stands.
    #[must_use]
    pub fn token_locations(&self) -> FxHashMap<Suspect, Location> {
        self.players.values().map(|p| (p.character, p.location)).collect()
    }

    /// Legal single steps for `player`. Empty unless it is their turn.
    #[must_use]
    pub fn available_moves(&self, player: PlayerId) -> Vec<MoveOption> {
        if !self.may_move(player) {
            return Vec::new();
        }
        let occupied = self.occupied_cells(player);
        MovementEngine::new(&self.board).available_moves(&self.players[player], &occupied)
    }

    /// Rooms `player` can reach this turn. Empty unless it is their turn.
    #[must_use]
    pub fn reachable_rooms(&self, player: PlayerId) -> Vec<ReachableRoom> {
        if !self.may_move(player) {
            return Vec::new();
        }
        let occupied = self.occupied_cells(player);
        MovementEngine::new(&self.board).reachable_rooms(&self.players[player], &occupied)
    }

    fn may_move(&self, player: PlayerId) -> bool {
        self.result.is_none()
            && player == self.current
            && self.phase != TurnPhase::Suggested
            && self.players.get(player).is_some_and(|p| p.is_active)
    }

    // === Actions ===

    /// Roll both dice and start moving. Each magnifying glass reveals a clue.
    pub fn roll_dice(&mut self, player: PlayerId) -> Result<RollOutcome, GameError> {
        self.check_actor(player)?;
        if self.phase == TurnPhase::Suggested {
            return Err(GameError::AlreadySuggested);
        }
        if self.players[player].has_rolled {
            return Err(GameError::AlreadyRolled);
        }

        let roll = DiceRoll::roll(&mut self.rng);
        self.players[player].start_moving(roll.budget());
        self.phase = TurnPhase::Moving;

        let clues: Vec<Clue> = (0..roll.clue_count())
            .filter_map(|_| self.draw_clue(player))
            .collect();
        for &clue in &clues {
            self.events.push(GameEvent::ClueRevealed { player, clue });
        }

        info!(
            player = %self.players[player].name,
            die1 = roll.die1,
            die2 = roll.die2,
            clues = clues.len(),
            "rolled"
        );
        self.record(player, Action::RollDice);
        Ok(RollOutcome { roll, clues })
    }

    /// A random card that is neither in the envelope nor in `player`'s hand.
    fn draw_clue(&mut self, player: PlayerId) -> Option<Clue> {
        let candidates: Vec<Card> = Card::all()
            .filter(|&c| !self.solution.contains(c) && !self.players[player].holds(c))
            .collect();
        let card = *self.rng.choose(&candidates)?;
        let holder = self.players.position(|p| p.holds(card))?;
        debug!(player = %self.players[player].name, card = %card, "clue");
        Some(Clue { card, holder })
    }

    /// Take a single step (or leave a room through a door).
    pub fn step(&mut self, player: PlayerId, cell: Position) -> Result<Option<Room>, GameError> {
        self.check_mover(player)?;
        let occupied = self.occupied_cells(player);
        let entered = MovementEngine::new(&self.board).step(&mut self.players[player], cell, &occupied)?;
        self.phase = if entered.is_some() {
            TurnPhase::InRoom
        } else {
            TurnPhase::Moving
        };
        self.record(player, Action::Step(cell));
        Ok(entered)
    }

    /// Walk (or take the passage) into `room`, all or nothing.
    pub fn move_to_room(&mut self, player: PlayerId, room: Room) -> Result<RoomMove, GameError> {
        self.check_actor(player)?;
        if self.phase == TurnPhase::Suggested {
            return Err(GameError::AlreadySuggested);
        }
        let mover = &self.players[player];
        let by_passage = !mover.entered_room_this_turn
            && mover.current_room().and_then(|r| self.board.secret_passage(r)) == Some(room);
        if !by_passage && !mover.has_rolled {
            return Err(GameError::NotRolled);
        }

        let occupied = self.occupied_cells(player);
        let moved = MovementEngine::new(&self.board).move_to_room(&mut self.players[player], room, &occupied)?;
        if moved.via_passage {
            self.players[player].has_rolled = true;
        }
        self.phase = TurnPhase::InRoom;

        info!(player = %self.players[player].name, room = %room, steps = moved.steps, "moved to room");
        self.record(player, Action::MoveToRoom(room));
        Ok(moved)
    }

    /// Take the current room's secret passage instead of rolling or walking.
    pub fn use_secret_passage(&mut self, player: PlayerId) -> Result<Room, GameError> {
        self.check_actor(player)?;
        if self.phase == TurnPhase::Suggested {
            return Err(GameError::AlreadySuggested);
        }
        let room = MovementEngine::new(&self.board).use_secret_passage(&mut self.players[player])?;
        self.players[player].has_rolled = true;
        self.phase = TurnPhase::InRoom;
        self.record(player, Action::SecretPassage);
        Ok(room)
    }

    /// Suggest `suspect` with `weapon` in the suggester's current room.
    ///
    /// The named suspect's token is pulled into the room. Disproof is asked
    /// of every other seat clockwise, eliminated players included, and stops
    /// at the first who holds any named card; they show one of them.
    pub fn suggest(&mut self, player: PlayerId, suspect: Suspect, weapon: Weapon) -> Result<Suggestion, GameError> {
        self.check_actor(player)?;
        if self.phase == TurnPhase::Suggested {
            return Err(GameError::AlreadySuggested);
        }
        let room = self.check_can_suggest(player)?;

        if let Some(pulled) = self
            .players
            .position(|p| p.character == suspect)
            .filter(|&id| id != player)
        {
            self.players[pulled].pulled_into(room);
            debug!(player = %self.players[pulled].name, room = %room, "pulled into room");
        }

        let mut passed = Vec::new();
        let mut disproof = None;
        for other in player.others_clockwise(self.player_count()) {
            let matching = self.players[other].matching_cards(suspect, weapon, room);
            if let Some(&card) = self.rng.choose(matching.as_slice()) {
                disproof = Some(Disproof { disprover: other, card });
                break;
            }
            passed.push(other);
        }

        let suggester = &mut self.players[player];
        suggester.last_suggestion_room = Some(room);
        suggester.moved_since_suggestion = false;
        suggester.moved_by_suggestion = false;

        let suggestion = Suggestion {
            turn: self.turn,
            suggester: player,
            suspect,
            weapon,
            room,
            disproof,
            passed,
        };
        info!(
            player = %self.players[player].name,
            suspect = %suspect,
            weapon = %weapon,
            room = %room,
            disproved = suggestion.is_disproved(),
            "suggestion"
        );

        self.phase = TurnPhase::Suggested;
        self.suggestions.push_back(suggestion.clone());
        self.events.push(GameEvent::SuggestionResolved(suggestion.clone()));
        self.record(player, Action::Suggest { suspect, weapon });
        Ok(suggestion)
    }

    fn check_can_suggest(&self, player: PlayerId) -> Result<Room, GameError> {
        let p = &self.players[player];
        let room = p.current_room().ok_or(GameError::NotInRoom)?;
        if p.last_suggestion_room == Some(room) && !p.moved_since_suggestion && !p.moved_by_suggestion {
            return Err(GameError::RepeatedSuggestion(room));
        }
        if !p.entered_room_this_turn && !p.moved_by_suggestion {
            return Err(GameError::MustEnterRoom(room));
        }
        Ok(room)
    }

    /// Accuse. A correct accusation wins; a wrong one eliminates the accuser
    /// and passes the turn, unless only one active player is left, who wins.
    pub fn accuse(
        &mut self,
        player: PlayerId,
        suspect: Suspect,
        weapon: Weapon,
        room: Room,
    ) -> Result<AccusationOutcome, GameError> {
        self.check_can_accuse(player)?;

        self.players[player].has_accused_this_turn = true;
        let correct = self.solution.matches(suspect, weapon, room);
        self.record(player, Action::Accuse { suspect, weapon, room });
        self.events.push(GameEvent::AccusationMade {
            player,
            suspect,
            weapon,
            room,
            correct,
        });
        info!(
            player = %self.players[player].name,
            suspect = %suspect,
            weapon = %weapon,
            room = %room,
            correct,
            "accusation"
        );

        if correct {
            self.finish(GameResult::Winner(player));
            return Ok(AccusationOutcome::Won);
        }

        self.players[player].is_active = false;
        info!(player = %self.players[player].name, "eliminated");

        let active: Vec<PlayerId> = self.active_players().collect();
        if let [last] = active.as_slice() {
            let winner = *last;
            self.finish(GameResult::Winner(winner));
            return Ok(AccusationOutcome::Eliminated { winner: Some(winner) });
        }

        self.advance_turn();
        Ok(AccusationOutcome::Eliminated { winner: None })
    }

    /// End the current player's turn.
    pub fn end_turn(&mut self, player: PlayerId) -> Result<(), GameError> {
        self.check_actor(player)?;
        self.record(player, Action::EndTurn);
        self.advance_turn();
        Ok(())
    }

    // === Internals ===

    fn advance_turn(&mut self) {
        let count = self.player_count();
        self.players[self.current].has_accused_this_turn = false;

        let mut next = self.current;
        for _ in 0..count {
            next = next.next(count);
            if self.players[next].is_active {
                break;
            }
        }

        self.current = next;
        self.players[next].begin_turn();
        self.turn += 1;
        self.phase = TurnPhase::AwaitingRoll;
        self.sequence = 0;

        debug!(player = %self.players[next].name, turn = self.turn, "turn advanced");
        self.events.push(GameEvent::TurnAdvanced {
            player: next,
            turn: self.turn,
        });

        if self.config.max_turns.is_some_and(|max| self.turn > max) {
            self.finish(GameResult::Draw);
        }
    }

    fn finish(&mut self, result: GameResult) {
        info!(result = ?result, turn = self.turn, "game over");
        self.events.push(GameEvent::GameEnded(result.clone()));
        self.result = Some(result);
    }

    fn record(&mut self, player: PlayerId, action: Action) {
        self.history
            .push_back(ActionRecord::new(player, action, self.turn, self.sequence));
        self.sequence += 1;
    }

    /// The game is running, `player` exists, is active and holds the turn.
    fn check_actor(&self, player: PlayerId) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameOver);
        }
        let actor = self
            .players
            .get(player)
            .ok_or_else(|| GameError::UnknownPlayer(player.to_string()))?;
        if !actor.is_active {
            return Err(GameError::PlayerEliminated(actor.name.clone()));
        }
        if player != self.current {
            return Err(GameError::NotYourTurn {
                player: actor.name.clone(),
                current: self.players[self.current].name.clone(),
            });
        }
        Ok(())
    }

    /// Whether `player` may accuse right now. Checked before any notebook
    /// gating so turn errors take precedence.
    pub fn check_can_accuse(&self, player: PlayerId) -> Result<(), GameError> {
        self.check_actor(player)?;
        if self.players[player].has_accused_this_turn {
            return Err(GameError::AlreadyAccused);
        }
        Ok(())
    }

    fn check_mover(&self, player: PlayerId) -> Result<(), GameError> {
        self.check_actor(player)?;
        if self.phase == TurnPhase::Suggested {
            return Err(GameError::AlreadySuggested);
        }
        if !self.players[player].has_rolled {
            return Err(GameError::NotRolled);
        }
        Ok(())
    }
}

fn validate_names<S: AsRef<str>>(names: &[S]) -> Result<(), GameError> {
    if !GameConfig::accepts_player_count(names.len()) {
        return Err(GameError::InvalidPlayerCount {
            found: names.len(),
            min: crate::core::MIN_PLAYERS,
            max: crate::core::MAX_PLAYERS,
        });
    }
    let mut seen = FxHashSet::default();
    for name in names {
        if !seen.insert(name.as_ref()) {
            return Err(GameError::DuplicatePlayerName(name.as_ref().to_string()));
        }
    }
    Ok(())
}
