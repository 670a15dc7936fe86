//! `GameSession`: the name-addressed API over one table.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::{Board, Position};
use crate::cards::{Card, Category, Deal, Room, Suspect, UnknownCardName, Weapon};
use crate::core::{Action, GameConfig, GameError, PlayerId, PlayerMap};
use crate::game::{AccusationOutcome, GameEvent, GameState, RollOutcome, Suggestion};
use crate::movement::{MoveOption, ReachableRoom, RoomMove};
use crate::notebook::{AccusationCheck, DetectiveNotebook, Owner, SuggestionCheck};

/// A resolved suggestion plus the suggester's notebook advice, taken before
/// the result was recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionReply {
    pub suggestion: Suggestion,
    pub check: SuggestionCheck,
}

/// How an accusation ended, with the accuser's notebook verdict on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccusationReply {
    pub outcome: AccusationOutcome,
    pub check: AccusationCheck,
}

/// The result of [`GameSession::apply`], one variant per [`Action`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    Rolled(RollOutcome),
    Stepped { entered: Option<Room> },
    MovedToRoom(RoomMove),
    TookPassage(Room),
    Suggested(SuggestionReply),
    Accused(AccusationReply),
    TurnEnded,
}

#[derive(Clone, Debug)]
struct Table {
    state: GameState,
    notebooks: PlayerMap<DetectiveNotebook>,
}

impl Table {
    fn new(state: GameState) -> Self {
        let names: Vec<String> = state.players().values().map(|p| p.name.clone()).collect();
        let notebooks = PlayerMap::new(state.player_count(), |seat| {
            DetectiveNotebook::new(seat, names.iter().cloned())
        });
        let mut table = Self { state, notebooks };
        table.sync_notebooks();
        table
    }

    /// Feed every queued event to every notebook. A notebook that cannot
    /// take an event keeps its previous grid.
    fn sync_notebooks(&mut self) {
        for event in self.state.drain_events() {
            for (seat, notebook) in self.notebooks.iter_mut() {
                if let Err(err) = notebook.observe(&event) {
                    warn!(%seat, event = event.kind(), %err, "notebook rejected event");
                }
            }
            if let GameEvent::GameEnded(result) = &event {
                debug!(?result, "session saw game end");
            }
        }
    }
}

/// One table: config, board, and (after setup) the game and its notebooks.
///
/// Players are addressed by exact name. Suspects, weapons and rooms are
/// matched case-insensitively.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: GameConfig,
    board: Arc<Board>,
    table: Option<Table>,
}

impl GameSession {
    /// A session on the classic board. No game until [`GameSession::setup`].
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_board(config, Board::classic())
    }

    #[must_use]
    pub fn with_board(config: GameConfig, board: Arc<Board>) -> Self {
        Self {
            config,
            board,
            table: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Deal a new game for `names`, replacing any game in progress.
    pub fn setup<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), GameError> {
        let state = GameState::setup(names, self.config.clone(), Arc::clone(&self.board))?;
        self.install(state);
        Ok(())
    }

    /// Start from a fixed seating and deal.
    pub fn setup_with_deal(&mut self, seats: Vec<(String, Suspect)>, deal: Deal) -> Result<(), GameError> {
        let state = GameState::from_deal(seats, deal, self.config.clone(), Arc::clone(&self.board))?;
        self.install(state);
        Ok(())
    }

    fn install(&mut self, state: GameState) {
        info!(players = state.player_count(), "session started");
        self.table = Some(Table::new(state));
    }

    /// Discard the game and every notebook.
    pub fn reset(&mut self) {
        if self.table.take().is_some() {
            info!("session reset");
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.table.is_some()
    }

    pub fn game(&self) -> Result<&GameState, GameError> {
        self.table.as_ref().map(|t| &t.state).ok_or(GameError::NoGame)
    }

    fn table_mut(&mut self) -> Result<&mut Table, GameError> {
        self.table.as_mut().ok_or(GameError::NoGame)
    }

    fn seat(&self, name: &str) -> Result<PlayerId, GameError> {
        self.game()?.player_id(name)
    }

    /// Name of the player whose turn it is.
    pub fn current_player(&self) -> Result<&str, GameError> {
        let game = self.game()?;
        Ok(&game.players()[game.current_player()].name)
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game().is_ok_and(GameState::is_game_over)
    }

    #[must_use]
    pub fn winner(&self) -> Option<&str> {
        let game = self.game().ok()?;
        let seat = game.winner()?;
        Some(game.players()[seat].name.as_str())
    }

    // === Actions ===

    /// Run one state-machine action for `player` and sync the notebooks.
    fn act<T>(
        &mut self,
        player: &str,
        action: impl FnOnce(&mut GameState, PlayerId) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let seat = self.seat(player)?;
        let table = self.table_mut()?;
        let result = action(&mut table.state, seat);
        table.sync_notebooks();
        result
    }

    pub fn roll_dice(&mut self, player: &str) -> Result<RollOutcome, GameError> {
        self.act(player, |game, seat| game.roll_dice(seat))
    }

    /// Legal single steps. Empty when it is not `player`'s turn to move.
    pub fn available_moves(&self, player: &str) -> Result<Vec<MoveOption>, GameError> {
        let seat = self.seat(player)?;
        Ok(self.game()?.available_moves(seat))
    }

    /// Rooms within reach, nearest first.
    pub fn reachable_rooms(&self, player: &str) -> Result<Vec<ReachableRoom>, GameError> {
        let seat = self.seat(player)?;
        Ok(self.game()?.reachable_rooms(seat))
    }

    pub fn move_to_room(&mut self, player: &str, room: &str) -> Result<RoomMove, GameError> {
        let room: Room = parse_name(Category::Room, room)?;
        self.act(player, |game, seat| game.move_to_room(seat, room))
    }

    pub fn step(&mut self, player: &str, cell: Position) -> Result<Option<Room>, GameError> {
        self.act(player, |game, seat| game.step(seat, cell))
    }

    pub fn use_secret_passage(&mut self, player: &str) -> Result<Room, GameError> {
        self.act(player, |game, seat| game.use_secret_passage(seat))
    }

    pub fn make_suggestion(&mut self, player: &str, suspect: &str, weapon: &str) -> Result<SuggestionReply, GameError> {
        let suspect: Suspect = parse_name(Category::Suspect, suspect)?;
        let weapon: Weapon = parse_name(Category::Weapon, weapon)?;
        self.suggest(player, suspect, weapon)
    }

    fn suggest(&mut self, player: &str, suspect: Suspect, weapon: Weapon) -> Result<SuggestionReply, GameError> {
        let seat = self.seat(player)?;
        let table = self.table_mut()?;
        let room = table.state.players()[seat].current_room();
        let check = room
            .map(|room| table.notebooks[seat].validate_suggestion(suspect, weapon, room))
            .unwrap_or_default();

        let suggestion = table.state.suggest(seat, suspect, weapon)?;
        table.sync_notebooks();
        if !check.is_useful() {
            debug!(player, wasted = check.wasted.len(), "suggestion named resolved cards");
        }
        Ok(SuggestionReply { suggestion, check })
    }

    /// Accuse. With notebook gating on, an accusation the player's own
    /// notebook rules out is rejected with [`GameError::AccusationBlocked`].
    pub fn make_accusation(
        &mut self,
        player: &str,
        suspect: &str,
        weapon: &str,
        room: &str,
    ) -> Result<AccusationReply, GameError> {
        let suspect: Suspect = parse_name(Category::Suspect, suspect)?;
        let weapon: Weapon = parse_name(Category::Weapon, weapon)?;
        let room: Room = parse_name(Category::Room, room)?;
        self.accuse(player, suspect, weapon, room)
    }

    fn accuse(&mut self, player: &str, suspect: Suspect, weapon: Weapon, room: Room) -> Result<AccusationReply, GameError> {
        let seat = self.seat(player)?;
        let gated = self.config.notebook_gates_accusations;
        let table = self.table_mut()?;
        table.state.check_can_accuse(seat)?;

        let check = table.notebooks[seat].validate_accusation(suspect, weapon, room);
        if gated && !check.is_valid() {
            info!(player, issues = check.issues.len(), "accusation blocked by notebook");
            return Err(GameError::AccusationBlocked { problems: check.issues });
        }

        let outcome = table.state.accuse(seat, suspect, weapon, room)?;
        table.sync_notebooks();
        Ok(AccusationReply { outcome, check })
    }

    pub fn end_turn(&mut self, player: &str) -> Result<(), GameError> {
        self.act(player, |game, seat| game.end_turn(seat))
    }

    /// Dispatch a typed action.
    pub fn apply(&mut self, player: &str, action: Action) -> Result<ActionOutcome, GameError> {
        match action {
            Action::RollDice => self.roll_dice(player).map(ActionOutcome::Rolled),
            Action::Step(cell) => self
                .step(player, cell)
                .map(|entered| ActionOutcome::Stepped { entered }),
            Action::MoveToRoom(room) => self
                .act(player, |game, seat| game.move_to_room(seat, room))
                .map(ActionOutcome::MovedToRoom),
            Action::SecretPassage => self.use_secret_passage(player).map(ActionOutcome::TookPassage),
            Action::Suggest { suspect, weapon } => self
                .suggest(player, suspect, weapon)
                .map(ActionOutcome::Suggested),
            Action::Accuse { suspect, weapon, room } => self
                .accuse(player, suspect, weapon, room)
                .map(ActionOutcome::Accused),
            Action::EndTurn => self.end_turn(player).map(|()| ActionOutcome::TurnEnded),
        }
    }

    // === Notebooks ===

    pub fn notebook(&self, player: &str) -> Result<&DetectiveNotebook, GameError> {
        let seat = self.seat(player)?;
        let table = self.table.as_ref().ok_or(GameError::NoGame)?;
        Ok(&table.notebooks[seat])
    }

    /// Mark in `player`'s own notebook that `owner` holds `card`. `owner`
    /// is a player name or "envelope".
    pub fn mark_has(&mut self, player: &str, card: &str, owner: &str) -> Result<usize, GameError> {
        let (seat, card, owner) = self.resolve_mark(player, card, owner)?;
        Ok(self.table_mut()?.notebooks[seat].mark_has(card, owner)?)
    }

    /// Mark in `player`'s own notebook that `owner` does not hold `card`.
    pub fn mark_does_not_have(&mut self, player: &str, card: &str, owner: &str) -> Result<usize, GameError> {
        let (seat, card, owner) = self.resolve_mark(player, card, owner)?;
        Ok(self.table_mut()?.notebooks[seat].mark_does_not_have(card, owner)?)
    }

    fn resolve_mark(&self, player: &str, card: &str, owner: &str) -> Result<(PlayerId, Card, Owner), GameError> {
        let seat = self.seat(player)?;
        let card = Card::parse(card)?;
        let owner = match self.seat(owner) {
            Ok(p) => Owner::Player(p),
            Err(_) if owner.trim().eq_ignore_ascii_case("envelope") => Owner::Envelope,
            Err(err) => return Err(err),
        };
        Ok((seat, card, owner))
    }
}

fn parse_name<T: FromStr>(category: Category, name: &str) -> Result<T, GameError> {
    name.trim().parse().map_err(|_| {
        GameError::UnknownCard(UnknownCardName {
            category: Some(category),
            name: name.to_string(),
        })
    })
}
