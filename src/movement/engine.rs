//! Movement legality and execution.
//!
//! `MovementEngine` borrows the shared board and works on one `Player` at a
//! time. Occupancy is passed in as the set of cells other tokens stand on.
//! Multi-step moves are planned first and applied to a copy of the player,
//! which replaces the original only when every step succeeded.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::search::{path_to_room, rooms_within, ReachableRoom, Route, SearchBounds};
use crate::board::{Board, CellType, Position};
use crate::cards::Room;
use crate::game::{Location, Player};

/// Why a move was refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("no moves left this turn")]
    NoMovesLeft,

    #[error("{to} is not next to {from}")]
    NotAdjacent { from: Position, to: Position },

    #[error("{0} is a wall or room interior")]
    Impassable(Position),

    #[error("{0} was already visited this turn")]
    AlreadyVisited(Position),

    #[error("{0} is occupied")]
    Occupied(Position),

    #[error("cannot re-enter the {0} in the same turn")]
    CannotReenter(Room),

    #[error("not in a room")]
    NotInRoom,

    #[error("{door} is not a door of the {room}")]
    NotADoorOf { door: Position, room: Room },

    #[error("the {0} has no secret passage")]
    NoSecretPassage(Room),

    #[error("already entered a room this turn")]
    AlreadyEnteredRoom,

    #[error("already in the {0}")]
    AlreadyInRoom(Room),

    #[error("cannot reach the {room} with {budget} moves")]
    Unreachable { room: Room, budget: u8 },
}

/// A single legal step from the player's current location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveOption {
    pub cell: Position,
    /// The room entered by stepping here, if the cell is a door.
    pub enters: Option<Room>,
}

/// The result of a completed `move_to_room`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMove {
    pub room: Room,
    /// Steps spent, including a door exit.
    pub steps: u8,
    /// Cells stepped onto, in order. Empty for a secret passage.
    pub path: Vec<Position>,
    pub via_passage: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepKind {
    Walk(Position),
    Enter(Room),
    Exit(Position),
}

/// Movement rules over a borrowed board.
#[derive(Clone, Copy, Debug)]
pub struct MovementEngine<'a> {
    board: &'a Board,
}

impl<'a> MovementEngine<'a> {
    #[must_use]
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }

    #[must_use]
    pub fn board(&self) -> &'a Board {
        self.board
    }

    /// Whether `cell` is a legal next step, ignoring the movement budget.
    #[must_use]
    pub fn can_step_to(&self, player: &Player, cell: Position, occupied: &FxHashSet<Position>) -> bool {
        self.check_step(player, cell, occupied).is_ok()
    }

    fn check_step(
        &self,
        player: &Player,
        cell: Position,
        occupied: &FxHashSet<Position>,
    ) -> Result<StepKind, MoveError> {
        match player.location {
            Location::Room(room) => {
                if !self.board.doors_of(room).contains(&cell) {
                    return Err(MoveError::NotADoorOf { door: cell, room });
                }
                if occupied.contains(&cell) {
                    return Err(MoveError::Occupied(cell));
                }
                Ok(StepKind::Exit(cell))
            }
            Location::Hallway(from) => {
                if cell == from {
                    return match self.board.cell(from) {
                        CellType::Door(room) if player.left_room_this_turn == Some(room) => {
                            Err(MoveError::CannotReenter(room))
                        }
                        CellType::Door(room) => Ok(StepKind::Enter(room)),
                        _ => Err(MoveError::NotAdjacent { from, to: cell }),
                    };
                }
                if !from.is_adjacent(cell) {
                    return Err(MoveError::NotAdjacent { from, to: cell });
                }
                match self.board.cell(cell) {
                    CellType::Wall | CellType::RoomInterior(_) => Err(MoveError::Impassable(cell)),
                    _ if player.visited.contains(&cell) => Err(MoveError::AlreadyVisited(cell)),
                    _ if occupied.contains(&cell) => Err(MoveError::Occupied(cell)),
                    CellType::Door(room) if player.left_room_this_turn == Some(room) => {
                        Err(MoveError::CannotReenter(room))
                    }
                    CellType::Door(room) => Ok(StepKind::Enter(room)),
                    CellType::Hallway | CellType::Start(_) => Ok(StepKind::Walk(cell)),
                }
            }
        }
    }

    /// Legal single steps right now. Empty when the budget is spent.
    #[must_use]
    pub fn available_moves(&self, player: &Player, occupied: &FxHashSet<Position>) -> Vec<MoveOption> {
        if player.moves_remaining == 0 {
            return Vec::new();
        }
        let candidates: Vec<Position> = match player.location {
            Location::Room(room) => self.board.doors_of(room).to_vec(),
            Location::Hallway(pos) => {
                let mut cells = self.board.adjacent_cells(pos).into_vec();
                cells.push(pos);
                cells
            }
        };
        candidates
            .into_iter()
            .filter_map(|cell| match self.check_step(player, cell, occupied) {
                Ok(StepKind::Enter(room)) => Some(MoveOption { cell, enters: Some(room) }),
                Ok(_) => Some(MoveOption { cell, enters: None }),
                Err(_) => None,
            })
            .collect()
    }

    /// Take one step. Returns the room entered, if any.
    pub fn step(
        &self,
        player: &mut Player,
        cell: Position,
        occupied: &FxHashSet<Position>,
    ) -> Result<Option<Room>, MoveError> {
        if player.moves_remaining == 0 {
            return Err(MoveError::NoMovesLeft);
        }
        let kind = self.check_step(player, cell, occupied)?;
        player.moves_remaining -= 1;
        match kind {
            StepKind::Walk(pos) | StepKind::Exit(pos) => {
                player.place_in_hallway(pos);
                trace!(player = %player.name, cell = %pos, left = player.moves_remaining, "step");
                Ok(None)
            }
            StepKind::Enter(room) => {
                player.enter_room(room);
                debug!(player = %player.name, room = %room, "entered room");
                Ok(Some(room))
            }
        }
    }

    /// Leave the current room through one of its doors. Costs one step.
    pub fn exit_room_to_hallway(
        &self,
        player: &mut Player,
        door: Position,
        occupied: &FxHashSet<Position>,
    ) -> Result<(), MoveError> {
        if player.current_room().is_none() {
            return Err(MoveError::NotInRoom);
        }
        self.step(player, door, occupied).map(|_| ())
    }

    /// Take the current room's secret passage. Ends movement for the turn.
    pub fn use_secret_passage(&self, player: &mut Player) -> Result<Room, MoveError> {
        let room = player.current_room().ok_or(MoveError::NotInRoom)?;
        if player.entered_room_this_turn {
            return Err(MoveError::AlreadyEnteredRoom);
        }
        let destination = self
            .board
            .secret_passage(room)
            .ok_or(MoveError::NoSecretPassage(room))?;
        player.left_room_this_turn = Some(room);
        player.enter_room(destination);
        debug!(player = %player.name, from = %room, to = %destination, "secret passage");
        Ok(destination)
    }

    /// Rooms reachable this turn, nearest first.
    ///
    /// From a hallway this is the plain search. From inside a room each free
    /// door is tried as the first step, and the secret passage (if still
    /// usable) is listed at distance 0.
    #[must_use]
    pub fn reachable_rooms(&self, player: &Player, occupied: &FxHashSet<Position>) -> Vec<ReachableRoom> {
        match player.location {
            Location::Hallway(origin) => rooms_within(
                self.board,
                origin,
                player.moves_remaining,
                self.bounds(player, occupied, player.left_room_this_turn),
            ),
            Location::Room(room) => {
                let mut best: Vec<ReachableRoom> = Vec::new();
                if !player.entered_room_this_turn {
                    if let Some(destination) = self.board.secret_passage(room) {
                        best.push(ReachableRoom {
                            room: destination,
                            distance: 0,
                            route: Route::SecretPassage,
                        });
                    }
                }
                for &door in self.board.doors_of(room) {
                    if player.moves_remaining == 0 || occupied.contains(&door) {
                        continue;
                    }
                    let found = rooms_within(
                        self.board,
                        door,
                        player.moves_remaining - 1,
                        self.bounds(player, occupied, Some(room)),
                    );
                    for reach in found {
                        let candidate = with_exit(door, reach);
                        match best.iter_mut().find(|r| r.room == candidate.room) {
                            Some(existing) if existing.distance <= candidate.distance => {}
                            Some(existing) => *existing = candidate,
                            None => best.push(candidate),
                        }
                    }
                }
                best.sort_by_key(|r| (r.distance, r.room));
                best
            }
        }
    }

    /// Move into `room` along the shortest legal route, all or nothing.
    pub fn move_to_room(
        &self,
        player: &mut Player,
        room: Room,
        occupied: &FxHashSet<Position>,
    ) -> Result<RoomMove, MoveError> {
        if player.current_room() == Some(room) {
            return Err(MoveError::AlreadyInRoom(room));
        }

        let mut trial = player.clone();
        let outcome = match trial.location {
            Location::Room(current) => {
                if !trial.entered_room_this_turn && self.board.secret_passage(current) == Some(room) {
                    self.use_secret_passage(&mut trial)?;
                    RoomMove {
                        room,
                        steps: 0,
                        path: Vec::new(),
                        via_passage: true,
                    }
                } else {
                    let (door, path) = self.plan_from_room(&trial, current, room, occupied)?;
                    self.exit_room_to_hallway(&mut trial, door, occupied)?;
                    self.walk(&mut trial, &path, occupied)?;
                    let mut full = Vec::with_capacity(path.len() + 1);
                    full.push(door);
                    full.extend(path);
                    RoomMove {
                        room,
                        steps: full.len() as u8,
                        path: full,
                        via_passage: false,
                    }
                }
            }
            Location::Hallway(origin) => {
                if trial.moves_remaining == 0 {
                    return Err(MoveError::NoMovesLeft);
                }
                let path = path_to_room(
                    self.board,
                    origin,
                    trial.moves_remaining,
                    self.bounds(&trial, occupied, trial.left_room_this_turn),
                    room,
                )
                .ok_or(MoveError::Unreachable {
                    room,
                    budget: trial.moves_remaining,
                })?;
                self.walk(&mut trial, &path, occupied)?;
                RoomMove {
                    room,
                    steps: path.len() as u8,
                    path,
                    via_passage: false,
                }
            }
        };

        debug_assert_eq!(trial.current_room(), Some(room));
        *player = trial;
        Ok(outcome)
    }

    fn plan_from_room(
        &self,
        player: &Player,
        current: Room,
        target: Room,
        occupied: &FxHashSet<Position>,
    ) -> Result<(Position, Vec<Position>), MoveError> {
        if player.moves_remaining == 0 {
            return Err(MoveError::NoMovesLeft);
        }
        self.board
            .doors_of(current)
            .iter()
            .filter(|door| !occupied.contains(door))
            .filter_map(|&door| {
                path_to_room(
                    self.board,
                    door,
                    player.moves_remaining - 1,
                    self.bounds(player, occupied, Some(current)),
                    target,
                )
                .map(|path| (door, path))
            })
            .min_by_key(|(_, path)| path.len())
            .ok_or(MoveError::Unreachable {
                room: target,
                budget: player.moves_remaining,
            })
    }

    fn walk(&self, player: &mut Player, path: &[Position], occupied: &FxHashSet<Position>) -> Result<(), MoveError> {
        for &cell in path {
            self.step(player, cell, occupied)?;
        }
        Ok(())
    }

    fn bounds<'p>(
        &self,
        player: &'p Player,
        occupied: &'p FxHashSet<Position>,
        excluded_room: Option<Room>,
    ) -> SearchBounds<'p> {
        SearchBounds {
            visited: &player.visited,
            occupied,
            excluded_room,
        }
    }
}

fn with_exit(door: Position, reach: ReachableRoom) -> ReachableRoom {
    let route = match reach.route {
        Route::Walk(path) => {
            let mut full = Vec::with_capacity(path.len() + 1);
            full.push(door);
            full.extend(path);
            Route::Walk(full)
        }
        Route::SecretPassage => Route::SecretPassage,
    };
    ReachableRoom {
        room: reach.room,
        distance: reach.distance + 1,
        route,
    }
}
