//! Breadth-first room search over the hallway grid.
//!
//! The search expands only through hallway and start cells. Door cells are
//! terminal: reaching one at depth `d` means the room is `d` steps away. A
//! search starting on a door reports that door's room one step away.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::board::{Board, CellType, Position};
use crate::cards::Room;

/// How a reachable room is reached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Cells to step onto in order, ending on a door of the room.
    Walk(Vec<Position>),
    /// Through the current room's secret passage.
    SecretPassage,
}

/// A room within reach this turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachableRoom {
    pub room: Room,
    /// Steps needed; 0 for a secret passage.
    pub distance: u8,
    pub route: Route,
}

/// Cells and rooms a search must avoid.
#[derive(Clone, Copy, Debug)]
pub struct SearchBounds<'a> {
    /// Cells already stood on this turn.
    pub visited: &'a FxHashSet<Position>,
    /// Cells holding another token.
    pub occupied: &'a FxHashSet<Position>,
    /// A room whose doors must not be entered.
    pub excluded_room: Option<Room>,
}

/// Every room whose door lies within `budget` steps of `origin`, nearest first.
#[must_use]
pub fn rooms_within(
    board: &Board,
    origin: Position,
    budget: u8,
    bounds: SearchBounds<'_>,
) -> Vec<ReachableRoom> {
    let mut found: FxHashMap<Room, (u8, Position)> = FxHashMap::default();
    let mut parent: FxHashMap<Position, Position> = FxHashMap::default();
    let mut seen: FxHashSet<Position> = FxHashSet::default();
    let mut queue: VecDeque<(Position, u8)> = VecDeque::new();

    // A token parked on a door can step back through it.
    if let CellType::Door(room) = board.cell(origin) {
        if budget > 0 && bounds.excluded_room != Some(room) {
            found.insert(room, (1, origin));
        }
    }

    seen.insert(origin);
    queue.push_back((origin, 0));

    while let Some((pos, depth)) = queue.pop_front() {
        if depth >= budget {
            continue;
        }
        for next in board.adjacent_cells(pos) {
            if seen.contains(&next) || bounds.visited.contains(&next) || bounds.occupied.contains(&next) {
                continue;
            }
            match board.cell(next) {
                CellType::Door(room) => {
                    seen.insert(next);
                    if bounds.excluded_room == Some(room) || found.contains_key(&room) {
                        continue;
                    }
                    parent.insert(next, pos);
                    found.insert(room, (depth + 1, next));
                }
                cell if cell.is_walkable() => {
                    seen.insert(next);
                    parent.insert(next, pos);
                    queue.push_back((next, depth + 1));
                }
                _ => {}
            }
        }
    }

    let mut rooms: Vec<ReachableRoom> = found
        .into_iter()
        .map(|(room, (distance, door))| ReachableRoom {
            room,
            distance,
            route: Route::Walk(trace_path(&parent, origin, door)),
        })
        .collect();
    rooms.sort_by_key(|r| (r.distance, r.room));
    rooms
}

/// Shortest walk from `origin` into `room`, if one fits in `budget`.
#[must_use]
pub fn path_to_room(
    board: &Board,
    origin: Position,
    budget: u8,
    bounds: SearchBounds<'_>,
    room: Room,
) -> Option<Vec<Position>> {
    rooms_within(board, origin, budget, bounds)
        .into_iter()
        .find(|r| r.room == room)
        .and_then(|r| match r.route {
            Route::Walk(path) => Some(path),
            Route::SecretPassage => None,
        })
}

fn trace_path(parent: &FxHashMap<Position, Position>, origin: Position, target: Position) -> Vec<Position> {
    let mut path = vec![target];
    let mut current = target;
    while let Some(&prev) = parent.get(&current) {
        if prev == origin {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
