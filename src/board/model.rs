//! The static board: parsing, load-time validation and pure queries.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::sync::{Arc, OnceLock};
use strum::IntoEnumIterator;

use super::cell::{CellType, Position};
use super::layout::{room_for_glyph, suspect_for_glyph, CLASSIC_LAYOUT, CLASSIC_PASSAGES};
use crate::cards::{Room, Suspect};

/// Problems found while loading a board layout.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board layout is empty")]
    Empty,

    #[error("board layout exceeds 255 rows or columns")]
    TooLarge,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("unknown glyph '{glyph}' at ({row}, {col})")]
    UnknownGlyph { row: usize, col: usize, glyph: char },

    #[error("{0} has no door reachable from a start square")]
    NoReachableDoor(Room),

    #[error("no start square for {0}")]
    MissingStart(Suspect),

    #[error("more than one start square for {0}")]
    DuplicateStart(Suspect),

    #[error("{0} declares more than one secret passage")]
    DuplicatePassage(Room),

    #[error("{0} has a secret passage to itself")]
    PassageToSelf(Room),

    #[error("secret passage {from} -> {to} has no return passage")]
    AsymmetricPassage { from: Room, to: Room },
}

/// Immutable board geometry.
///
/// Every query is total: coordinates outside the grid read as `Wall`.
#[derive(Clone, Debug)]
pub struct Board {
    rows: u8,
    cols: u8,
    cells: Vec<CellType>,
    doors: FxHashMap<Room, Vec<Position>>,
    passages: FxHashMap<Room, Room>,
    starts: FxHashMap<Suspect, Position>,
}

static CLASSIC: OnceLock<Arc<Board>> = OnceLock::new();

impl Board {
    /// The shared, validated classic board.
    ///
    /// # Panics
    ///
    /// Panics if the built-in layout fails validation. That is a build
    /// defect, not a runtime condition.
    pub fn classic() -> Arc<Board> {
        CLASSIC
            .get_or_init(|| {
                Arc::new(
                    Board::parse(CLASSIC_LAYOUT, &CLASSIC_PASSAGES)
                        .expect("built-in board layout must be valid"),
                )
            })
            .clone()
    }

    /// Parse and validate a text layout (see [`super::layout`] for glyphs).
    ///
    /// `passages` are directed `(from, to)` pairs; each must have its
    /// reverse present.
    pub fn parse(layout: &str, passages: &[(Room, Room)]) -> Result<Board, BoardError> {
        let lines: Vec<&str> = layout.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let expected = lines.first().ok_or(BoardError::Empty)?.chars().count();
        if lines.len() > usize::from(u8::MAX) || expected > usize::from(u8::MAX) {
            return Err(BoardError::TooLarge);
        }

        let mut cells = Vec::with_capacity(lines.len() * expected);
        let mut doors: FxHashMap<Room, Vec<Position>> = FxHashMap::default();
        let mut starts: FxHashMap<Suspect, Position> = FxHashMap::default();

        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(BoardError::RaggedRow { row, expected, found });
            }
            for (col, glyph) in line.chars().enumerate() {
                let pos = Position::new(row as u8, col as u8);
                let cell = match glyph {
                    '#' => CellType::Wall,
                    '.' => CellType::Hallway,
                    g => {
                        if let Some(suspect) = suspect_for_glyph(g) {
                            if starts.insert(suspect, pos).is_some() {
                                return Err(BoardError::DuplicateStart(suspect));
                            }
                            CellType::Start(suspect)
                        } else if let Some(room) = room_for_glyph(g) {
                            if g.is_ascii_lowercase() {
                                doors.entry(room).or_default().push(pos);
                                CellType::Door(room)
                            } else {
                                CellType::RoomInterior(room)
                            }
                        } else {
                            return Err(BoardError::UnknownGlyph { row, col, glyph: g });
                        }
                    }
                };
                cells.push(cell);
            }
        }

        let mut passage_map = FxHashMap::default();
        for &(from, to) in passages {
            if from == to {
                return Err(BoardError::PassageToSelf(from));
            }
            if passage_map.insert(from, to).is_some() {
                return Err(BoardError::DuplicatePassage(from));
            }
        }

        let board = Board {
            rows: lines.len() as u8,
            cols: expected as u8,
            cells,
            doors,
            passages: passage_map,
            starts,
        };
        board.validate()?;
        Ok(board)
    }

    fn validate(&self) -> Result<(), BoardError> {
        for suspect in Suspect::iter() {
            if !self.starts.contains_key(&suspect) {
                return Err(BoardError::MissingStart(suspect));
            }
        }

        let reached = self.hallway_reach();
        for room in Room::iter() {
            let reachable = self.doors_of(room).iter().any(|&door| {
                self.adjacent_cells(door)
                    .iter()
                    .any(|n| reached.contains(n))
            });
            if !reachable {
                return Err(BoardError::NoReachableDoor(room));
            }
        }

        for (&from, &to) in &self.passages {
            if self.passages.get(&to) != Some(&from) {
                return Err(BoardError::AsymmetricPassage { from, to });
            }
        }

        Ok(())
    }

    /// Hallway and start cells connected to some start square.
    fn hallway_reach(&self) -> FxHashSet<Position> {
        let mut reached: FxHashSet<Position> = self.starts.values().copied().collect();
        let mut frontier: Vec<Position> = reached.iter().copied().collect();
        while let Some(pos) = frontier.pop() {
            for next in self.adjacent_cells(pos) {
                if self.cell(next).is_walkable() && reached.insert(next) {
                    frontier.push(next);
                }
            }
        }
        reached
    }

    /// (rows, columns).
    #[must_use]
    pub fn dimensions(&self) -> (u8, u8) {
        (self.rows, self.cols)
    }

    /// Cell type at signed coordinates; out of bounds reads as `Wall`.
    #[must_use]
    pub fn cell_type(&self, row: i32, col: i32) -> CellType {
        if row < 0 || col < 0 || row >= i32::from(self.rows) || col >= i32::from(self.cols) {
            return CellType::Wall;
        }
        self.cells[row as usize * usize::from(self.cols) + col as usize]
    }

    /// Cell type at a position.
    #[must_use]
    pub fn cell(&self, pos: Position) -> CellType {
        self.cell_type(i32::from(pos.row), i32::from(pos.col))
    }

    /// Whether `pos` lies on the grid.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// The in-bounds orthogonal neighbours of `pos`, in up/down/left/right order.
    #[must_use]
    pub fn adjacent_cells(&self, pos: Position) -> SmallVec<[Position; 4]> {
        let (row, col) = (i32::from(pos.row), i32::from(pos.col));
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .map(|(dr, dc)| (row + dr, col + dc))
            .filter(|&(r, c)| r >= 0 && c >= 0 && r < i32::from(self.rows) && c < i32::from(self.cols))
            .map(|(r, c)| Position::new(r as u8, c as u8))
            .collect()
    }

    /// Door cells of a room, in reading order.
    #[must_use]
    pub fn doors_of(&self, room: Room) -> &[Position] {
        self.doors.get(&room).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Destination of the room's secret passage, if it has one.
    #[must_use]
    pub fn secret_passage(&self, room: Room) -> Option<Room> {
        self.passages.get(&room).copied()
    }

    /// A character's start square.
    #[must_use]
    pub fn start_square(&self, suspect: Suspect) -> Position {
        self.starts[&suspect]
    }

    /// The room a door or interior cell belongs to.
    #[must_use]
    pub fn room_at(&self, pos: Position) -> Option<Room> {
        self.cell(pos).room()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_board_loads() {
        let board = Board::classic();
        assert_eq!(board.dimensions(), (25, 24));
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        let board = Board::classic();
        assert_eq!(board.cell_type(-1, 3), CellType::Wall);
        assert_eq!(board.cell_type(3, -1), CellType::Wall);
        assert_eq!(board.cell_type(25, 0), CellType::Wall);
        assert_eq!(board.cell_type(0, 24), CellType::Wall);
    }

    #[test]
    fn test_cell_lookup() {
        let board = Board::classic();
        assert_eq!(board.cell_type(6, 4), CellType::Door(Room::Kitchen));
        assert_eq!(board.cell_type(2, 2), CellType::RoomInterior(Room::Kitchen));
        assert_eq!(board.cell_type(7, 4), CellType::Hallway);
        assert_eq!(board.cell_type(24, 16), CellType::Start(Suspect::MissScarlet));
        assert_eq!(board.cell_type(12, 12), CellType::Wall);
    }

    #[test]
    fn test_adjacent_cells_clip_at_edges() {
        let board = Board::classic();
        assert_eq!(board.adjacent_cells(Position::new(0, 0)).len(), 2);
        assert_eq!(board.adjacent_cells(Position::new(0, 5)).len(), 3);
        let inner = board.adjacent_cells(Position::new(8, 8));
        assert_eq!(
            inner.as_slice(),
            &[
                Position::new(7, 8),
                Position::new(9, 8),
                Position::new(8, 7),
                Position::new(8, 9)
            ]
        );
    }

    #[test]
    fn test_door_counts() {
        let board = Board::classic();
        assert_eq!(board.doors_of(Room::Kitchen), &[Position::new(6, 4)]);
        assert_eq!(board.doors_of(Room::Ballroom).len(), 4);
        assert_eq!(board.doors_of(Room::Hall).len(), 3);
        assert_eq!(board.doors_of(Room::Study), &[Position::new(21, 17)]);
    }

    #[test]
    fn test_secret_passages_symmetric() {
        let board = Board::classic();
        assert_eq!(board.secret_passage(Room::Kitchen), Some(Room::Study));
        assert_eq!(board.secret_passage(Room::Study), Some(Room::Kitchen));
        assert_eq!(board.secret_passage(Room::Lounge), Some(Room::Conservatory));
        assert_eq!(board.secret_passage(Room::Hall), None);
    }

    #[test]
    fn test_asymmetric_passage_rejected() {
        let err = Board::parse(CLASSIC_LAYOUT, &[(Room::Kitchen, Room::Study)]).unwrap_err();
        assert_eq!(
            err,
            BoardError::AsymmetricPassage {
                from: Room::Kitchen,
                to: Room::Study
            }
        );
    }

    #[test]
    fn test_room_without_door_rejected() {
        let layout = CLASSIC_LAYOUT.replace("KKKKkK", "KKKKKK");
        let err = Board::parse(&layout, &CLASSIC_PASSAGES).unwrap_err();
        assert_eq!(err, BoardError::NoReachableDoor(Room::Kitchen));
    }

    #[test]
    fn test_door_into_sealed_pocket_rejected() {
        // The Kitchen door still faces a hallway cell, but walls cut that
        // cell off from every start square.
        let layout = CLASSIC_LAYOUT
            .replace("#.......BbBBBBbB.......#", "####.###BbBBBBbB.......#")
            .replace("#.................IIIIII", "#####.............IIIIII");
        assert_eq!(
            Board::parse(&layout, &CLASSIC_PASSAGES).unwrap_err(),
            BoardError::NoReachableDoor(Room::Kitchen)
        );
    }

    #[test]
    fn test_ragged_and_unknown_glyph() {
        let err = Board::parse("###\n##\n", &[]).unwrap_err();
        assert!(matches!(err, BoardError::RaggedRow { row: 1, .. }));

        let err = Board::parse("#?#\n", &[]).unwrap_err();
        assert!(matches!(err, BoardError::UnknownGlyph { glyph: '?', .. }));

        assert_eq!(Board::parse("\n\n", &[]).unwrap_err(), BoardError::Empty);
    }

    #[test]
    fn test_missing_start_rejected() {
        let layout = CLASSIC_LAYOUT.replace('6', "#");
        let err = Board::parse(&layout, &CLASSIC_PASSAGES).unwrap_err();
        assert_eq!(err, BoardError::MissingStart(Suspect::ProfessorPlum));
    }
}
