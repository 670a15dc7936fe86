//! The built-in classic board.
//!
//! Glyphs: `#` wall, `.` hallway, uppercase letters room interiors,
//! lowercase letters that room's doors, digits `1`-`6` the start squares of
//! the six characters in suspect order (Scarlet, Mustard, White, Green,
//! Peacock, Plum).
//!
//! | glyph | room          |
//! |-------|---------------|
//! | K     | Kitchen       |
//! | B     | Ballroom      |
//! | C     | Conservatory  |
//! | D     | Dining Room   |
//! | I     | Billiard Room |
//! | L     | Library       |
//! | U     | Lounge        |
//! | H     | Hall          |
//! | Y     | Study         |

use crate::cards::{Room, Suspect};

/// 25 rows by 24 columns. The walled block in the middle is the cellar.
pub const CLASSIC_LAYOUT: &str = "\
#########3####4#########
KKKKKK....BBBB....CCCCCC
KKKKKK..BBBBBBBB..CCCCCC
KKKKKK..BBBBBBBB..CCCCCC
KKKKKK..BBBBBBBB..cCCCCC
KKKKKK..bBBBBBBb..CCCCCC
KKKKkK..BBBBBBBB.......5
#.......BbBBBBbB.......#
#.................IIIIII
DDDDDDDD..........iIIIII
DDDDDDDD..#####...IIIIII
DDDDDDDD..#####...IIIIII
DDDDDDDd..#####...IIIIiI
DDDDDDDD..#####........#
DDDDDDDD..#####..LLLlLLL
DDDDDDdD..#####..LLLLLLL
#.........#####..lLLLLLL
2................LLLLLLL
#........HHhhHH..LLLLLLL
UUUUUUu..HHHHHH........6
UUUUUUU..HHHHHh........#
UUUUUUU..HHHHHH..yYYYYYY
UUUUUUU..HHHHHH..YYYYYYY
UUUUUUU..HHHHHH..YYYYYYY
UUUUUUU##HHHHHH#1YYYYYYY
";

/// Directed secret passages between diagonal corner rooms.
pub const CLASSIC_PASSAGES: [(Room, Room); 4] = [
    (Room::Kitchen, Room::Study),
    (Room::Study, Room::Kitchen),
    (Room::Conservatory, Room::Lounge),
    (Room::Lounge, Room::Conservatory),
];

/// Room for an interior or door glyph (case-insensitive).
#[must_use]
pub fn room_for_glyph(glyph: char) -> Option<Room> {
    match glyph.to_ascii_uppercase() {
        'K' => Some(Room::Kitchen),
        'B' => Some(Room::Ballroom),
        'C' => Some(Room::Conservatory),
        'D' => Some(Room::DiningRoom),
        'I' => Some(Room::BilliardRoom),
        'L' => Some(Room::Library),
        'U' => Some(Room::Lounge),
        'H' => Some(Room::Hall),
        'Y' => Some(Room::Study),
        _ => None,
    }
}

/// Character whose start square a digit glyph marks.
#[must_use]
pub fn suspect_for_glyph(glyph: char) -> Option<Suspect> {
    match glyph {
        '1' => Some(Suspect::MissScarlet),
        '2' => Some(Suspect::ColonelMustard),
        '3' => Some(Suspect::MrsWhite),
        '4' => Some(Suspect::MrGreen),
        '5' => Some(Suspect::MrsPeacock),
        '6' => Some(Suspect::ProfessorPlum),
        _ => None,
    }
}
