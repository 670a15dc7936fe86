//! The murder solution and the dealt deck.
//!
//! Setup draws one card per category uniformly at random into the
//! envelope, shuffles the remaining 18 and deals them round-robin by seat.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::definition::{Card, Category, Room, Suspect, Weapon};
use crate::core::GameRng;

/// The hidden envelope: one suspect, one weapon, one room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Solution {
    pub suspect: Suspect,
    pub weapon: Weapon,
    pub room: Room,
}

impl Solution {
    #[must_use]
    pub const fn new(suspect: Suspect, weapon: Weapon, room: Room) -> Self {
        Self {
            suspect,
            weapon,
            room,
        }
    }

    /// Draw a uniformly random solution.
    pub fn draw(rng: &mut GameRng) -> Self {
        let suspects: Vec<_> = Suspect::iter().collect();
        let weapons: Vec<_> = Weapon::iter().collect();
        let rooms: Vec<_> = Room::iter().collect();

        Self {
            suspect: suspects[rng.gen_range_usize(0..suspects.len())],
            weapon: weapons[rng.gen_range_usize(0..weapons.len())],
            room: rooms[rng.gen_range_usize(0..rooms.len())],
        }
    }

    /// The three envelope cards.
    #[must_use]
    pub fn cards(&self) -> [Card; 3] {
        [
            Card::Suspect(self.suspect),
            Card::Weapon(self.weapon),
            Card::Room(self.room),
        ]
    }

    /// Whether `card` is in the envelope.
    #[must_use]
    pub fn contains(&self, card: Card) -> bool {
        self.cards().contains(&card)
    }

    /// The envelope card of one category.
    #[must_use]
    pub fn card_of(&self, category: Category) -> Card {
        match category {
            Category::Suspect => Card::Suspect(self.suspect),
            Category::Weapon => Card::Weapon(self.weapon),
            Category::Room => Card::Room(self.room),
        }
    }

    /// Exact three-way match.
    #[must_use]
    pub fn matches(&self, suspect: Suspect, weapon: Weapon, room: Room) -> bool {
        self.suspect == suspect && self.weapon == weapon && self.room == room
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} with the {} in the {}", self.suspect, self.weapon, self.room)
    }
}

/// Result of dealing: the envelope plus one hand per seat.
#[derive(Clone, Debug)]
pub struct Deal {
    pub solution: Solution,
    pub hands: Vec<Vec<Card>>,
}

impl Deal {
    /// Draw the solution, shuffle the rest and deal round-robin to
    /// `player_count` seats, starting with seat 0.
    pub fn new(player_count: usize, rng: &mut GameRng) -> Self {
        assert!(player_count > 0, "Must deal to at least 1 player");

        let solution = Solution::draw(rng);
        let mut remaining: Vec<Card> = Card::all().filter(|c| !solution.contains(*c)).collect();
        rng.shuffle(&mut remaining);

        let mut hands = vec![Vec::new(); player_count];
        for (i, card) in remaining.into_iter().enumerate() {
            hands[i % player_count].push(card);
        }

        Self { solution, hands }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CARD_COUNT;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_solution_has_one_of_each() {
        let mut rng = GameRng::new(3);
        let solution = Solution::draw(&mut rng);
        let categories: Vec<_> = solution.cards().iter().map(|c| c.category()).collect();
        assert_eq!(categories, vec![Category::Suspect, Category::Weapon, Category::Room]);
    }

    #[test]
    fn test_solution_matches() {
        let s = Solution::new(Suspect::MrGreen, Weapon::Rope, Room::Hall);
        assert!(s.matches(Suspect::MrGreen, Weapon::Rope, Room::Hall));
        assert!(!s.matches(Suspect::MrGreen, Weapon::Rope, Room::Study));
        assert!(s.contains(Card::Weapon(Weapon::Rope)));
        assert!(!s.contains(Card::Weapon(Weapon::Knife)));
        assert_eq!(s.card_of(Category::Room), Card::Room(Room::Hall));
        assert_eq!(s.to_string(), "Mr. Green with the Rope in the Hall");
    }

    #[test]
    fn test_deal_partitions_deck() {
        for player_count in 3..=6 {
            let mut rng = GameRng::new(player_count as u64);
            let deal = Deal::new(player_count, &mut rng);

            let mut seen = FxHashSet::default();
            for card in deal.hands.iter().flatten().chain(deal.solution.cards().iter()) {
                assert!(seen.insert(*card), "duplicate card {card}");
            }
            assert_eq!(seen.len(), CARD_COUNT);
        }
    }

    #[test]
    fn test_hand_sizes_differ_by_at_most_one() {
        for player_count in 3..=6 {
            let mut rng = GameRng::new(11);
            let deal = Deal::new(player_count, &mut rng);

            let sizes: Vec<_> = deal.hands.iter().map(Vec::len).collect();
            let min = *sizes.iter().min().unwrap();
            let max = *sizes.iter().max().unwrap();
            assert!(max - min <= 1, "sizes {sizes:?}");
            assert_eq!(sizes.iter().sum::<usize>(), 18);
        }
    }

    #[test]
    fn test_deal_is_deterministic() {
        let a = Deal::new(4, &mut GameRng::new(77));
        let b = Deal::new(4, &mut GameRng::new(77));
        assert_eq!(a.solution, b.solution);
        assert_eq!(a.hands, b.hands);
    }
}
