//! Turn flow tests for the game state machine.
//!
//! These tests verify:
//! - Setup, seating and the deal
//! - Rolling, clues and movement gating
//! - Suggestion legality and clockwise disproof
//! - Accusations, elimination and game end

use clue_engine::board::Board;
use clue_engine::cards::{Card, Deal, Room, Solution, Suspect, Weapon, CARD_COUNT};
use clue_engine::core::{Action, GameConfig, GameError, GameRng, PlayerId};
use clue_engine::game::{AccusationOutcome, GameEvent, GameState, Location, TurnPhase};
use clue_engine::movement::{DiceRoll, MAGNIFYING_GLASS};
use clue_engine::rules::GameResult;
use proptest::prelude::*;
use rustc_hash::FxHashSet;

const ANN: PlayerId = PlayerId(0);
const BOB: PlayerId = PlayerId(1);
const CAT: PlayerId = PlayerId(2);

/// Ann (Scarlet), Bob (Mustard), Cat (White). The envelope holds
/// Professor Plum with the Wrench in the Dining Room.
fn scripted(config: GameConfig) -> GameState {
    let deal = Deal {
        solution: Solution::new(Suspect::ProfessorPlum, Weapon::Wrench, Room::DiningRoom),
        hands: vec![
            vec![
                Card::Suspect(Suspect::MissScarlet),
                Card::Weapon(Weapon::Candlestick),
                Card::Room(Room::Kitchen),
                Card::Room(Room::Ballroom),
                Card::Room(Room::Conservatory),
                Card::Room(Room::BilliardRoom),
            ],
            vec![
                Card::Suspect(Suspect::ColonelMustard),
                Card::Weapon(Weapon::Knife),
                Card::Weapon(Weapon::LeadPipe),
                Card::Room(Room::Library),
                Card::Room(Room::Study),
                Card::Suspect(Suspect::MrGreen),
            ],
            vec![
                Card::Suspect(Suspect::MrsWhite),
                Card::Suspect(Suspect::MrsPeacock),
                Card::Weapon(Weapon::Revolver),
                Card::Weapon(Weapon::Rope),
                Card::Room(Room::Hall),
                Card::Room(Room::Lounge),
            ],
        ],
    };
    let seats = vec![
        ("Ann".to_string(), Suspect::MissScarlet),
        ("Bob".to_string(), Suspect::ColonelMustard),
        ("Cat".to_string(), Suspect::MrsWhite),
    ];
    GameState::from_deal(seats, deal, config, Board::classic()).unwrap()
}

/// Pass turns until Ann rolls at least `needed`, leaving her mid-turn.
fn ann_rolls_at_least(game: &mut GameState, needed: u8) {
    for _ in 0..200 {
        assert_eq!(game.current_player(), ANN);
        let roll = game.roll_dice(ANN).unwrap();
        if roll.budget() >= needed {
            return;
        }
        game.end_turn(ANN).unwrap();
        while game.current_player() != ANN {
            let current = game.current_player();
            game.end_turn(current).unwrap();
        }
    }
    panic!("never rolled {needed}");
}

/// Put Ann in the Hall on her current turn.
fn ann_walks_to_hall(game: &mut GameState) {
    ann_rolls_at_least(game, 6);
    game.move_to_room(ANN, Room::Hall).unwrap();
}

/// Test that setup seats the first character's player first.
#[test]
fn test_setup_seating_and_deal() {
    let names = ["Ann", "Bob", "Cat", "Dan", "Eve", "Fay"];
    let mut game = GameState::setup(&names, GameConfig::new(11), Board::classic()).unwrap();

    assert_eq!(game.player_count(), 6);
    assert_eq!(game.turn(), 1);
    assert_eq!(game.phase(), TurnPhase::AwaitingRoll);
    assert_eq!(game.players()[game.current_player()].character, Suspect::MissScarlet);

    let hand_sizes: Vec<usize> = game.players().values().map(|p| p.hand.len()).collect();
    assert_eq!(hand_sizes, vec![3; 6]);
    for player in game.players().values() {
        assert_eq!(player.location, Location::Hallway(Board::classic().start_square(player.character)));
    }

    let dealt = game
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::CardsDealt { .. }))
        .count();
    assert_eq!(dealt, 6);
    assert!(game.drain_events().is_empty());
}

/// Test that player count and names are validated.
#[test]
fn test_setup_validation() {
    let board = Board::classic();
    assert!(matches!(
        GameState::setup(&["A", "B"], GameConfig::default(), board.clone()),
        Err(GameError::InvalidPlayerCount { found: 2, min: 3, max: 6 })
    ));
    assert!(matches!(
        GameState::setup(&["A", "B", "C", "D", "E", "F", "G"], GameConfig::default(), board.clone()),
        Err(GameError::InvalidPlayerCount { found: 7, .. })
    ));
    assert_eq!(
        GameState::setup(&["A", "B", "A"], GameConfig::default(), board).unwrap_err(),
        GameError::DuplicatePlayerName("A".to_string())
    );
}

/// Test that the same seed replays the same game.
#[test]
fn test_seed_reproduces_game() {
    let names = ["Ann", "Bob", "Cat", "Dan"];
    let mut a = GameState::setup(&names, GameConfig::new(99), Board::classic()).unwrap();
    let mut b = GameState::setup(&names, GameConfig::new(99), Board::classic()).unwrap();

    assert_eq!(a.solution(), b.solution());
    let first = a.current_player();
    assert_eq!(a.roll_dice(first).unwrap(), b.roll_dice(first).unwrap());
    assert_eq!(a.rng_state(), b.rng_state());
}

/// Test the roll is once per turn and gates walking.
#[test]
fn test_roll_gating() {
    let mut game = scripted(GameConfig::new(3));

    assert_eq!(game.move_to_room(ANN, Room::Study).unwrap_err(), GameError::NotRolled);
    assert_eq!(game.roll_dice(BOB).unwrap_err().to_string(), "it is Ann's turn, not Bob's");

    let roll = game.roll_dice(ANN).unwrap();
    assert_eq!(game.phase(), TurnPhase::Moving);
    assert_eq!(game.players()[ANN].moves_remaining, roll.budget());
    assert_eq!(game.roll_dice(ANN).unwrap_err(), GameError::AlreadyRolled);
}

/// Test clues reveal cards outside the envelope and the roller's hand.
#[test]
fn test_clues_are_truthful() {
    for seed in 0..40 {
        let mut game = scripted(GameConfig::new(seed));
        game.drain_events();
        let roll = game.roll_dice(ANN).unwrap();

        assert_eq!(roll.clues.len(), roll.roll.clue_count());
        for clue in &roll.clues {
            assert!(!game.solution().contains(clue.card));
            assert!(!game.players()[ANN].holds(clue.card));
            assert!(game.players()[clue.holder].holds(clue.card));
        }
        let revealed = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ClueRevealed { .. }))
            .count();
        assert_eq!(revealed, roll.clues.len());
    }
}

/// Test that only players in a room may suggest.
#[test]
fn test_suggest_requires_room() {
    let mut game = scripted(GameConfig::new(3));
    assert_eq!(
        game.suggest(ANN, Suspect::ProfessorPlum, Weapon::Wrench).unwrap_err(),
        GameError::NotInRoom
    );
}

/// Test clockwise disproof with a passer and a single matching card.
#[test]
fn test_disproof_order() {
    let mut game = scripted(GameConfig::new(5));
    ann_walks_to_hall(&mut game);

    let suggestion = game.suggest(ANN, Suspect::ProfessorPlum, Weapon::Wrench).unwrap();
    assert_eq!(suggestion.room, Room::Hall);
    assert_eq!(suggestion.passed, vec![BOB]);
    let disproof = suggestion.disproof.unwrap();
    assert_eq!(disproof.disprover, CAT);
    assert_eq!(disproof.card, Card::Room(Room::Hall));
    assert_eq!(game.phase(), TurnPhase::Suggested);
    assert_eq!(game.suggestions().len(), 1);

    // The turn's movement is over and only one suggestion is allowed.
    assert_eq!(game.roll_dice(ANN).unwrap_err(), GameError::AlreadySuggested);
    assert_eq!(
        game.suggest(ANN, Suspect::MrGreen, Weapon::Rope).unwrap_err(),
        GameError::AlreadySuggested
    );
}

/// Test a second suggestion in the same room needs the player to move first.
#[test]
fn test_repeated_suggestion_rejected() {
    let mut game = scripted(GameConfig::new(5));
    ann_walks_to_hall(&mut game);

    // Ann holds Miss Scarlet and the Candlestick herself; only Cat's Hall can refute.
    let suggestion = game.suggest(ANN, Suspect::MissScarlet, Weapon::Candlestick).unwrap();
    assert_eq!(suggestion.disprover(), Some(CAT));

    game.end_turn(ANN).unwrap();
    game.end_turn(BOB).unwrap();
    game.end_turn(CAT).unwrap();
    assert_eq!(
        game.suggest(ANN, Suspect::ProfessorPlum, Weapon::Wrench).unwrap_err(),
        GameError::RepeatedSuggestion(Room::Hall)
    );
}

/// Test a suggested character is pulled in and may suggest there next turn.
#[test]
fn test_pulled_player_may_suggest() {
    let mut game = scripted(GameConfig::new(5));
    ann_walks_to_hall(&mut game);

    let suggestion = game.suggest(ANN, Suspect::ColonelMustard, Weapon::Wrench).unwrap();
    assert_eq!(suggestion.disprover(), Some(BOB));
    assert_eq!(suggestion.disproof.unwrap().card, Card::Suspect(Suspect::ColonelMustard));
    assert_eq!(game.players()[BOB].location, Location::Room(Room::Hall));
    assert!(game.players()[BOB].moved_by_suggestion);

    game.end_turn(ANN).unwrap();
    let answer = game.suggest(BOB, Suspect::ProfessorPlum, Weapon::Wrench).unwrap();
    assert_eq!(answer.room, Room::Hall);
    assert_eq!(answer.passed, Vec::<PlayerId>::new());
    assert_eq!(answer.disproof.unwrap().disprover, CAT);
    assert!(!game.players()[BOB].moved_by_suggestion);
}

/// Test a room entered on an earlier turn must be re-entered first.
#[test]
fn test_must_enter_room_this_turn() {
    let mut game = scripted(GameConfig::new(5));
    ann_walks_to_hall(&mut game);
    game.end_turn(ANN).unwrap();
    game.end_turn(BOB).unwrap();
    game.end_turn(CAT).unwrap();

    assert_eq!(
        game.suggest(ANN, Suspect::ProfessorPlum, Weapon::Wrench).unwrap_err(),
        GameError::MustEnterRoom(Room::Hall)
    );
}

/// Test eliminated players are still asked to disprove and are skipped in rotation.
#[test]
fn test_eliminated_player_still_disproves() {
    let mut game = scripted(GameConfig::new(5));
    game.end_turn(ANN).unwrap();

    let outcome = game
        .accuse(BOB, Suspect::MrGreen, Weapon::Rope, Room::Hall)
        .unwrap();
    assert_eq!(outcome, AccusationOutcome::Eliminated { winner: None });
    assert!(!game.players()[BOB].is_active);
    assert_eq!(game.current_player(), CAT);
    assert_eq!(game.end_turn(BOB).unwrap_err(), GameError::PlayerEliminated("Bob".to_string()));

    game.end_turn(CAT).unwrap();
    assert_eq!(game.current_player(), ANN);
    ann_walks_to_hall(&mut game);

    let suggestion = game.suggest(ANN, Suspect::MrGreen, Weapon::Knife).unwrap();
    assert_eq!(suggestion.disprover(), Some(BOB));
    game.end_turn(ANN).unwrap();
    assert_eq!(game.current_player(), CAT);
}

/// Test a correct accusation wins and ends the game.
#[test]
fn test_correct_accusation_wins() {
    let mut game = scripted(GameConfig::new(5));
    let outcome = game
        .accuse(ANN, Suspect::ProfessorPlum, Weapon::Wrench, Room::DiningRoom)
        .unwrap();

    assert_eq!(outcome, AccusationOutcome::Won);
    assert!(game.is_game_over());
    assert_eq!(game.winner(), Some(ANN));
    assert_eq!(game.roll_dice(ANN).unwrap_err(), GameError::GameOver);
    assert!(game
        .drain_events()
        .contains(&GameEvent::GameEnded(GameResult::Winner(ANN))));
}

/// Test the last active player wins by default.
#[test]
fn test_last_player_standing() {
    let mut game = scripted(GameConfig::new(5));
    game.accuse(ANN, Suspect::MrGreen, Weapon::Rope, Room::Hall).unwrap();
    let outcome = game.accuse(BOB, Suspect::MrGreen, Weapon::Rope, Room::Hall).unwrap();

    assert_eq!(outcome, AccusationOutcome::Eliminated { winner: Some(CAT) });
    assert_eq!(game.result(), Some(&GameResult::Winner(CAT)));
    assert_eq!(game.active_players().collect::<Vec<_>>(), vec![CAT]);
}

/// Test the turn cap ends the game in a draw.
#[test]
fn test_turn_cap_draws() {
    let mut game = scripted(GameConfig::new(5).with_max_turns(2));
    game.end_turn(ANN).unwrap();
    assert!(!game.is_game_over());
    game.end_turn(BOB).unwrap();
    assert_eq!(game.result(), Some(&GameResult::Draw));
    assert_eq!(game.winner(), None);
}

/// Test every accepted action lands in the history in order.
#[test]
fn test_action_history() {
    let mut game = scripted(GameConfig::new(5));
    game.roll_dice(ANN).unwrap();
    game.end_turn(ANN).unwrap();
    assert!(game.move_to_room(BOB, Room::Study).is_err());
    game.end_turn(BOB).unwrap();

    let actions: Vec<(PlayerId, Action, u32)> = game
        .history()
        .iter()
        .map(|r| (r.player, r.action, r.turn))
        .collect();
    assert_eq!(
        actions,
        vec![
            (ANN, Action::RollDice, 1),
            (ANN, Action::EndTurn, 1),
            (BOB, Action::EndTurn, 2),
        ]
    );
}

/// Test that from_deal rejects a deal that is not a partition.
#[test]
fn test_from_deal_rejects_bad_partition() {
    let mut rng = GameRng::new(1);
    let mut deal = Deal::new(3, &mut rng);
    let envelope_card = deal.solution.cards()[0];
    deal.hands[1].push(envelope_card);

    let seats = vec![
        ("Ann".to_string(), Suspect::MissScarlet),
        ("Bob".to_string(), Suspect::ColonelMustard),
        ("Cat".to_string(), Suspect::MrsWhite),
    ];
    assert!(matches!(
        GameState::from_deal(seats, deal, GameConfig::default(), Board::classic()),
        Err(GameError::InvalidSetup(_))
    ));
}

proptest! {
    /// Hands plus the envelope are the whole deck, each card once.
    #[test]
    fn prop_deal_partitions_deck(seed in any::<u64>(), player_count in 3usize..=6) {
        let names: Vec<String> = (0..player_count).map(|i| format!("P{i}")).collect();
        let game = GameState::setup(&names, GameConfig::new(seed), Board::classic()).unwrap();

        let mut seen = FxHashSet::default();
        for player in game.players().values() {
            for &card in &player.hand {
                prop_assert!(seen.insert(card));
            }
        }
        for card in game.solution().cards() {
            prop_assert!(seen.insert(card));
        }
        prop_assert_eq!(seen.len(), CARD_COUNT);

        let sizes: Vec<usize> = game.players().values().map(|p| p.hand.len()).collect();
        let max = *sizes.iter().max().unwrap();
        let min = *sizes.iter().min().unwrap();
        prop_assert!(max - min <= 1);
    }

    /// Dice are two faces in 1..=6 and each 1 is a magnifying glass.
    #[test]
    fn prop_dice_bounds(seed in any::<u64>()) {
        let mut rng = GameRng::new(seed);
        for _ in 0..20 {
            let roll = DiceRoll::roll(&mut rng);
            prop_assert!((1..=6).contains(&roll.die1));
            prop_assert!((1..=6).contains(&roll.die2));
            prop_assert_eq!(roll.budget(), roll.die1 + roll.die2);
            let glasses = [roll.die1, roll.die2].iter().filter(|&&d| d == MAGNIFYING_GLASS).count();
            prop_assert_eq!(roll.clue_count(), glasses);
        }
    }

    /// Disproof goes to the first seat clockwise holding a named card.
    #[test]
    fn prop_disproof_is_first_clockwise_holder(seed in any::<u64>(), suspect_ix in 0usize..6, weapon_ix in 0usize..6) {
        use strum::IntoEnumIterator;
        let names = ["A", "B", "C", "D"];
        let mut game = GameState::setup(&names, GameConfig::new(seed), Board::classic()).unwrap();
        let suspect = Suspect::iter().nth(suspect_ix).unwrap();
        let weapon = Weapon::iter().nth(weapon_ix).unwrap();

        // Pass turns until the first player can walk into a room.
        let first = game.current_player();
        let mut moved = false;
        for _ in 0..50 {
            let current = game.current_player();
            if current == first {
                game.roll_dice(current).unwrap();
                if let Some(reach) = game.reachable_rooms(current).first().cloned() {
                    game.move_to_room(current, reach.room).unwrap();
                    moved = true;
                    break;
                }
            }
            game.end_turn(current).unwrap();
        }
        prop_assume!(moved);

        let suggestion = game.suggest(first, suspect, weapon).unwrap();
        let named = suggestion.cards();
        let holders: Vec<PlayerId> = first
            .others_clockwise(game.player_count())
            .filter(|&p| named.iter().any(|&c| game.players()[p].holds(c)))
            .collect();

        prop_assert_eq!(suggestion.disprover(), holders.first().copied());
        if let Some(disproof) = suggestion.disproof {
            prop_assert!(game.players()[disproof.disprover].holds(disproof.card));
            prop_assert!(named.contains(&disproof.card));
            let expected_passed: Vec<PlayerId> = first
                .others_clockwise(game.player_count())
                .take_while(|&p| p != disproof.disprover)
                .collect();
            prop_assert_eq!(&suggestion.passed, &expected_passed);
        } else {
            prop_assert_eq!(suggestion.passed.len(), game.player_count() - 1);
        }
    }
}
