//! Session API tests.
//!
//! These tests verify:
//! - Name-addressed actions and lookup errors
//! - What each player's notebook learns from play
//! - Notebook gating of accusations
//! - Whole seeded games played through the session

use clue_engine::cards::{Card, Deal, Room, Solution, Suspect, Weapon};
use clue_engine::core::{GameConfig, GameError, PlayerId};
use clue_engine::game::AccusationOutcome;
use clue_engine::notebook::{CardStatus, Owner};
use clue_engine::rules::{GameResult, GameSession};
use proptest::prelude::*;

/// Ann (Scarlet), Bob (Mustard), Cat (White); the envelope holds
/// Professor Plum with the Wrench in the Dining Room.
fn scripted(config: GameConfig) -> GameSession {
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
    let mut session = GameSession::new(config);
    session.setup_with_deal(seats, deal).unwrap();
    session
}

/// Pass turns until Ann rolls enough to reach the Hall, then walk her in.
fn ann_walks_to_hall(session: &mut GameSession) {
    for _ in 0..200 {
        assert_eq!(session.current_player().unwrap(), "Ann");
        if session.roll_dice("Ann").unwrap().budget() >= 6 {
            session.move_to_room("Ann", "hall").unwrap();
            return;
        }
        session.end_turn("Ann").unwrap();
        session.end_turn("Bob").unwrap();
        session.end_turn("Cat").unwrap();
    }
    panic!("Ann never reached the Hall");
}

fn seat(ix: u8) -> Owner {
    Owner::Player(PlayerId::new(ix))
}

/// Test lookups before and after setup.
#[test]
fn test_session_lifecycle() {
    let mut session = GameSession::new(GameConfig::new(3));
    assert!(!session.is_started());
    assert_eq!(session.current_player(), Err(GameError::NoGame));
    assert_eq!(session.roll_dice("Ann").unwrap_err(), GameError::NoGame);
    assert!(!session.is_game_over());

    session.setup(&["Ann", "Bob", "Cat"]).unwrap();
    assert!(session.is_started());
    assert_eq!(
        session.roll_dice("Zed").unwrap_err(),
        GameError::UnknownPlayer("Zed".to_string())
    );
    assert!(matches!(
        session.make_suggestion("Ann", "Nobody", "Rope"),
        Err(GameError::UnknownCard(_))
    ));

    session.reset();
    assert!(!session.is_started());
    assert!(session.notebook("Ann").is_err());
}

/// Test each notebook starts from its owner's hand only.
#[test]
fn test_notebooks_know_own_hand() {
    let session = scripted(GameConfig::new(5));

    let ann = session.notebook("Ann").unwrap();
    assert_eq!(ann.owner(), PlayerId::new(0));
    assert_eq!(ann.owner_of(Card::Suspect(Suspect::MissScarlet)), Some(seat(0)));
    assert_eq!(
        ann.status(Card::Room(Room::Hall), seat(0)),
        Some(CardStatus::DoesNotHave)
    );
    assert_eq!(ann.owner_of(Card::Room(Room::Hall)), None);

    let cat = session.notebook("Cat").unwrap();
    assert_eq!(cat.owner_of(Card::Room(Room::Hall)), Some(seat(2)));
    assert_eq!(cat.owner_of(Card::Suspect(Suspect::MissScarlet)), None);
}

/// Test the shown card reaches only the suggester, while passes reach everyone.
#[test]
fn test_suggestion_visibility() {
    let mut session = scripted(GameConfig::new(5));
    ann_walks_to_hall(&mut session);

    let reply = session.make_suggestion("Ann", "professor plum", "WRENCH").unwrap();
    assert_eq!(reply.suggestion.disprover(), Some(PlayerId::new(2)));
    assert_eq!(reply.suggestion.passed, vec![PlayerId::new(1)]);

    let hall = Card::Room(Room::Hall);
    assert_eq!(session.notebook("Ann").unwrap().owner_of(hall), Some(seat(2)));

    for viewer in ["Ann", "Bob", "Cat"] {
        let notebook = session.notebook(viewer).unwrap();
        for card in reply.suggestion.cards() {
            assert_eq!(notebook.status(card, seat(1)), Some(CardStatus::DoesNotHave));
        }
        assert_eq!(notebook.suggestion_log().len(), 1);
    }
    assert_eq!(session.notebook("Bob").unwrap().suggestion_log()[0].shown, None);
    assert_eq!(
        session.notebook("Ann").unwrap().suggestion_log()[0].shown,
        Some(hall)
    );

    // Naming the Hall again is flagged as already resolved.
    let check = session
        .notebook("Ann")
        .unwrap()
        .validate_suggestion(Suspect::ProfessorPlum, Weapon::Wrench, Room::Hall);
    assert!(!check.is_useful());
    assert_eq!(check.wasted.len(), 1);
}

/// Test a contradicted accusation is refused and changes nothing.
#[test]
fn test_gated_accusation_blocked() {
    let mut session = scripted(GameConfig::new(5));

    let err = session
        .make_accusation("Ann", "Miss Scarlet", "Wrench", "Dining Room")
        .unwrap_err();
    match err {
        GameError::AccusationBlocked { problems } => {
            assert_eq!(problems.len(), 1);
            assert_eq!(problems[0].card(), Card::Suspect(Suspect::MissScarlet));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(session.game().unwrap().players()[PlayerId::new(0)].is_active);
    assert_eq!(session.current_player().unwrap(), "Ann");

    // Turn errors win over gating.
    assert!(matches!(
        session.make_accusation("Bob", "Miss Scarlet", "Wrench", "Dining Room"),
        Err(GameError::NotYourTurn { .. })
    ));
}

/// Test the gate refuses a weapon other than the one deduced into the envelope.
#[test]
fn test_gate_uses_deduced_envelope_card() {
    let mut session = scripted(GameConfig::new(5));

    session.mark_does_not_have("Ann", "wrench", "Bob").unwrap();
    session.mark_does_not_have("Ann", "wrench", "Cat").unwrap();
    assert_eq!(
        session
            .notebook("Ann")
            .unwrap()
            .status(Card::Weapon(Weapon::Wrench), Owner::Envelope),
        Some(CardStatus::Has)
    );

    let err = session
        .make_accusation("Ann", "Professor Plum", "Rope", "Dining Room")
        .unwrap_err();
    match err {
        GameError::AccusationBlocked { problems } => {
            assert_eq!(problems.len(), 1);
            assert_eq!(problems[0].card(), Card::Weapon(Weapon::Rope));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(session.game().unwrap().players()[PlayerId::new(0)].is_active);
    assert_eq!(session.current_player().unwrap(), "Ann");
}

/// Test that without gating a wrong accusation eliminates and passes the turn.
#[test]
fn test_ungated_accusation_eliminates() {
    let mut session = scripted(GameConfig::new(5).ungated());

    let reply = session
        .make_accusation("Ann", "Miss Scarlet", "Wrench", "Dining Room")
        .unwrap();
    assert_eq!(reply.outcome, AccusationOutcome::Eliminated { winner: None });
    assert!(!reply.check.is_valid());
    assert_eq!(session.current_player().unwrap(), "Bob");
    assert_eq!(
        session.roll_dice("Ann").unwrap_err(),
        GameError::PlayerEliminated("Ann".to_string())
    );

    let reply = session
        .make_accusation("Bob", "Professor Plum", "Wrench", "Dining Room")
        .unwrap();
    assert_eq!(reply.outcome, AccusationOutcome::Won);
    assert_eq!(session.winner(), Some("Bob"));
    assert!(session.is_game_over());
    assert_eq!(session.end_turn("Cat").unwrap_err(), GameError::GameOver);
}

/// Test manual marks by name, including the envelope.
#[test]
fn test_manual_marks_by_name() {
    let mut session = scripted(GameConfig::new(5));

    let changed = session.mark_has("Ann", "colonel mustard", "Bob").unwrap();
    assert!(changed >= 2);
    assert_eq!(session.mark_has("Ann", "Colonel Mustard", "Bob").unwrap(), 0);
    assert!(matches!(
        session.mark_has("Ann", "Colonel Mustard", "Cat"),
        Err(GameError::Notebook(_))
    ));

    session.mark_does_not_have("Ann", "rope", "envelope").unwrap();
    assert_eq!(
        session
            .notebook("Ann")
            .unwrap()
            .status(Card::Weapon(Weapon::Rope), Owner::Envelope),
        Some(CardStatus::DoesNotHave)
    );
    // Bob's notebook is untouched.
    assert_eq!(
        session
            .notebook("Bob")
            .unwrap()
            .status(Card::Weapon(Weapon::Rope), Owner::Envelope),
        Some(CardStatus::Unknown)
    );
    assert!(matches!(
        session.mark_has("Ann", "rope", "Zed"),
        Err(GameError::UnknownPlayer(_))
    ));
}

/// Play one turn: accuse when the notebook allows it, otherwise head for the
/// nearest room and suggest the first open suspect and weapon.
fn play_turn(session: &mut GameSession) -> Option<AccusationOutcome> {
    let name = session.current_player().unwrap().to_string();

    let accuse = |session: &mut GameSession| {
        let solution = session.notebook(&name).unwrap().accusation_recommendation()?;
        let reply = session
            .make_accusation(
                &name,
                &solution.suspect.to_string(),
                &solution.weapon.to_string(),
                &solution.room.to_string(),
            )
            .unwrap();
        assert!(reply.check.is_valid());
        Some(reply.outcome)
    };
    if let Some(outcome) = accuse(session) {
        return Some(outcome);
    }

    let seat = session.game().unwrap().player_id(&name).unwrap();
    let pulled = session.game().unwrap().players()[seat].moved_by_suggestion;
    let mut in_room = pulled;
    if !pulled {
        session.roll_dice(&name).unwrap();
        if let Some(target) = session.reachable_rooms(&name).unwrap().first().cloned() {
            session.move_to_room(&name, &target.room.to_string()).unwrap();
            in_room = true;
        }
    }

    if in_room {
        let notebook = session.notebook(&name).unwrap();
        let pick = notebook.strategic_suggestion();
        let suspect = pick.suspect.unwrap_or(Suspect::MissScarlet);
        let weapon = pick.weapon.unwrap_or(Weapon::Rope);
        session
            .make_suggestion(&name, &suspect.to_string(), &weapon.to_string())
            .unwrap();
        if let Some(outcome) = accuse(session) {
            return Some(outcome);
        }
    }

    session.end_turn(&name).unwrap();
    None
}

/// Check every known cell in every notebook against the real deal.
fn assert_notebooks_truthful(session: &GameSession) {
    let game = session.game().unwrap();
    let truth = |card: Card| {
        game.players()
            .iter()
            .find(|(_, p)| p.holds(card))
            .map_or(Owner::Envelope, |(seat, _)| Owner::Player(seat))
    };
    let owners: Vec<Owner> = (0..game.player_count() as u8)
        .map(seat)
        .chain([Owner::Envelope])
        .collect();

    for (_, player) in game.players().iter() {
        let notebook = session.notebook(&player.name).unwrap();
        for card in Card::all() {
            for &owner in &owners {
                match notebook.status(card, owner).unwrap() {
                    CardStatus::Has => assert_eq!(owner, truth(card), "{}: {card}", player.name),
                    CardStatus::DoesNotHave => assert_ne!(owner, truth(card), "{}: {card}", player.name),
                    CardStatus::Unknown => {}
                }
            }
        }
    }
}

fn play_out(seed: u64, names: &[&str]) -> GameSession {
    let mut session = GameSession::new(GameConfig::new(seed).with_max_turns(400));
    session.setup(names).unwrap();

    for _ in 0..2_000 {
        if session.is_game_over() {
            break;
        }
        if let Some(outcome) = play_turn(&mut session) {
            // Notebook-sanctioned accusations are always right.
            assert_eq!(outcome, AccusationOutcome::Won);
        }
        assert_notebooks_truthful(&session);
    }
    session
}

/// Test a seeded bot game runs to completion.
#[test]
fn test_full_game_completes() {
    let session = play_out(11, &["Ann", "Bob", "Cat", "Dan"]);
    assert!(session.is_game_over());

    let game = session.game().unwrap();
    if let Some(GameResult::Winner(seat)) = game.result() {
        let winner = &game.players()[*seat];
        assert_eq!(session.winner(), Some(winner.name.as_str()));
        let notebook = session.notebook(&winner.name).unwrap();
        assert_eq!(notebook.accusation_recommendation(), Some(*game.solution()));
    }
}

/// Test the same seed replays the same game.
#[test]
fn test_seeded_games_replay() {
    let names = ["Ann", "Bob", "Cat"];
    let first = play_out(29, &names);
    let second = play_out(29, &names);

    let (a, b) = (first.game().unwrap(), second.game().unwrap());
    assert_eq!(a.solution(), b.solution());
    assert_eq!(a.result(), b.result());
    assert_eq!(a.history(), b.history());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// Notebooks fed by live play never record anything false.
    #[test]
    fn prop_bot_games_keep_notebooks_truthful(seed in any::<u64>(), players in 3usize..=6) {
        let names = ["Ann", "Bob", "Cat", "Dan", "Eve", "Fay"];
        let session = play_out(seed, &names[..players]);
        prop_assert!(session.is_game_over());
    }
}
