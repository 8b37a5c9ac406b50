//! Sessions and turn coordination end to end.

use std::sync::Arc;

use rust_ur::config::{SeatConfig, SessionConfig};
use rust_ur::core::{Color, ScriptedDice};
use rust_ur::rules::{GameEngine, VariantId};
use rust_ur::search::{SearchConfig, StrategyKind};
use rust_ur::turn::{
    Controller, GameEvent, RecordingObserver, Session, TurnCoordinator, TurnOutcome,
};

#[test]
fn test_session_file_to_finished_game() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(
        &path,
        r#"{
            "variant": "Blitz",
            "white": { "type": "local", "strategy": { "kind": "monte_carlo" } },
            "black": { "type": "local", "strategy": { "kind": "heuristic" } },
            "search": { "samples": 2, "playout_depth": 3 },
            "seed": 11
        }"#,
    )
    .unwrap();

    let config = SessionConfig::load(&path).unwrap();
    let mut session = Session::new(config).unwrap();
    let recorder = RecordingObserver::new();
    session.add_observer(recorder.clone());
    session.start().unwrap();

    let winner = session.coordinator_mut().run(5_000).unwrap().unwrap();
    let events = recorder.events();
    assert!(matches!(events.first(), Some(GameEvent::GameStarted { .. })));
    assert_eq!(events.last(), Some(&GameEvent::GameOver { winner }));
    let moves = events
        .iter()
        .filter(|e| matches!(e, GameEvent::MoveApplied { .. }))
        .count();
    assert_eq!(moves, session.coordinator().state().history.len());
}

#[test]
fn test_same_seed_same_game() {
    let play = || {
        let config = SessionConfig::default()
            .with_variant("Finkel")
            .with_seats(
                SeatConfig::local(StrategyKind::Random),
                SeatConfig::local(StrategyKind::Heuristic),
            )
            .with_seed(123);
        let mut session = Session::new(config).unwrap();
        session.start().unwrap();
        session.coordinator_mut().run(5_000).unwrap();
        session.coordinator().state().clone()
    };
    assert_eq!(play(), play());
}

#[test]
fn test_external_seat_through_coordinator() {
    let engine = Arc::new(GameEngine::builtin(VariantId::Finkel).unwrap());
    let strategy = StrategyKind::Heuristic.build(&engine, &SearchConfig::default());
    let black = Controller::Local(strategy);
    let mut coord = TurnCoordinator::new(engine, Controller::External, black, 1)
        .with_dice(ScriptedDice::from_totals(&[4, 2, 1], 4));
    let recorder = RecordingObserver::new();
    coord.add_observer(recorder.clone());
    coord.start_with(Color::White).unwrap();

    // White rolls 4: the rosette grants a second decision.
    assert!(matches!(coord.on_turn_start().unwrap(), TurnOutcome::Rolled(_)));
    assert_eq!(coord.on_move_required().unwrap(), TurnOutcome::AwaitingExternal);
    let mv = coord.engine().legal_moves(coord.state())[0].clone();
    assert!(mv.extra_turn);
    coord.submit_move(Color::White, mv).unwrap();
    assert_eq!(coord.state().current_player, Color::White);

    // Second white decision, then black answers locally.
    coord.on_turn_start().unwrap();
    assert_eq!(coord.on_move_required().unwrap(), TurnOutcome::AwaitingExternal);
    let mv = coord.engine().legal_moves(coord.state())[0].clone();
    coord.submit_move(Color::White, mv).unwrap();
    assert_eq!(coord.state().current_player, Color::Black);

    assert!(matches!(coord.play_turn().unwrap(), TurnOutcome::Moved(_)));
    assert_eq!(coord.state().current_player, Color::White);
    assert_eq!(coord.state().history.len(), 3);
    assert!(recorder.events().iter().any(|e| matches!(
        e,
        GameEvent::DiceRolled {
            color: Color::Black,
            ..
        }
    )));
}

#[test]
fn test_time_limited_session() {
    let config = SessionConfig::default()
        .with_variant("Debug")
        .with_seats(
            SeatConfig::local(StrategyKind::Expectimax),
            SeatConfig::local(StrategyKind::Exhaustive),
        )
        .with_search(SearchConfig::default().with_depth(2).with_exhaustive_depth(2))
        .with_move_time_limit(std::time::Duration::from_secs(2));
    let mut session = Session::new(config).unwrap();
    session.start().unwrap();
    assert!(session.coordinator_mut().run(2_000).unwrap().is_some());
}
