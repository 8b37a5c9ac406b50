//! Turn sequencing between the engine and the two seats.
//!
//! Each decision is a two-step contract:
//!
//! 1. `on_turn_start` rolls for the active color if no roll is outstanding.
//! 2. `on_move_required` asks the active seat for a decision and applies it,
//!    or passes automatically when no legal move exists.
//!
//! A local seat answers immediately with its strategy. An external seat
//! (remote peer, human) leaves the request pending until `submit_move`
//! arrives. While a request is pending for a color, further requests for it
//! are ignored. Every mutation goes through the engine's validated entry
//! points and is reported to observers.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::observer::{GameEvent, StateObserver};
use crate::core::{Color, ColorMap, DiceRoll, DiceSource, GameRng, GameState, Move};
use crate::error::EngineError;
use crate::rules::GameEngine;
use crate::search::{
    BackgroundSearch, CancelToken, Decision, RandomStrategy, SearchContext, SearchStats, Strategy,
};

/// Who answers for a color.
pub enum Controller {
    /// Decides on this side with a strategy.
    Local(Box<dyn Strategy>),
    /// Decides elsewhere and reports through `submit_move`.
    External,
}

impl Controller {
    #[must_use]
    pub fn local(strategy: impl Strategy + 'static) -> Self {
        Controller::Local(Box::new(strategy))
    }

    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self, Controller::External)
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Controller::Local(strategy) => write!(f, "Local({})", strategy.name()),
            Controller::External => write!(f, "External"),
        }
    }
}

/// Result of one coordinator step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    Rolled(DiceRoll),
    Moved(Move),
    Passed,
    /// An external seat now owes a move.
    AwaitingExternal,
    /// Nothing to do: a roll is already outstanding, or a move request for
    /// this color is already pending.
    Ignored,
    GameOver(Color),
}

struct Seat {
    controller: Controller,
    context: SearchContext,
    pending: bool,
}

impl Seat {
    fn new(controller: Controller, context: SearchContext) -> Self {
        Self {
            controller,
            context,
            pending: false,
        }
    }
}

pub struct TurnCoordinator {
    engine: Arc<GameEngine>,
    state: GameState,
    seats: ColorMap<Seat>,
    dice: Box<dyn DiceSource + Send>,
    observers: Vec<Box<dyn StateObserver>>,
    move_time_limit: Option<Duration>,
    /// Source of fresh seat contexts.
    rng: GameRng,
    yield_interval: Option<Duration>,
}

impl TurnCoordinator {
    /// Coordinator for a fresh game. Dice and search randomness derive from
    /// `seed`.
    #[must_use]
    pub fn new(engine: Arc<GameEngine>, white: Controller, black: Controller, seed: u64) -> Self {
        let mut rng = GameRng::new(seed);
        let white_ctx = SearchContext::with_rng(rng.fork());
        let black_ctx = SearchContext::with_rng(rng.fork());
        let seats = ColorMap::from_pair(Seat::new(white, white_ctx), Seat::new(black, black_ctx));
        let dice = rng.fork();
        let state = engine.new_game();
        Self {
            engine,
            state,
            seats,
            dice: Box::new(dice),
            observers: Vec::new(),
            move_time_limit: None,
            rng,
            yield_interval: None,
        }
    }

    /// Replace the dice source (scripted games, replays).
    #[must_use]
    pub fn with_dice(mut self, dice: impl DiceSource + Send + 'static) -> Self {
        self.dice = Box::new(dice);
        self
    }

    /// Run local searches on a worker and cut them off after `limit`.
    #[must_use]
    pub fn with_move_time_limit(mut self, limit: Duration) -> Self {
        self.move_time_limit = Some(limit);
        self
    }

    /// Yield interval for both seats' searches.
    #[must_use]
    pub fn with_yield_interval(mut self, interval: Duration) -> Self {
        for color in Color::ALL {
            self.seats[color].context.set_yield_interval(interval);
        }
        self.yield_interval = Some(interval);
        self
    }

    pub fn add_observer(&mut self, observer: impl StateObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    #[must_use]
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn controller(&self, color: Color) -> &Controller {
        &self.seats[color].controller
    }

    /// A move request for `color` is outstanding.
    #[must_use]
    pub fn is_pending(&self, color: Color) -> bool {
        self.seats[color].pending
    }

    /// Statistics of `color`'s last search.
    #[must_use]
    pub fn last_search(&self, color: Color) -> &SearchStats {
        self.seats[color].context.stats()
    }

    /// Draw the first player and start play.
    pub fn start(&mut self) -> Result<Color, EngineError> {
        let first = self.engine.decide_first_player(&mut self.state, self.dice.as_mut())?;
        self.notify(&GameEvent::GameStarted { first });
        Ok(first)
    }

    /// Start play with a fixed first player.
    pub fn start_with(&mut self, first: Color) -> Result<(), EngineError> {
        self.engine.start_with(&mut self.state, first)?;
        self.notify(&GameEvent::GameStarted { first });
        Ok(())
    }

    /// Roll for the active color unless a roll is outstanding.
    pub fn on_turn_start(&mut self) -> Result<TurnOutcome, EngineError> {
        if let Some(winner) = self.state.winner {
            return Ok(TurnOutcome::GameOver(winner));
        }
        if self.state.dice.is_some() {
            return Ok(TurnOutcome::Ignored);
        }
        let color = self.state.current_player;
        let roll = self.engine.roll_dice(&mut self.state, self.dice.as_mut())?;
        self.notify(&GameEvent::DiceRolled {
            color,
            roll: roll.clone(),
        });
        Ok(TurnOutcome::Rolled(roll))
    }

    /// Ask the active seat for its decision.
    pub fn on_move_required(&mut self) -> Result<TurnOutcome, EngineError> {
        if let Some(winner) = self.state.winner {
            return Ok(TurnOutcome::GameOver(winner));
        }
        let color = self.state.current_player;
        if self.seats[color].pending {
            debug!(color = %color, "move already requested, ignoring");
            return Ok(TurnOutcome::Ignored);
        }
        if self.state.dice.is_none() {
            return Err(EngineError::DiceNotRolled { color });
        }

        if self.engine.legal_moves(&self.state).is_empty() {
            self.engine.pass(&mut self.state)?;
            self.notify(&GameEvent::Passed { color });
            return Ok(TurnOutcome::Passed);
        }

        if self.seats[color].controller.is_external() {
            self.seats[color].pending = true;
            debug!(color = %color, "awaiting external move");
            return Ok(TurnOutcome::AwaitingExternal);
        }

        self.seats[color].pending = true;
        let decision = self.decide(color);
        self.seats[color].pending = false;
        match decision {
            Decision::Move(mv) => self.apply(color, mv),
            Decision::Pass => {
                self.engine.pass(&mut self.state)?;
                self.notify(&GameEvent::Passed { color });
                Ok(TurnOutcome::Passed)
            }
        }
    }

    /// Move reported by an external seat for its pending request.
    pub fn submit_move(&mut self, color: Color, mv: Move) -> Result<TurnOutcome, EngineError> {
        let expected = self.state.current_player;
        if color != expected {
            return Err(EngineError::NotYourTurn {
                expected,
                actual: color,
            });
        }
        if !self.seats[color].pending {
            return Err(EngineError::illegal(format!("no move was requested from {color}")));
        }
        let outcome = self.apply(color, mv)?;
        self.seats[color].pending = false;
        Ok(outcome)
    }

    /// Roll and decide once. Returns the decision step's outcome.
    pub fn play_turn(&mut self) -> Result<TurnOutcome, EngineError> {
        if let TurnOutcome::GameOver(winner) = self.on_turn_start()? {
            return Ok(TurnOutcome::GameOver(winner));
        }
        self.on_move_required()
    }

    /// Play until someone wins, an external seat is owed a move, or
    /// `max_turns` decisions have been made.
    pub fn run(&mut self, max_turns: usize) -> Result<Option<Color>, EngineError> {
        for _ in 0..max_turns {
            match self.play_turn()? {
                TurnOutcome::GameOver(winner) => return Ok(Some(winner)),
                TurnOutcome::AwaitingExternal => return Ok(None),
                _ => {}
            }
        }
        Ok(self.state.winner)
    }

    fn decide(&mut self, color: Color) -> Decision {
        match self.move_time_limit {
            Some(limit) => self.decide_in_background(color, limit),
            None => {
                let seat = &mut self.seats[color];
                let Controller::Local(strategy) = &mut seat.controller else {
                    return Decision::Pass;
                };
                seat.context.begin();
                let decision = strategy.choose(&self.engine, &self.state, &mut seat.context);
                seat.context.finish();
                debug!(
                    color = %color,
                    strategy = strategy.name(),
                    decision = %decision,
                    nodes = seat.context.stats().nodes,
                    time_us = seat.context.stats().time_us,
                    "local decision"
                );
                decision
            }
        }
    }

    fn decide_in_background(&mut self, color: Color, limit: Duration) -> Decision {
        let seat = &mut self.seats[color];
        let Controller::Local(strategy) =
            std::mem::replace(&mut seat.controller, Controller::External)
        else {
            return Decision::Pass;
        };
        // Each search gets its own token: a timeout must not cancel the next one.
        let context = std::mem::replace(&mut seat.context, SearchContext::new(0))
            .with_cancel(CancelToken::new());
        let engine = Arc::clone(&self.engine);
        let search = BackgroundSearch::spawn(strategy, engine, self.state.clone(), context);
        match search.wait_timeout(limit) {
            Some(outcome) => {
                seat.controller = Controller::Local(outcome.strategy);
                seat.context = outcome.context;
                outcome.decision
            }
            None => {
                warn!(color = %color, "search worker lost, continuing with random moves");
                let mut context = SearchContext::with_rng(self.rng.fork());
                if let Some(interval) = self.yield_interval {
                    context.set_yield_interval(interval);
                }
                seat.context = context;
                seat.controller = Controller::local(RandomStrategy);
                RandomStrategy.choose(&self.engine, &self.state, &mut seat.context)
            }
        }
    }

    fn apply(&mut self, color: Color, mv: Move) -> Result<TurnOutcome, EngineError> {
        self.engine.apply_move(&mut self.state, &mv)?;
        self.notify(&GameEvent::MoveApplied { color, mv: mv.clone() });
        if let Some(winner) = self.state.winner {
            info!(winner = %winner, turns = self.state.turn, "game finished");
            self.notify(&GameEvent::GameOver { winner });
        }
        Ok(TurnOutcome::Moved(mv))
    }

    fn notify(&mut self, event: &GameEvent) {
        for observer in &mut self.observers {
            observer.on_event(&self.state, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::core::{PiecePosition, ScriptedDice};
    use crate::rules::VariantId;
    use crate::search::{HeuristicStrategy, MonteCarloStrategy};
    use crate::turn::RecordingObserver;

    fn finkel() -> Arc<GameEngine> {
        Arc::new(GameEngine::builtin(VariantId::Finkel).unwrap())
    }

    #[test]
    fn test_local_turn_rolls_and_moves() {
        let mut coord = TurnCoordinator::new(
            finkel(),
            Controller::local(HeuristicStrategy::default()),
            Controller::External,
            1,
        )
        .with_dice(ScriptedDice::from_totals(&[2], 4));
        let recorder = RecordingObserver::new();
        coord.add_observer(recorder.clone());
        coord.start_with(Color::White).unwrap();

        assert!(matches!(coord.on_turn_start().unwrap(), TurnOutcome::Rolled(r) if r.total == 2));
        assert_eq!(coord.on_turn_start().unwrap(), TurnOutcome::Ignored);
        let TurnOutcome::Moved(mv) = coord.on_move_required().unwrap() else {
            panic!("expected a move");
        };
        assert!(mv.enters_board());
        assert_eq!(coord.state().current_player, Color::Black);
        assert_eq!(recorder.len(), 3);
    }

    #[test]
    fn test_external_request_stays_pending() {
        let mut coord = TurnCoordinator::new(
            finkel(),
            Controller::External,
            Controller::External,
            1,
        )
        .with_dice(ScriptedDice::from_totals(&[1], 4));
        coord.start_with(Color::White).unwrap();
        coord.on_turn_start().unwrap();

        assert_eq!(coord.on_move_required().unwrap(), TurnOutcome::AwaitingExternal);
        assert!(coord.is_pending(Color::White));
        assert_eq!(coord.on_move_required().unwrap(), TurnOutcome::Ignored);

        let mv = coord.engine().legal_moves(coord.state())[0].clone();
        assert!(matches!(
            coord.submit_move(Color::Black, mv.clone()),
            Err(EngineError::NotYourTurn { .. })
        ));
        assert_eq!(coord.submit_move(Color::White, mv.clone()).unwrap(), TurnOutcome::Moved(mv));
        assert!(!coord.is_pending(Color::White));
    }

    #[test]
    fn test_illegal_submission_keeps_request_pending() {
        let mut coord = TurnCoordinator::new(
            finkel(),
            Controller::External,
            Controller::External,
            1,
        )
        .with_dice(ScriptedDice::from_totals(&[1], 4));
        coord.start_with(Color::White).unwrap();
        coord.on_turn_start().unwrap();
        coord.on_move_required().unwrap();

        let mut bogus = coord.engine().legal_moves(coord.state())[0].clone();
        bogus.piece = 3;
        bogus.from = PiecePosition::OnPath(9);
        let before = coord.state().clone();
        assert!(coord.submit_move(Color::White, bogus).is_err());
        assert_eq!(coord.state(), &before);
        assert!(coord.is_pending(Color::White));
    }

    #[test]
    fn test_zero_roll_passes() {
        let mut coord = TurnCoordinator::new(
            finkel(),
            Controller::External,
            Controller::External,
            1,
        )
        .with_dice(ScriptedDice::from_totals(&[0], 4));
        let recorder = RecordingObserver::new();
        coord.add_observer(recorder.clone());
        coord.start_with(Color::White).unwrap();

        assert_eq!(coord.play_turn().unwrap(), TurnOutcome::Passed);
        assert_eq!(coord.state().current_player, Color::Black);
        assert_eq!(recorder.events().last(), Some(&GameEvent::Passed { color: Color::White }));
    }

    #[test]
    fn test_move_required_before_roll_is_error() {
        let mut coord =
            TurnCoordinator::new(finkel(), Controller::External, Controller::External, 1);
        coord.start_with(Color::Black).unwrap();
        assert!(matches!(
            coord.on_move_required(),
            Err(EngineError::DiceNotRolled { color: Color::Black })
        ));
    }

    #[test]
    fn test_local_game_runs_to_a_winner() {
        let engine = Arc::new(GameEngine::builtin(VariantId::Blitz).unwrap());
        let mut coord = TurnCoordinator::new(
            engine,
            Controller::local(HeuristicStrategy::default()),
            Controller::local(RandomStrategy),
            7,
        );
        let recorder = RecordingObserver::new();
        coord.add_observer(recorder.clone());
        coord.start().unwrap();
        let winner = coord.run(10_000).unwrap();
        assert!(winner.is_some());
        assert_eq!(coord.state().winner, winner);
        assert!(matches!(recorder.events().last(), Some(GameEvent::GameOver { .. })));
        assert_eq!(coord.play_turn().unwrap(), TurnOutcome::GameOver(winner.unwrap()));
    }

    #[test]
    fn test_time_limited_search_keeps_strategy() {
        let mut coord = TurnCoordinator::new(
            finkel(),
            Controller::local(MonteCarloStrategy::new(4, 4)),
            Controller::External,
            3,
        )
        .with_move_time_limit(Duration::from_secs(5))
        .with_dice(ScriptedDice::from_totals(&[2], 4));
        coord.start_with(Color::White).unwrap();
        coord.on_turn_start().unwrap();
        assert!(matches!(coord.on_move_required().unwrap(), TurnOutcome::Moved(_)));
        assert!(matches!(
            coord.controller(Color::White),
            Controller::Local(s) if s.name() == "monte_carlo"
        ));
    }

    /// Records whether a stop was already requested when each search began.
    /// The first search runs until it is cut off.
    struct EntryRecorder {
        entries: Arc<Mutex<Vec<bool>>>,
    }

    impl Strategy for EntryRecorder {
        fn name(&self) -> &'static str {
            "entry_recorder"
        }

        fn choose(
            &mut self,
            engine: &GameEngine,
            state: &GameState,
            ctx: &mut SearchContext,
        ) -> Decision {
            let first = {
                let mut entries = self.entries.lock().unwrap();
                entries.push(ctx.stop_requested());
                entries.len() == 1
            };
            if first {
                while !ctx.checkpoint() {
                    std::thread::sleep(Duration::from_millis(1));
                }
            }
            Decision::Move(engine.legal_moves(state)[0].clone())
        }
    }

    #[test]
    fn test_timeout_does_not_cancel_next_search() {
        let entries = Arc::new(Mutex::new(Vec::new()));
        let recorder = EntryRecorder {
            entries: Arc::clone(&entries),
        };
        let white = Controller::local(recorder);
        let mut coord = TurnCoordinator::new(finkel(), white, Controller::External, 2)
            .with_move_time_limit(Duration::from_millis(50))
            .with_dice(ScriptedDice::from_totals(&[4, 2], 4));
        coord.start_with(Color::White).unwrap();

        // Roll 4 lands on a rosette, so White decides twice in a row.
        let TurnOutcome::Moved(mv) = coord.play_turn().unwrap() else {
            panic!("expected a move");
        };
        assert!(mv.extra_turn);
        assert!(coord.last_search(Color::White).cancelled);

        assert!(matches!(coord.play_turn().unwrap(), TurnOutcome::Moved(_)));
        assert!(!coord.last_search(Color::White).cancelled);
        assert_eq!(coord.state().current_player, Color::Black);
        assert_eq!(*entries.lock().unwrap(), vec![false, false]);
    }

    struct Crashing;

    impl Strategy for Crashing {
        fn name(&self) -> &'static str {
            "crashing"
        }

        fn choose(&mut self, _: &GameEngine, _: &GameState, _: &mut SearchContext) -> Decision {
            panic!("worker lost");
        }
    }

    #[test]
    fn test_lost_worker_falls_back_to_random() {
        let interval = Duration::from_millis(7);
        let white = Controller::local(Crashing);
        let mut coord = TurnCoordinator::new(finkel(), white, Controller::External, 4)
            .with_move_time_limit(Duration::from_secs(5))
            .with_yield_interval(interval)
            .with_dice(ScriptedDice::from_totals(&[2], 4));
        coord.start_with(Color::White).unwrap();

        let TurnOutcome::Moved(mv) = coord.play_turn().unwrap() else {
            panic!("expected a move");
        };
        assert!(mv.enters_board());
        assert!(matches!(
            coord.controller(Color::White),
            Controller::Local(s) if s.name() == "random"
        ));
        assert_eq!(coord.seats[Color::White].context.yield_interval(), interval);
    }
}
