//! Move selection strategies.
//!
//! ## Overview
//!
//! Every strategy implements [`Strategy`]: given the engine and a rolled
//! position it returns one [`Decision`]. Strategies share a few rules:
//!
//! - **Pass** exactly when no legal move exists
//! - **Forced moves**: a single legal move is returned without searching
//! - **Cooperative budget**: long searches call `SearchContext::checkpoint`
//!   and stop early when cancelled, returning their best move so far
//!
//! | Strategy      | Idea                                                  |
//! |---------------|-------------------------------------------------------|
//! | `random`      | uniform legal move                                    |
//! | `heuristic`   | best `MoveEvaluator` score                            |
//! | `expectimax`  | minimax over moves, expectation over rolls, alpha-beta |
//! | `exhaustive`  | expectimax over every raw dice combination, no pruning |
//! | `monte_carlo` | averaged random playouts                              |
//! | `neural`      | one ply scored by a value network                     |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::time::Duration;
//!
//! use rust_ur::search::{SearchConfig, SearchContext, StrategyKind};
//!
//! let config = SearchConfig::default();
//! let mut strategy = StrategyKind::Expectimax.build(&engine, &config);
//! let mut ctx = SearchContext::new(42)
//!     .with_yield_interval(Duration::from_millis(config.yield_interval_ms));
//! let decision = strategy.choose(&engine, &state, &mut ctx);
//! ```

pub mod background;
pub mod config;
pub mod context;
pub mod exhaustive;
pub mod expectimax;
pub mod heuristic;
pub mod monte_carlo;
pub mod neural;
pub mod random;
pub mod stats;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::{GameState, Move};
use crate::eval::PositionEvaluator;
use crate::nn::{ModelRegistry, Network};
use crate::rules::GameEngine;

pub use background::{BackgroundSearch, SearchOutcome};
pub use config::{ChancePruning, SearchConfig};
pub use context::{CancelToken, SearchContext};
pub use exhaustive::ExhaustiveStrategy;
pub use expectimax::{ExpectimaxStrategy, WIN_SCORE};
pub use heuristic::HeuristicStrategy;
pub use monte_carlo::MonteCarloStrategy;
pub use neural::NeuralStrategy;
pub use random::RandomStrategy;
pub use stats::SearchStats;

/// What a strategy wants to do with the current roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Move(Move),
    Pass,
}

impl Decision {
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Decision::Pass)
    }

    #[must_use]
    pub fn as_move(&self) -> Option<&Move> {
        match self {
            Decision::Move(mv) => Some(mv),
            Decision::Pass => None,
        }
    }

    #[must_use]
    pub fn into_move(self) -> Option<Move> {
        match self {
            Decision::Move(mv) => Some(mv),
            Decision::Pass => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Move(mv) => write!(f, "{mv}"),
            Decision::Pass => write!(f, "pass"),
        }
    }
}

/// A move-selection algorithm.
///
/// `choose` is called only for a Playing state with an outstanding roll.
/// Strategies keep whatever state they like between calls; they are moved
/// to a worker thread for background search, hence `Send`.
pub trait Strategy: Send {
    /// Short identifier used in logs and configuration.
    fn name(&self) -> &'static str;

    fn choose(
        &mut self,
        engine: &GameEngine,
        state: &GameState,
        ctx: &mut SearchContext,
    ) -> Decision;
}

/// Decision that needs no search: pass on no moves, the move on one.
pub(crate) fn forced(moves: &[Move]) -> Option<Decision> {
    match moves {
        [] => Some(Decision::Pass),
        [only] => Some(Decision::Move(only.clone())),
        _ => None,
    }
}

/// Serializable choice of strategy, as written in session files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyKind {
    Random,
    Heuristic,
    Expectimax,
    Exhaustive,
    MonteCarlo,
    /// Network loaded from a model file.
    Neural { model: PathBuf },
    /// Best registered network for the engine's variant.
    NeuralBest { models_dir: PathBuf },
}

impl StrategyKind {
    /// Build the strategy for `engine`. Neural strategies that cannot load
    /// their model degrade to random moves instead of failing.
    #[must_use]
    pub fn build(&self, engine: &GameEngine, config: &SearchConfig) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Random => Box::new(RandomStrategy),
            StrategyKind::Heuristic => Box::new(HeuristicStrategy::default()),
            StrategyKind::Expectimax => Box::new(ExpectimaxStrategy::from_config(config)),
            StrategyKind::Exhaustive => Box::new(ExhaustiveStrategy::new(
                config.exhaustive_depth,
                PositionEvaluator::new(config.gamma),
            )),
            StrategyKind::MonteCarlo => Box::new(MonteCarloStrategy::from_config(config)),
            StrategyKind::Neural { model } => {
                Box::new(NeuralStrategy::from_load(Network::load(model), engine))
            }
            StrategyKind::NeuralBest { models_dir } => {
                let loaded = ModelRegistry::open(models_dir.clone())
                    .and_then(|registry| registry.load(engine.variant().name()));
                Box::new(NeuralStrategy::from_load(loaded, engine))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;
    use crate::rules::VariantId;

    #[test]
    fn test_forced() {
        assert_eq!(forced(&[]), Some(Decision::Pass));
        assert!(forced(&[]).unwrap().is_pass());
    }

    #[test]
    fn test_strategy_kind_json() {
        let kind: StrategyKind = serde_json::from_str(r#"{ "kind": "monte_carlo" }"#).unwrap();
        assert_eq!(kind, StrategyKind::MonteCarlo);
        let kind: StrategyKind =
            serde_json::from_str(r#"{ "kind": "neural_best", "models_dir": "models" }"#).unwrap();
        assert_eq!(
            kind,
            StrategyKind::NeuralBest {
                models_dir: PathBuf::from("models")
            }
        );
    }

    #[test]
    fn test_build_names() {
        let engine = GameEngine::builtin(VariantId::Finkel).unwrap();
        let config = SearchConfig::default();
        let cases = [
            (StrategyKind::Random, "random"),
            (StrategyKind::Heuristic, "heuristic"),
            (StrategyKind::Expectimax, "expectimax"),
            (StrategyKind::Exhaustive, "exhaustive"),
            (StrategyKind::MonteCarlo, "monte_carlo"),
        ];
        for (kind, name) in cases {
            assert_eq!(kind.build(&engine, &config).name(), name);
        }
    }

    #[test]
    fn test_missing_model_builds_degraded_neural() {
        let engine = GameEngine::builtin(VariantId::Finkel).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let kind = StrategyKind::NeuralBest {
            models_dir: dir.path().to_path_buf(),
        };
        let mut strategy = kind.build(&engine, &SearchConfig::default());
        assert_eq!(strategy.name(), "neural");

        let mut state = engine.new_game();
        engine.start_with(&mut state, Color::White).unwrap();
        engine
            .roll_dice(&mut state, &mut crate::core::ScriptedDice::from_totals(&[2], 4))
            .unwrap();
        let legal = engine.legal_moves(&state);
        let decision = strategy.choose(&engine, &state, &mut SearchContext::new(3));
        assert!(legal.contains(decision.as_move().unwrap()));
    }
}
