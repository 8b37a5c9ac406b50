//! Greedy move selection by heuristic score.

use tracing::debug;

use super::context::SearchContext;
use super::{forced, Decision, Strategy};
use crate::core::GameState;
use crate::eval::MoveEvaluator;
use crate::rules::GameEngine;

/// Plays the move with the highest `MoveEvaluator` score. Ties go to the
/// move generated first.
#[derive(Clone, Debug, Default)]
pub struct HeuristicStrategy {
    evaluator: MoveEvaluator,
}

impl HeuristicStrategy {
    #[must_use]
    pub fn new(evaluator: MoveEvaluator) -> Self {
        Self { evaluator }
    }
}

impl Strategy for HeuristicStrategy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn choose(
        &mut self,
        engine: &GameEngine,
        state: &GameState,
        ctx: &mut SearchContext,
    ) -> Decision {
        let moves = engine.legal_moves(state);
        if let Some(decision) = forced(&moves) {
            return decision;
        }

        let mut best = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (i, mv) in moves.iter().enumerate() {
            ctx.stats_mut().nodes += 1;
            let score = self.evaluator.score(engine, state, mv);
            if score.value > best_value {
                best_value = score.value;
                best = i;
            }
        }
        debug!(mv = %moves[best], score = best_value, "heuristic choice");
        Decision::Move(moves[best].clone())
    }
}
