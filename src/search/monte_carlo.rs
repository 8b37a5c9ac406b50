//! Monte Carlo move evaluation by random playouts.
//!
//! Each candidate move is applied and followed by a fixed number of random
//! playouts of bounded depth. The positional value at the end of each
//! playout is averaged, and optionally blended with the heuristic score.

use tracing::debug;

use super::config::SearchConfig;
use super::context::SearchContext;
use super::{forced, Decision, Strategy};
use crate::core::{Color, DiceSource, GameState};
use crate::eval::{MoveEvaluator, PositionEvaluator};
use crate::rules::GameEngine;

#[derive(Clone, Debug)]
pub struct MonteCarloStrategy {
    samples: u32,
    playout_depth: u32,
    heuristic_weight: f64,
    evaluator: PositionEvaluator,
    heuristic: MoveEvaluator,
}

impl MonteCarloStrategy {
    #[must_use]
    pub fn new(samples: u32, playout_depth: u32) -> Self {
        Self {
            samples: samples.max(1),
            playout_depth,
            heuristic_weight: 0.0,
            evaluator: PositionEvaluator::default(),
            heuristic: MoveEvaluator::default(),
        }
    }

    #[must_use]
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.samples, config.playout_depth)
            .with_heuristic_weight(config.heuristic_weight)
            .with_evaluator(PositionEvaluator::new(config.gamma))
    }

    /// Blend weight of the heuristic score, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_heuristic_weight(mut self, weight: f64) -> Self {
        self.heuristic_weight = weight.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_evaluator(mut self, evaluator: PositionEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Play random moves from `state` for up to `playout_depth` plies.
    fn playout(&self, engine: &GameEngine, state: &mut GameState, ctx: &mut SearchContext) {
        let dice = engine.config().dice_count as usize;
        for _ in 0..self.playout_depth {
            if state.is_over() {
                break;
            }
            let raw = ctx.rng().draw(dice);
            let roll = engine.dice_outcome(state, &raw);
            engine.install_roll(state, roll);

            let moves = engine.legal_moves(state);
            if moves.is_empty() {
                engine.pass_trusted(state);
            } else {
                let index = ctx.rng().gen_index(moves.len());
                engine.apply_trusted(state, &moves[index]);
            }
        }
    }

    /// Mean playout value of `after`, or `None` if stopped before the
    /// first sample.
    fn sample(
        &self,
        engine: &GameEngine,
        after: &GameState,
        me: Color,
        ctx: &mut SearchContext,
    ) -> Option<f64> {
        let mut total = 0.0;
        let mut count = 0u32;
        for _ in 0..self.samples {
            if ctx.checkpoint() {
                break;
            }
            let mut sim = after.clone();
            self.playout(engine, &mut sim, ctx);
            total += self.evaluator.evaluate(&sim, me, engine.path_len());
            count += 1;
            ctx.stats_mut().simulations += 1;
        }
        (count > 0).then(|| total / f64::from(count))
    }
}

impl Default for MonteCarloStrategy {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl Strategy for MonteCarloStrategy {
    fn name(&self) -> &'static str {
        "monte_carlo"
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

        let me = state.current_player;
        let mut best = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (i, mv) in moves.iter().enumerate() {
            ctx.stats_mut().nodes += 1;
            let mut after = state.clone();
            engine.apply_trusted(&mut after, mv);

            let Some(mean) = self.sample(engine, &after, me, ctx) else {
                break;
            };
            let value = if self.heuristic_weight > 0.0 {
                let h = self.heuristic.score(engine, state, mv).value;
                (1.0 - self.heuristic_weight) * mean + self.heuristic_weight * h
            } else {
                mean
            };
            if value > best_value {
                best_value = value;
                best = i;
            }
        }
        debug!(
            mv = %moves[best],
            value = best_value,
            simulations = ctx.stats().simulations,
            "monte carlo choice"
        );
        Decision::Move(moves[best].clone())
    }
}
