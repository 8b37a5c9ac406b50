//! Full expectimax enumeration without pruning.
//!
//! Every raw dice combination (all `2^dice_count`, not grouped by total)
//! and every legal move is visited down to the depth limit. Only practical
//! for small variants or shallow depths; it reports every node through
//! `SearchContext::checkpoint`.

use tracing::debug;

use super::context::SearchContext;
use super::expectimax::terminal_score;
use super::{forced, Decision, Strategy};
use crate::core::dice::DiceBits;
use crate::core::{Color, GameState, Move};
use crate::eval::PositionEvaluator;
use crate::rules::GameEngine;

#[derive(Clone, Debug)]
pub struct ExhaustiveStrategy {
    depth: u32,
    evaluator: PositionEvaluator,
}

impl ExhaustiveStrategy {
    #[must_use]
    pub fn new(depth: u32, evaluator: PositionEvaluator) -> Self {
        Self {
            depth: depth.max(1),
            evaluator,
        }
    }

    fn after_move(
        &self,
        engine: &GameEngine,
        state: &GameState,
        me: Color,
        depth: u32,
        ctx: &mut SearchContext,
    ) -> f64 {
        if let Some(winner) = state.winner {
            return terminal_score(winner, me, depth);
        }
        if depth == 0 || ctx.checkpoint() {
            return self.evaluator.evaluate(state, me, engine.path_len());
        }

        let n = engine.config().dice_count as usize;
        let combinations = 1u32 << n;
        let weight = 1.0 / f64::from(combinations);
        let mut expected = 0.0;
        for mask in 0..combinations {
            let raw: DiceBits = (0..n).map(|bit| mask >> bit & 1 == 1).collect();
            let mut child = state.clone();
            let roll = engine.dice_outcome(&child, &raw);
            engine.install_roll(&mut child, roll);
            expected += weight * self.choice(engine, &child, me, depth, ctx);
        }
        expected
    }

    fn choice(
        &self,
        engine: &GameEngine,
        state: &GameState,
        me: Color,
        depth: u32,
        ctx: &mut SearchContext,
    ) -> f64 {
        ctx.stats_mut().nodes += 1;
        let moves = engine.legal_moves(state);
        if moves.is_empty() {
            let mut child = state.clone();
            engine.pass_trusted(&mut child);
            return self.after_move(engine, &child, me, depth - 1, ctx);
        }

        let values = moves.iter().map(|mv| {
            let mut child = state.clone();
            engine.apply_trusted(&mut child, mv);
            self.after_move(engine, &child, me, depth - 1, ctx)
        });
        if state.current_player == me {
            values.fold(f64::NEG_INFINITY, f64::max)
        } else {
            values.fold(f64::INFINITY, f64::min)
        }
    }
}

impl Strategy for ExhaustiveStrategy {
    fn name(&self) -> &'static str {
        "exhaustive"
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

        let (best, value) = self.search_root(engine, state, &moves, ctx);
        debug!(mv = %moves[best], value, nodes = ctx.stats().nodes, "exhaustive choice");
        Decision::Move(moves[best].clone())
    }
}

impl ExhaustiveStrategy {
    /// Index and value of the best root move.
    pub(crate) fn search_root(
        &self,
        engine: &GameEngine,
        state: &GameState,
        moves: &[Move],
        ctx: &mut SearchContext,
    ) -> (usize, f64) {
        let me = state.current_player;
        let mut best = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (i, mv) in moves.iter().enumerate() {
            if i > 0 && ctx.stop_requested() {
                ctx.stats_mut().cancelled = true;
                break;
            }
            ctx.stats_mut().nodes += 1;
            let mut child = state.clone();
            engine.apply_trusted(&mut child, mv);
            let value = self.after_move(engine, &child, me, self.depth - 1, ctx);
            if value > best_value {
                best_value = value;
                best = i;
            }
        }
        (best, best_value)
    }
}
