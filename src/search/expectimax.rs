//! Depth-limited expectimax with alpha-beta pruning.
//!
//! The tree alternates choice nodes (max for the searching color, min for
//! the opponent) with chance nodes over the next roll. Chance nodes group
//! raw dice by total, so a 4-dice roll costs 5 children rather than 16.
//!
//! In `ChancePruning::Sound` mode a chance node hands each outcome a window
//! computed from its own bounds, the probability mass already searched and
//! the largest possible score (Ballard's Star1). Once the outcomes seen so
//! far settle the expectation on one side of the window, the rest are
//! skipped.
//!
//! Leaves are scored with `PositionEvaluator`. A decided game scores
//! `±(WIN_SCORE + remaining depth)`, preferring faster wins and slower
//! losses.

use tracing::debug;

use super::config::{ChancePruning, SearchConfig};
use super::context::SearchContext;
use super::{forced, Decision, Strategy};
use crate::core::{Color, GameState, Move};
use crate::eval::PositionEvaluator;
use crate::rules::GameEngine;

/// Base score of a won or lost position.
pub const WIN_SCORE: f64 = 10_000.0;

pub(crate) fn terminal_score(winner: Color, me: Color, depth: u32) -> f64 {
    let score = WIN_SCORE + f64::from(depth);
    if winner == me {
        score
    } else {
        -score
    }
}

/// Minimax over moves, expectation over dice.
#[derive(Clone, Debug)]
pub struct ExpectimaxStrategy {
    depth: u32,
    evaluator: PositionEvaluator,
    pruning: ChancePruning,
}

impl ExpectimaxStrategy {
    #[must_use]
    pub fn new(depth: u32, evaluator: PositionEvaluator, pruning: ChancePruning) -> Self {
        Self {
            depth: depth.max(1),
            evaluator,
            pruning,
        }
    }

    #[must_use]
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.depth, PositionEvaluator::new(config.gamma), config.chance_pruning)
    }

    /// Value of a position reached by a move, with `depth` plies left.
    fn after_move(
        &self,
        engine: &GameEngine,
        state: &GameState,
        me: Color,
        depth: u32,
        alpha: f64,
        beta: f64,
        ctx: &mut SearchContext,
    ) -> f64 {
        if let Some(winner) = state.winner {
            return terminal_score(winner, me, depth);
        }
        if depth == 0 {
            return self.evaluator.evaluate(state, me, engine.path_len());
        }
        self.chance(engine, state, me, depth, alpha, beta, ctx)
    }

    fn chance(
        &self,
        engine: &GameEngine,
        state: &GameState,
        me: Color,
        depth: u32,
        alpha: f64,
        beta: f64,
        ctx: &mut SearchContext,
    ) -> f64 {
        ctx.stats_mut().nodes += 1;
        let outcomes = engine.chance_outcomes(state);

        if self.pruning == ChancePruning::Propagate {
            let mut expected = 0.0;
            for (roll, probability) in outcomes {
                let mut child = state.clone();
                engine.install_roll(&mut child, roll);
                expected += probability * self.choice(engine, &child, me, depth, alpha, beta, ctx);
            }
            return expected;
        }

        let bound = self.value_bound(engine);
        let mut seen = 0.0;
        let mut remaining = 1.0;
        for (roll, probability) in outcomes {
            let rest = (remaining - probability).max(0.0);
            // Outcome values at or beyond these settle the expectation.
            let low = (alpha - seen - rest * bound) / probability;
            let high = (beta - seen + rest * bound) / probability;

            let mut child = state.clone();
            engine.install_roll(&mut child, roll);
            let value = self.choice(engine, &child, me, depth, low, high, ctx);
            seen += probability * value;
            remaining = rest;

            if value <= low {
                ctx.stats_mut().cutoffs += 1;
                return seen + remaining * bound;
            }
            if value >= high {
                ctx.stats_mut().cutoffs += 1;
                return seen - remaining * bound;
            }
        }
        seen
    }

    /// No leaf scores beyond this in absolute value.
    fn value_bound(&self, engine: &GameEngine) -> f64 {
        let config = engine.config();
        let material = f64::from(config.pieces_per_player) * (engine.path_len() as f64 + 1.0);
        (WIN_SCORE + f64::from(self.depth)).max(material)
    }

    fn choice(
        &self,
        engine: &GameEngine,
        state: &GameState,
        me: Color,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        ctx: &mut SearchContext,
    ) -> f64 {
        ctx.stats_mut().nodes += 1;
        if ctx.checkpoint() {
            return self.evaluator.evaluate(state, me, engine.path_len());
        }

        let moves = engine.legal_moves(state);
        if moves.is_empty() {
            let mut child = state.clone();
            engine.pass_trusted(&mut child);
            return self.after_move(engine, &child, me, depth - 1, alpha, beta, ctx);
        }

        let maximizing = state.current_player == me;
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for mv in &moves {
            let mut child = state.clone();
            engine.apply_trusted(&mut child, mv);
            let value = self.after_move(engine, &child, me, depth - 1, alpha, beta, ctx);
            if maximizing {
                best = best.max(value);
                alpha = alpha.max(best);
            } else {
                best = best.min(value);
                beta = beta.min(best);
            }
            if alpha >= beta {
                ctx.stats_mut().cutoffs += 1;
                break;
            }
        }
        best
    }
}

impl Default for ExpectimaxStrategy {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl Strategy for ExpectimaxStrategy {
    fn name(&self) -> &'static str {
        "expectimax"
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
        debug!(
            mv = %moves[best],
            value,
            nodes = ctx.stats().nodes,
            cutoffs = ctx.stats().cutoffs,
            "expectimax choice"
        );
        Decision::Move(moves[best].clone())
    }
}

impl ExpectimaxStrategy {
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
        let mut alpha = f64::NEG_INFINITY;
        for (i, mv) in moves.iter().enumerate() {
            if i > 0 && ctx.stop_requested() {
                ctx.stats_mut().cancelled = true;
                break;
            }
            let mut child = state.clone();
            engine.apply_trusted(&mut child, mv);
            let value =
                self.after_move(engine, &child, me, self.depth - 1, alpha, f64::INFINITY, ctx);
            if value > alpha {
                alpha = value;
                best = i;
            }
        }
        (best, alpha)
    }
}
