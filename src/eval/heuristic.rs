//! Heuristic move scoring.
//!
//! Scores a candidate move in its position without searching. The result
//! carries the reasons that contributed, for move hints and logging.

use serde::{Deserialize, Serialize};

use crate::core::{Color, GameState, Move, PiecePosition};
use crate::rules::GameEngine;

/// Component weights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveWeights {
    pub finish: f64,
    pub enter: f64,
    pub advance: f64,
    pub backward: f64,
    /// First captured piece.
    pub capture: f64,
    /// Each captured piece after the first.
    pub extra_capture: f64,
    pub extra_turn: f64,
    /// Scaled by destination index over path length.
    pub progress: f64,
    /// Applied when an opponent can reach the destination next turn.
    pub danger: f64,
    /// Applied when no opponent can reach an unsafe destination.
    pub unreachable: f64,
}

impl Default for MoveWeights {
    fn default() -> Self {
        Self {
            finish: 100.0,
            enter: 40.0,
            advance: 20.0,
            backward: 5.0,
            capture: 60.0,
            extra_capture: 20.0,
            extra_turn: 45.0,
            progress: 10.0,
            danger: -35.0,
            unreachable: 15.0,
        }
    }
}

/// Why a move scored what it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reason {
    Finishes,
    Enters,
    Advances,
    MovesBackward,
    /// Number of opponent pieces sent home.
    Captures(u8),
    ExtraTurn,
    Threatened,
    OutOfReach,
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reason::Finishes => write!(f, "bears a piece off"),
            Reason::Enters => write!(f, "enters a new piece"),
            Reason::Advances => write!(f, "advances"),
            Reason::MovesBackward => write!(f, "moves backward"),
            Reason::Captures(1) => write!(f, "captures a piece"),
            Reason::Captures(n) => write!(f, "captures {} pieces", n),
            Reason::ExtraTurn => write!(f, "earns another roll"),
            Reason::Threatened => write!(f, "lands within reach of an opponent"),
            Reason::OutOfReach => write!(f, "lands out of reach"),
        }
    }
}

/// Score of one move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveScore {
    pub value: f64,
    pub reasons: Vec<Reason>,
}

/// Stateless move scorer.
#[derive(Clone, Debug, Default)]
pub struct MoveEvaluator {
    weights: MoveWeights,
}

impl MoveEvaluator {
    #[must_use]
    pub fn new(weights: MoveWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &MoveWeights {
        &self.weights
    }

    /// Score `mv` for the player to move in `state`.
    #[must_use]
    pub fn score(&self, engine: &GameEngine, state: &GameState, mv: &Move) -> MoveScore {
        let w = &self.weights;
        let mut value = 0.0;
        let mut reasons = Vec::new();

        let (base, reason) = if mv.to.is_finish() {
            (w.finish, Reason::Finishes)
        } else if mv.backwards {
            (w.backward, Reason::MovesBackward)
        } else if mv.enters_board() {
            (w.enter, Reason::Enters)
        } else {
            (w.advance, Reason::Advances)
        };
        value += base;
        reasons.push(reason);

        if mv.is_capture() {
            let extra = (mv.captured.len() - 1) as f64;
            value += w.capture + w.extra_capture * extra;
            reasons.push(Reason::Captures(mv.captured.len() as u8));
        }

        if mv.extra_turn {
            value += w.extra_turn;
            reasons.push(Reason::ExtraTurn);
        }

        let len = engine.path_len();
        let dest_index = match mv.to.position() {
            PiecePosition::OnPath(i) => i as usize,
            _ => len,
        };
        value += w.progress * dest_index as f64 / len as f64;

        if let Some(square) = mv.to.square() {
            if !engine.is_safe(square) {
                if self.reachable_by_opponent(engine, state, mv) {
                    value += w.danger;
                    reasons.push(Reason::Threatened);
                } else {
                    value += w.unreachable;
                    reasons.push(Reason::OutOfReach);
                }
            }
        }

        MoveScore { value, reasons }
    }

    /// Can any opponent piece land on the move's destination with a single
    /// roll of `1..=dice_count`, after the move's captures?
    fn reachable_by_opponent(&self, engine: &GameEngine, state: &GameState, mv: &Move) -> bool {
        let Some(target) = mv.to.square() else {
            return false;
        };
        let opponent: Color = state.current_player.opponent();
        let path = engine.path(opponent);
        let max_roll = engine.config().dice_count as usize;

        state
            .positions(opponent)
            .iter()
            .enumerate()
            .any(|(piece, &pos)| {
                let pos = if mv.captured.contains(&(piece as u8)) {
                    PiecePosition::AtStart
                } else {
                    pos
                };
                let base = match pos {
                    PiecePosition::AtStart => 0,
                    PiecePosition::OnPath(i) => i as usize + 1,
                    PiecePosition::Finished => return false,
                };
                (1..=max_roll).any(|roll| path.get(base + roll - 1) == Some(target))
            })
    }
}
