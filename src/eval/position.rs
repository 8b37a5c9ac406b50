//! Static position evaluation, used at search leaves.

use serde::{Deserialize, Serialize};

use crate::core::{Color, GameState, PiecePosition};

/// Material-and-progress evaluator.
///
/// A finished piece is worth `path_len + 1`. A piece on the path is worth
/// `path_len * ((index + 1) / path_len)^gamma`, so `gamma > 1` values late
/// progress over early progress.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionEvaluator {
    pub gamma: f64,
}

impl Default for PositionEvaluator {
    fn default() -> Self {
        Self { gamma: 1.5 }
    }
}

impl PositionEvaluator {
    #[must_use]
    pub fn new(gamma: f64) -> Self {
        Self { gamma }
    }

    /// Value of one color's pieces alone.
    #[must_use]
    pub fn material(&self, state: &GameState, color: Color, path_len: usize) -> f64 {
        let len = path_len as f64;
        state
            .positions(color)
            .iter()
            .map(|&pos| match pos {
                PiecePosition::AtStart => 0.0,
                PiecePosition::OnPath(i) => len * ((i as f64 + 1.0) / len).powf(self.gamma),
                PiecePosition::Finished => len + 1.0,
            })
            .sum()
    }

    /// Own material minus the opponent's, from `color`'s point of view.
    #[must_use]
    pub fn evaluate(&self, state: &GameState, color: Color, path_len: usize) -> f64 {
        self.material(state, color, path_len) - self.material(state, color.opponent(), path_len)
    }
}
