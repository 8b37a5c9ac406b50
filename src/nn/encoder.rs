//! Position encoding for network input.

use crate::core::{Color, GameState};
use crate::nn::traits::EncodedState;

/// Encodes a game state from one color's perspective.
pub trait StateEncoder: Send + Sync {
    fn encode(&self, state: &GameState, perspective: Color) -> EncodedState;

    fn output_shape(&self) -> Vec<usize>;
}

/// Race encoding used by the trained models.
///
/// The perspective color's piece ordinals sorted ascending, then the
/// opponent's, each divided by the finish ordinal (`path_len + 1`) so every
/// feature lies in `[0, 1]`. Sorting makes the encoding independent of
/// piece numbering.
///
/// Total features = 2 * pieces_per_player
#[derive(Clone, Debug)]
pub struct RaceEncoder {
    pieces_per_player: usize,
    path_len: usize,
}

impl RaceEncoder {
    pub fn new(pieces_per_player: usize, path_len: usize) -> Self {
        Self {
            pieces_per_player,
            path_len,
        }
    }

    /// Ordinal of a finished piece.
    #[must_use]
    pub fn finish_position(&self) -> usize {
        self.path_len + 1
    }

    fn sorted_features(&self, state: &GameState, color: Color) -> impl Iterator<Item = f32> {
        let mut ordinals: Vec<usize> = state
            .positions(color)
            .iter()
            .map(|p| p.ordinal(self.path_len))
            .collect();
        ordinals.sort_unstable();
        let scale = self.finish_position() as f32;
        ordinals.into_iter().map(move |o| o as f32 / scale)
    }
}

impl StateEncoder for RaceEncoder {
    fn encode(&self, state: &GameState, perspective: Color) -> EncodedState {
        let tensor: Vec<f32> = self
            .sorted_features(state, perspective)
            .chain(self.sorted_features(state, perspective.opponent()))
            .collect();
        let len = tensor.len();
        EncodedState::new(tensor, vec![len])
    }

    fn output_shape(&self) -> Vec<usize> {
        vec![2 * self.pieces_per_player]
    }
}
