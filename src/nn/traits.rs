//! Value network interface.

use serde::{Deserialize, Serialize};

/// Encoded position as a flat feature vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened features.
    pub tensor: Vec<f32>,

    /// Shape of the tensor (`[features]` for the race encoding).
    pub shape: Vec<usize>,
}

impl EncodedState {
    pub fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            tensor.len(),
            shape.iter().product::<usize>(),
            "Tensor length must match shape product"
        );
        Self { tensor, shape }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.tensor.get(index).copied()
    }
}

/// Predicts the win probability of the player to move.
pub trait ValueNetwork: Send + Sync {
    /// Win probability in `[0, 1]` for the mover of the encoded position.
    fn predict(&self, encoded: &EncodedState) -> f32;

    fn predict_batch(&self, encoded: &[EncodedState]) -> Vec<f32> {
        encoded.iter().map(|e| self.predict(e)).collect()
    }
}

/// Fixed-output network (baseline for testing).
#[derive(Clone, Copy, Debug, Default)]
pub struct ConstantValue(pub f32);

impl ValueNetwork for ConstantValue {
    fn predict(&self, _encoded: &EncodedState) -> f32 {
        self.0
    }
}
