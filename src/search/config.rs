//! Search configuration parameters.

use serde::{Deserialize, Serialize};

/// How alpha-beta bounds are treated at chance nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChancePruning {
    /// Each dice outcome gets the narrowest window that can still change
    /// the expectation, derived from the parent bounds, the outcomes already
    /// seen and the range of the evaluation. Returns the exact value.
    #[default]
    Sound,
    /// The parent's bounds are handed to every outcome. Faster, but the
    /// expectation can be cut on a bound that does not hold for an average.
    Propagate,
}

/// Search configuration parameters shared by every strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched by expectimax (choice nodes, each followed by a roll).
    pub depth: u32,

    /// Plies searched by the exhaustive strategy. Keep small.
    pub exhaustive_depth: u32,

    /// Monte Carlo playouts per candidate move.
    pub samples: u32,

    /// Plies per Monte Carlo playout.
    pub playout_depth: u32,

    /// Weight of the heuristic score in the Monte Carlo blend (0 = playouts only).
    pub heuristic_weight: f64,

    /// Exponent of the positional evaluator's progress curve.
    pub gamma: f64,

    pub chance_pruning: ChancePruning,

    /// Wall-clock interval between cooperative yields, in milliseconds.
    pub yield_interval_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            exhaustive_depth: 2,
            samples: 64,
            playout_depth: 12,
            heuristic_weight: 0.0,
            gamma: 1.5,
            chance_pruning: ChancePruning::Sound,
            yield_interval_ms: 100,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_exhaustive_depth(mut self, depth: u32) -> Self {
        self.exhaustive_depth = depth;
        self
    }

    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_playout_depth(mut self, depth: u32) -> Self {
        self.playout_depth = depth;
        self
    }

    pub fn with_heuristic_weight(mut self, weight: f64) -> Self {
        self.heuristic_weight = weight;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_chance_pruning(mut self, pruning: ChancePruning) -> Self {
        self.chance_pruning = pruning;
        self
    }

    pub fn with_yield_interval_ms(mut self, ms: u64) -> Self {
        self.yield_interval_ms = ms;
        self
    }
}
