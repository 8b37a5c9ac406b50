//! Search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Counters collected during one decision.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Choice or chance nodes visited.
    pub nodes: u64,

    /// Monte Carlo playouts completed.
    pub simulations: u64,

    /// Alpha-beta cutoffs.
    pub cutoffs: u64,

    /// Cooperative yields taken.
    pub yields: u32,

    /// The search stopped early on cancellation or deadline.
    pub cancelled: bool,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn nodes_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.nodes as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    #[must_use]
    pub fn simulations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.simulations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Nothing was searched.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.nodes == 0 && self.simulations == 0
    }
}
