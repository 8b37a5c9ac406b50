//! One-ply search scored by a value network.

use std::sync::Arc;

use tracing::{debug, warn};

use super::context::SearchContext;
use super::random::RandomStrategy;
use super::{forced, Decision, Strategy};
use crate::core::{Color, GameState};
use crate::error::ModelError;
use crate::nn::{Network, RaceEncoder, StateEncoder, ValueNetwork};
use crate::rules::GameEngine;

/// Picks the move whose resulting position the network likes best.
///
/// If the model could not be loaded or does not fit the variant, every
/// decision falls back to a uniformly random legal move.
pub struct NeuralStrategy {
    network: Option<Arc<dyn ValueNetwork>>,
    encoder: RaceEncoder,
    refusal: Option<ModelError>,
    fallback: RandomStrategy,
}

impl NeuralStrategy {
    /// Wrap an already-checked network.
    pub fn new(network: Arc<dyn ValueNetwork>, engine: &GameEngine) -> Self {
        Self {
            network: Some(network),
            encoder: Self::encoder_for(engine),
            refusal: None,
            fallback: RandomStrategy,
        }
    }

    /// Validate a loaded model against the variant, degrading on mismatch.
    #[must_use]
    pub fn from_network(network: Network, engine: &GameEngine) -> Self {
        let pieces = engine.config().pieces_per_player as usize;
        match network.check_compatible(pieces, engine.path_len()) {
            Ok(()) => Self::new(Arc::new(network), engine),
            Err(err) => Self::refused(err, engine),
        }
    }

    /// Use the result of a model load, degrading on failure.
    #[must_use]
    pub fn from_load(result: Result<Network, ModelError>, engine: &GameEngine) -> Self {
        match result {
            Ok(network) => Self::from_network(network, engine),
            Err(err) => Self::refused(err, engine),
        }
    }

    /// A strategy that only ever plays random moves.
    #[must_use]
    pub fn refused(err: ModelError, engine: &GameEngine) -> Self {
        warn!(
            variant = %engine.variant().id,
            error = %err,
            "neural evaluation refused, using random moves"
        );
        Self {
            network: None,
            encoder: Self::encoder_for(engine),
            refusal: Some(err),
            fallback: RandomStrategy,
        }
    }

    fn encoder_for(engine: &GameEngine) -> RaceEncoder {
        RaceEncoder::new(engine.config().pieces_per_player as usize, engine.path_len())
    }

    /// Why the network is not in use, if it is not.
    #[must_use]
    pub fn refusal(&self) -> Option<&ModelError> {
        self.refusal.as_ref()
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.network.is_none()
    }

    /// Win probability for `me` in `state`.
    fn value(&self, network: &dyn ValueNetwork, state: &GameState, me: Color) -> f32 {
        if let Some(winner) = state.winner {
            return if winner == me { 1.0 } else { 0.0 };
        }
        let mover = state.current_player;
        let p = network.predict(&self.encoder.encode(state, mover));
        if mover == me {
            p
        } else {
            1.0 - p
        }
    }
}

impl Strategy for NeuralStrategy {
    fn name(&self) -> &'static str {
        "neural"
    }

    fn choose(
        &mut self,
        engine: &GameEngine,
        state: &GameState,
        ctx: &mut SearchContext,
    ) -> Decision {
        let Some(network) = self.network.clone() else {
            return self.fallback.choose(engine, state, ctx);
        };
        let moves = engine.legal_moves(state);
        if let Some(decision) = forced(&moves) {
            return decision;
        }

        let me = state.current_player;
        let mut best = 0;
        let mut best_value = f32::NEG_INFINITY;
        for (i, mv) in moves.iter().enumerate() {
            ctx.stats_mut().nodes += 1;
            let mut after = state.clone();
            engine.apply_trusted(&mut after, mv);
            let value = self.value(network.as_ref(), &after, me);
            if value > best_value {
                best_value = value;
                best = i;
            }
        }
        debug!(mv = %moves[best], win_probability = best_value, "neural choice");
        Decision::Move(moves[best].clone())
    }
}
