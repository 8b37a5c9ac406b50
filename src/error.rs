//! Error types.
//!
//! - `EngineError`: rejected requests against a running game. Never leaves
//!   the state modified; callers may retry.
//! - `ConfigurationError`: an inconsistent variant. The only error that
//!   prevents a game from starting.
//! - `ModelError`: the neural evaluator cannot be used. Strategies degrade to
//!   a random legal move instead of failing the turn.

use thiserror::Error;

use crate::core::{Color, GamePhase};
use crate::rules::VariantId;

/// Rejected engine request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("illegal move request: {reason}")]
    IllegalMoveRequest { reason: String },
    #[error("operation requires phase {expected:?}, game is in {actual:?}")]
    WrongPhase { expected: GamePhase, actual: GamePhase },
    #[error("{color} has already rolled this turn")]
    DiceAlreadyRolled { color: Color },
    #[error("{color} has not rolled yet")]
    DiceNotRolled { color: Color },
    #[error("it is {expected}'s turn, not {actual}'s")]
    NotYourTurn { expected: Color, actual: Color },
}

impl EngineError {
    pub(crate) fn illegal(reason: impl Into<String>) -> Self {
        EngineError::IllegalMoveRequest {
            reason: reason.into(),
        }
    }
}

/// Inconsistent rule variant or registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("variant {variant:?}: {message}")]
    InvalidVariant { variant: VariantId, message: String },
    #[error("variant {0:?} registered twice")]
    DuplicateVariant(VariantId),
    #[error("unknown variant {0:?}")]
    UnknownVariant(String),
}

impl ConfigurationError {
    pub(crate) fn invalid(variant: VariantId, message: impl Into<String>) -> Self {
        ConfigurationError::InvalidVariant {
            variant,
            message: message.into(),
        }
    }
}

/// Neural model cannot be used.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read model: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse model: {0}")]
    Json(#[from] serde_json::Error),
    #[error("model incompatible with variant: {0}")]
    Incompatible(String),
}

impl ModelError {
    /// True for load-time failures (missing or malformed artifact).
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, ModelError::Incompatible(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::illegal("piece 3 is finished");
        assert_eq!(err.to_string(), "illegal move request: piece 3 is finished");

        let err = EngineError::NotYourTurn {
            expected: Color::White,
            actual: Color::Black,
        };
        assert_eq!(err.to_string(), "it is White's turn, not Black's");
    }

    #[test]
    fn test_model_error_classification() {
        assert!(ModelError::Unavailable("missing".into()).is_unavailable());
        assert!(!ModelError::Incompatible("input size".into()).is_unavailable());

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(ModelError::from(json_err).is_unavailable());
    }

    #[test]
    fn test_configuration_error_display() {
        let err = ConfigurationError::invalid(VariantId::Murray, "no rosettes");
        assert!(err.to_string().contains("Murray"));
        assert!(err.to_string().contains("no rosettes"));
    }
}
