//! Evaluation functions: heuristic move scoring and static position value.

pub mod heuristic;
pub mod position;

pub use heuristic::{MoveEvaluator, MoveScore, MoveWeights, Reason};
pub use position::PositionEvaluator;
