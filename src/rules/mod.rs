//! Rule variants and the engine that enforces them.
//!
//! - `variant`: declarative rule records and their validation
//! - `dice`: the dice bonus rule and board control counts
//! - `registry`: validated variants by id
//! - `engine`: legality, move application, win detection

pub mod dice;
pub mod engine;
pub mod registry;
pub mod variant;

pub use dice::{BoardControl, DiceBonus};
pub use engine::GameEngine;
pub use registry::VariantRegistry;
pub use variant::{EngineConfig, RuleVariant, SafeLanding, SafeSquares, VariantId, MAX_DICE};
