//! # rust-ur
//!
//! Rules engine and decision core for the Royal Game of Ur and its
//! historical and modern variants.
//!
//! ## Design Principles
//!
//! 1. **One Engine, Many Rulesets**: Variants are data. A `RuleVariant`
//!    record plus a `DiceBonus` choice describe everything that differs
//!    between Finkel, Masters, Aseb, Murray and the rest.
//!
//! 2. **States Are Values**: `GameState` clones are independent, so every
//!    search branch owns its own copy. Move history is persistent (`im`).
//!
//! 3. **No Globals**: Path catalogs, variant registries and search settings
//!    are passed in by whoever composes the game (`turn::Session`).
//!
//! ## Architecture
//!
//! - **Validated Entry Points**: `GameEngine::apply_move` rejects anything
//!   not produced by move generation and leaves the state untouched.
//!
//! - **Cooperative Search**: strategies call `SearchContext::checkpoint`
//!   and return their best move so far when cancelled or out of time.
//!
//! - **Graceful Degradation**: a neural strategy whose model is missing or
//!   does not fit the variant plays random moves instead of failing.
//!
//! ## Modules
//!
//! - `board`: Squares, paths, special squares
//! - `core`: Colors, pieces, moves, dice, state, RNG
//! - `rules`: Variants, dice bonuses, the game engine
//! - `eval`: Heuristic move scoring and positional evaluation
//! - `search`: Move-selection strategies and background search
//! - `nn`: Value networks, state encoding, model registry
//! - `turn`: Turn coordination, observers, sessions
//! - `config`: Session configuration files
//! - `error`: Error types

pub mod board;
pub mod config;
pub mod core;
pub mod error;
pub mod eval;
pub mod nn;
pub mod rules;
pub mod search;
pub mod turn;

// Re-export commonly used types
pub use crate::board::{Path, PathCatalog, PathId, PathSet, Square, SquareKind};

pub use crate::core::{
    Color, ColorMap, Destination, DiceRoll, DiceSource, GamePhase, GameRng,
    GameState, Move, MoveRecord, PiecePosition, ScriptedDice,
};

pub use crate::rules::{DiceBonus, GameEngine, RuleVariant, SafeLanding, VariantId, VariantRegistry};

pub use crate::eval::{MoveEvaluator, MoveWeights, PositionEvaluator};

pub use crate::search::{
    BackgroundSearch, CancelToken, Decision, SearchConfig, SearchContext, SearchStats, Strategy,
    StrategyKind,
};

pub use crate::nn::{ModelRegistry, Network, ValueNetwork};

pub use crate::turn::{Controller, GameEvent, Session, StateObserver, TurnCoordinator, TurnOutcome};

pub use crate::config::{ConfigError, SeatConfig, SessionConfig};

pub use crate::error::{ConfigurationError, EngineError, ModelError};
