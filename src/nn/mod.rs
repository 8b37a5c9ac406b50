//! Neural position evaluation.
//!
//! ## Overview
//!
//! - **Traits**: `ValueNetwork` predicts the mover's win probability
//! - **Encoding**: `StateEncoder` trait and the `RaceEncoder` feature layout
//! - **Models**: `ModelFile` (JSON on disk) and the shape-checked `Network`
//! - **Registry**: `ModelRegistry` resolves the best model per ruleset
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rust_ur::nn::{ModelRegistry, RaceEncoder, StateEncoder, ValueNetwork};
//!
//! let registry = ModelRegistry::open("models")?;
//! let network = registry.load("Finkel")?;
//! network.check_compatible(7, 14)?;
//!
//! let encoder = RaceEncoder::new(7, 14);
//! let p = network.predict(&encoder.encode(&state, state.current_player));
//! ```

pub mod encoder;
pub mod model;
pub mod registry;
pub mod traits;

pub use encoder::{RaceEncoder, StateEncoder};
pub use model::{
    Activation, LayerSpec, ModelFile, ModelMetadata, Network, MODEL_FORMAT, MODEL_VERSION,
};
pub use registry::{BestModelEntry, ModelRegistry, BEST_MODELS_FILE};
pub use traits::{ConstantValue, EncodedState, ValueNetwork};
