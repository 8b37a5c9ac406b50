//! Feed-forward model files and the network built from them.
//!
//! Model files are JSON:
//!
//! ```json
//! {
//!   "format": "ur-mlp",
//!   "version": 1,
//!   "input_size": 14,
//!   "layers": [
//!     { "output_size": 8, "activation": "relu", "weights": [...], "biases": [...] },
//!     { "output_size": 1, "activation": "sigmoid", "weights": [...], "biases": [...] }
//!   ],
//!   "metadata": { "finish_position": 15, "pieces_per_player": 7, "input_size": 14 }
//! }
//! ```
//!
//! Weights are row-major, `output_size x input_size` per layer.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::traits::{EncodedState, ValueNetwork};
use crate::error::ModelError;

pub const MODEL_FORMAT: &str = "ur-mlp";
pub const MODEL_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Sigmoid,
    Relu,
    Tanh,
}

impl Activation {
    #[inline]
    #[must_use]
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Linear => x,
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Relu => x.max(0.0),
            Activation::Tanh => x.tanh(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub output_size: usize,
    pub activation: Activation,
    pub weights: Vec<f32>,
    pub biases: Vec<f32>,
}

/// Variant facts the model was trained for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMetadata {
    pub finish_position: Option<usize>,
    pub pieces_per_player: Option<usize>,
    pub input_size: Option<usize>,
}

/// On-disk model description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub format: String,
    pub version: u32,
    pub input_size: usize,
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub metadata: Option<ModelMetadata>,
}

impl ModelFile {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
struct Layer {
    input_size: usize,
    output_size: usize,
    activation: Activation,
    weights: Vec<f32>,
    biases: Vec<f32>,
}

impl Layer {
    fn forward(&self, input: &[f32], output: &mut Vec<f32>) {
        output.clear();
        let rows = self.weights.chunks_exact(self.input_size).zip(&self.biases);
        output.extend(rows.map(|(row, bias)| {
            let sum: f32 = row.iter().zip(input).map(|(w, x)| w * x).sum();
            self.activation.apply(sum + bias)
        }));
    }
}

/// Shape-checked multilayer perceptron with a single output.
#[derive(Clone, Debug)]
pub struct Network {
    input_size: usize,
    layers: Vec<Layer>,
    metadata: ModelMetadata,
}

impl Network {
    /// Check format and shapes.
    pub fn from_model(model: ModelFile) -> Result<Self, ModelError> {
        if model.format != MODEL_FORMAT {
            return Err(ModelError::Unavailable(format!(
                "unknown model format {:?}",
                model.format
            )));
        }
        if model.version != MODEL_VERSION {
            return Err(ModelError::Unavailable(format!(
                "unsupported model version {}",
                model.version
            )));
        }
        if model.layers.is_empty() {
            return Err(ModelError::Unavailable("model has no layers".into()));
        }
        if model.input_size == 0 || model.layers.iter().any(|l| l.output_size == 0) {
            return Err(ModelError::Unavailable("model has an empty layer".into()));
        }

        let mut layers = Vec::with_capacity(model.layers.len());
        let mut input_size = model.input_size;
        for (i, spec) in model.layers.into_iter().enumerate() {
            if spec.weights.len() != spec.output_size * input_size {
                return Err(ModelError::Unavailable(format!(
                    "layer {i} has {} weights, expected {}x{}",
                    spec.weights.len(),
                    spec.output_size,
                    input_size
                )));
            }
            if spec.biases.len() != spec.output_size {
                return Err(ModelError::Unavailable(format!(
                    "layer {i} has {} biases, expected {}",
                    spec.biases.len(),
                    spec.output_size
                )));
            }
            layers.push(Layer {
                input_size,
                output_size: spec.output_size,
                activation: spec.activation,
                weights: spec.weights,
                biases: spec.biases,
            });
            input_size = spec.output_size;
        }
        if input_size != 1 {
            return Err(ModelError::Unavailable(format!(
                "final layer has {input_size} outputs, expected 1"
            )));
        }

        Ok(Self {
            input_size: model.input_size,
            layers,
            metadata: model.metadata.unwrap_or_default(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        Self::from_model(ModelFile::load(path)?)
    }

    #[must_use]
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    #[must_use]
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Refuse models trained for a different piece count or path length.
    pub fn check_compatible(
        &self,
        pieces_per_player: usize,
        path_len: usize,
    ) -> Result<(), ModelError> {
        let expected_input = 2 * pieces_per_player;
        if self.input_size != expected_input {
            return Err(ModelError::Incompatible(format!(
                "input size {} does not match {} (2 x {} pieces)",
                self.input_size, expected_input, pieces_per_player
            )));
        }
        let meta = &self.metadata;
        if let Some(declared) = meta.input_size {
            if declared != self.input_size {
                return Err(ModelError::Incompatible(format!(
                    "metadata input size {declared} disagrees with model input size {}",
                    self.input_size
                )));
            }
        }
        if let Some(finish) = meta.finish_position {
            if finish != path_len + 1 {
                return Err(ModelError::Incompatible(format!(
                    "finish position {finish} does not match path length {path_len}"
                )));
            }
        }
        if let Some(pieces) = meta.pieces_per_player {
            if pieces != pieces_per_player {
                return Err(ModelError::Incompatible(format!(
                    "trained for {pieces} pieces, variant has {pieces_per_player}"
                )));
            }
        }
        Ok(())
    }

    /// Run every layer in order.
    #[must_use]
    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut current = input.to_vec();
        let mut next = Vec::new();
        for layer in &self.layers {
            debug_assert_eq!(current.len(), layer.input_size);
            layer.forward(&current, &mut next);
            std::mem::swap(&mut current, &mut next);
            debug_assert_eq!(current.len(), layer.output_size);
        }
        current
    }
}

impl ValueNetwork for Network {
    fn predict(&self, encoded: &EncodedState) -> f32 {
        self.forward(&encoded.tensor)
            .first()
            .copied()
            .unwrap_or(0.5)
            .clamp(0.0, 1.0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Single sigmoid unit: `sigmoid(sum(weights * x) + bias)`.
    pub(crate) fn single_layer(input_size: usize, weight: f32, bias: f32) -> ModelFile {
        ModelFile {
            format: MODEL_FORMAT.to_string(),
            version: MODEL_VERSION,
            input_size,
            layers: vec![LayerSpec {
                output_size: 1,
                activation: Activation::Sigmoid,
                weights: vec![weight; input_size],
                biases: vec![bias],
            }],
            metadata: None,
        }
    }

    #[test]
    fn test_activations() {
        assert_eq!(Activation::Linear.apply(-2.0), -2.0);
        assert_eq!(Activation::Relu.apply(-2.0), 0.0);
        assert_eq!(Activation::Relu.apply(3.0), 3.0);
        assert!((Activation::Sigmoid.apply(0.0) - 0.5).abs() < 1e-6);
        assert!((Activation::Tanh.apply(0.0)).abs() < 1e-6);
    }

    #[test]
    fn test_forward_two_layers() {
        let model = ModelFile {
            format: MODEL_FORMAT.to_string(),
            version: MODEL_VERSION,
            input_size: 2,
            layers: vec![
                LayerSpec {
                    output_size: 2,
                    activation: Activation::Relu,
                    weights: vec![1.0, 0.0, 0.0, -1.0],
                    biases: vec![0.0, 0.0],
                },
                LayerSpec {
                    output_size: 1,
                    activation: Activation::Linear,
                    weights: vec![2.0, 3.0],
                    biases: vec![1.0],
                },
            ],
            metadata: None,
        };
        let net = Network::from_model(model).unwrap();
        // relu([0.5, -0.25]) = [0.5, 0]; 2*0.5 + 3*0 + 1 = 2
        assert_eq!(net.forward(&[0.5, 0.25]), vec![2.0]);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let mut model = single_layer(4, 0.1, 0.0);
        model.layers[0].weights.pop();
        assert!(matches!(Network::from_model(model), Err(ModelError::Unavailable(_))));

        let mut model = single_layer(4, 0.1, 0.0);
        model.format = "onnx".into();
        assert!(Network::from_model(model).is_err());
    }

    #[test]
    fn test_compatibility() {
        let net = Network::from_model(single_layer(14, 0.1, 0.0)).unwrap();
        assert!(net.check_compatible(7, 14).is_ok());
        assert!(matches!(net.check_compatible(5, 14), Err(ModelError::Incompatible(_))));

        let mut model = single_layer(14, 0.1, 0.0);
        model.metadata = Some(ModelMetadata {
            finish_position: Some(17),
            pieces_per_player: Some(7),
            input_size: Some(14),
        });
        let net = Network::from_model(model).unwrap();
        assert!(net.check_compatible(7, 14).is_err());
        assert!(net.check_compatible(7, 16).is_ok());
    }

    #[test]
    fn test_json_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = single_layer(4, 0.5, -0.5);
        model.save(&path).unwrap();
        let net = Network::load(&path).unwrap();
        let out = net.predict(&EncodedState::new(vec![1.0; 4], vec![4]));
        assert!((out - Activation::Sigmoid.apply(1.5)).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = Network::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(err.is_unavailable());
    }
}
