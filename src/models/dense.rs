//! Feed-forward network evaluated in-process from a JSON weight export

use super::classifier::ChurnClassifier;
use crate::encoders::read_json_artifact;
use crate::error::{ChurnError, Result};
use serde::Deserialize;
use std::path::Path;

/// Layer activation function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Sigmoid,
    Tanh,
    Linear,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
            Activation::Linear => x,
        }
    }
}

/// Fully connected layer; `weights[i][j]` connects input `i` to output `j`
#[derive(Debug, Clone, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub activation: Activation,
}

impl DenseLayer {
    fn inputs(&self) -> usize {
        self.weights.len()
    }

    fn outputs(&self) -> usize {
        self.bias.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        (0..self.outputs())
            .map(|j| {
                let mut acc = 0.0;
                for (x, row) in input.iter().zip(&self.weights) {
                    acc += x * row[j];
                }
                self.activation.apply(acc + self.bias[j])
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct NetworkExport {
    #[serde(default = "default_name")]
    name: String,
    layers: Vec<DenseLayer>,
}

fn default_name() -> String {
    "dense".to_string()
}

/// Sequential dense network with a single sigmoid-style output unit.
#[derive(Debug, Clone)]
pub struct DenseNetwork {
    name: String,
    layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    pub const ARTIFACT: &'static str = "classifier";

    /// Build from layers, checking adjacent shapes line up
    pub fn new(name: impl Into<String>, layers: Vec<DenseLayer>) -> std::result::Result<Self, String> {
        let first = layers.first().ok_or("network has no layers")?;
        let mut width = first.inputs();
        if width == 0 {
            return Err("first layer has no inputs".to_string());
        }

        for (index, layer) in layers.iter().enumerate() {
            if layer.inputs() != width {
                return Err(format!(
                    "layer {} expects {} inputs but receives {}",
                    index,
                    layer.inputs(),
                    width
                ));
            }
            if let Some(row) = layer.weights.iter().position(|row| row.len() != layer.outputs()) {
                return Err(format!(
                    "layer {} weight row {} has {} columns, bias has {}",
                    index,
                    row,
                    layer.weights[row].len(),
                    layer.outputs()
                ));
            }
            width = layer.outputs();
        }

        if width != 1 {
            return Err(format!("network must end in one output unit, has {}", width));
        }

        Ok(Self {
            name: name.into(),
            layers,
        })
    }

    /// Load the JSON export `{"name": .., "layers": [..]}`
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw: NetworkExport = read_json_artifact(Self::ARTIFACT, path)?;
        Self::new(raw.name, raw.layers)
            .map_err(|reason| ChurnError::artifact_load(Self::ARTIFACT, path, reason))
    }
}

impl ChurnClassifier for DenseNetwork {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_width(&self) -> Option<usize> {
        self.layers.first().map(DenseLayer::inputs)
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        let expected = self.layers[0].inputs();
        if features.len() != expected {
            return Err(ChurnError::DimensionMismatch {
                stage: "classifier",
                expected,
                actual: features.len(),
            });
        }

        let mut activations = features.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations);
        }

        activations
            .first()
            .copied()
            .ok_or_else(|| ChurnError::InferenceFailure("network produced no output".to_string()))
    }
}
