//! ONNX classifier backend

use super::classifier::ChurnClassifier;
use crate::error::{ChurnError, Result};
use anyhow::Context;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Exported network run through ONNX Runtime
pub struct OnnxClassifier {
    /// Model name (file stem)
    name: String,
    /// Running a session needs exclusive access
    session: Mutex<Session>,
    /// Input name for the model
    input_name: String,
    /// Output name for the probability
    output_name: String,
    /// Feature count declared by the graph, when static
    input_width: Option<usize>,
}

impl OnnxClassifier {
    pub const ARTIFACT: &'static str = "classifier";

    /// Load an ONNX model from file
    pub fn load(path: &Path, onnx_threads: usize) -> anyhow::Result<Self> {
        ort::init().commit()?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".to_string());

        info!(model = %name, path = %path.display(), threads = onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "input".to_string());

        let input_width = session
            .inputs
            .first()
            .and_then(|i| i.input_type.tensor_shape())
            .and_then(|shape| declared_width(shape));

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob") || o.name.contains("output"))
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "output".to_string());

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            input_width = ?input_width,
            "Model loaded successfully"
        );

        Ok(Self {
            name,
            session: Mutex::new(session),
            input_name,
            output_name,
            input_width,
        })
    }

    fn run(&self, features: &[f64]) -> anyhow::Result<f64> {
        // Prepare input tensor - shape [1, num_features]
        let input: Vec<f32> = features.iter().map(|&x| x as f32).collect();
        let shape = vec![1_i64, input.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, input)).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_tensor])?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| anyhow::anyhow!("Model produced no '{}' output", self.output_name))?;
        let (_, data) = output
            .try_extract_tensor::<f32>()
            .context("Probability output is not an f32 tensor")?;

        let probability = churn_probability(data)?;
        debug!(model = %self.name, probability, "ONNX inference complete");
        Ok(probability)
    }
}

/// Last input dimension, when the graph fixes it (dynamic axes are negative)
fn declared_width(dims: &[i64]) -> Option<usize> {
    dims.last().copied().filter(|&d| d > 0).map(|d| d as usize)
}

/// `[1, 1]` sigmoid output or `[1, 2]` class probabilities (churn at index 1)
fn churn_probability(data: &[f32]) -> anyhow::Result<f64> {
    match data {
        [p] => Ok(*p as f64),
        [_, p] => Ok(*p as f64),
        _ => anyhow::bail!(
            "Probability output has {} values, expected 1 or 2",
            data.len()
        ),
    }
}

fn check_width(expected: Option<usize>, features: &[f64]) -> Result<()> {
    match expected {
        Some(expected) if expected != features.len() => Err(ChurnError::DimensionMismatch {
            stage: "classifier",
            expected,
            actual: features.len(),
        }),
        _ => Ok(()),
    }
}

impl ChurnClassifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_width(&self) -> Option<usize> {
        self.input_width
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        check_width(self.input_width, features)?;
        self.run(features)
            .map_err(|e| ChurnError::InferenceFailure(format!("{:#}", e)))
    }
}
