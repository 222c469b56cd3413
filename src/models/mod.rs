//! ML model loading and inference components

pub mod classifier;
pub mod dense;
pub mod loader;
pub mod onnx;
pub mod predictor;

pub use classifier::ChurnClassifier;
pub use dense::DenseNetwork;
pub use loader::ArtifactLoader;
pub use onnx::OnnxClassifier;
pub use predictor::{ChurnPredictor, DecisionPolicy, ModelInfo};
