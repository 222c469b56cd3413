//! Customer Churn Prediction Library
//!
//! Loads a trained churn classifier together with its fitted encoders and
//! scaler, turns customer attributes into the classifier's feature layout,
//! and serves probability scores with recommendations over HTTP.

pub mod config;
pub mod encoders;
pub mod error;
pub mod feature_assembler;
pub mod metrics;
pub mod models;
pub mod types;
pub mod web;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::AppConfig;
pub use error::{ChurnError, Result};
pub use feature_assembler::{EncodedFeatureVector, FeatureAssembler};
pub use models::{ArtifactLoader, ChurnClassifier, ChurnPredictor};
pub use types::{customer::CustomerRecord, prediction::PredictionResult};
