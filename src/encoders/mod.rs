//! Fitted preprocessing artifacts
//!
//! Each encoder is deserialized from the JSON export of its fitted state and
//! is read-only afterwards.

pub mod label;
pub mod one_hot;
pub mod scaler;

pub use label::LabelEncoder;
pub use one_hot::OneHotEncoder;
pub use scaler::StandardScaler;

use crate::error::{ChurnError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read and deserialize one JSON artifact
pub(crate) fn read_json_artifact<T: DeserializeOwned>(artifact: &'static str, path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).map_err(|e| ChurnError::artifact_load(artifact, path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| ChurnError::artifact_load(artifact, path, e))
}
