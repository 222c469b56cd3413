//! Standard scaler with per-column fitted mean and variance

use super::read_json_artifact;
use crate::error::{ChurnError, Result};
use serde::Deserialize;
use std::path::Path;

/// JSON export of the fitted scaler
#[derive(Debug, Deserialize)]
struct ScalerExport {
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    mean: Vec<f64>,
    var: Vec<f64>,
}

/// Applies `(x - mean_i) / sqrt(var_i)` column by column.
///
/// Zero-variance columns use a unit divisor so constant features pass
/// through centred instead of becoming infinite.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    feature_names: Option<Vec<String>>,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub const ARTIFACT: &'static str = "feature scaler";

    pub fn new(
        feature_names: Option<Vec<String>>,
        mean: Vec<f64>,
        var: Vec<f64>,
    ) -> std::result::Result<Self, String> {
        if mean.is_empty() {
            return Err("scaler has no fitted columns".to_string());
        }
        if mean.len() != var.len() {
            return Err(format!(
                "scaler has {} means but {} variances",
                mean.len(),
                var.len()
            ));
        }
        if let Some(names) = &feature_names {
            if names.len() != mean.len() {
                return Err(format!(
                    "scaler names {} columns but has {} fitted statistics",
                    names.len(),
                    mean.len()
                ));
            }
        }
        if let Some(i) = mean.iter().position(|m| !m.is_finite()) {
            return Err(format!("mean of column {} is not finite", i));
        }
        if let Some(i) = var.iter().position(|v| !v.is_finite() || *v < 0.0) {
            return Err(format!("variance of column {} is negative or not finite", i));
        }

        let scale = var
            .iter()
            .map(|&v| if v == 0.0 { 1.0 } else { v.sqrt() })
            .collect();

        Ok(Self {
            feature_names,
            mean,
            scale,
        })
    }

    /// Load the JSON export `{"feature_names": [..]?, "mean": [..], "var": [..]}`
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw: ScalerExport = read_json_artifact(Self::ARTIFACT, path)?;
        Self::new(raw.feature_names, raw.mean, raw.var)
            .map_err(|reason| ChurnError::artifact_load(Self::ARTIFACT, path, reason))
    }

    /// Number of columns the scaler was fitted on
    pub fn dimension(&self) -> usize {
        self.mean.len()
    }

    /// Column names recorded at fit time, when exported
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    /// Scale `features` in place
    pub fn transform(&self, features: &mut [f64]) -> Result<()> {
        if features.len() != self.dimension() {
            return Err(ChurnError::DimensionMismatch {
                stage: "scaler",
                expected: self.dimension(),
                actual: features.len(),
            });
        }

        for ((x, mean), scale) in features.iter_mut().zip(&self.mean).zip(&self.scale) {
            *x = (*x - mean) / scale;
        }
        Ok(())
    }
}
