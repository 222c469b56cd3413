//! Error taxonomy for the prediction pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading artifacts or scoring a customer.
///
/// None of these are retried: the caller either fixes the input and
/// resubmits, or the deployment is fixed.
#[derive(Debug, Error)]
pub enum ChurnError {
    /// An artifact file was missing, unreadable or malformed (fatal at startup)
    #[error("failed to load {artifact} from {}: {reason}", path.display())]
    ArtifactLoadFailure {
        artifact: &'static str,
        path: PathBuf,
        reason: String,
    },

    /// A categorical value absent from the fitted vocabulary
    #[error("unknown {field} category '{value}' (fitted categories: {})", known.join(", "))]
    UnknownCategory {
        field: &'static str,
        value: String,
        known: Vec<String>,
    },

    /// Feature vector width disagrees with what a fitted artifact expects
    #[error("{stage} expects {expected} features but received {actual}")]
    DimensionMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Scaler column names disagree with the assembled feature layout
    #[error("feature layout mismatch at column {position}: expected '{expected}', scaler was fitted on '{found}'")]
    LayoutMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    /// The classifier call itself failed
    #[error("inference failed: {0}")]
    InferenceFailure(String),

    /// A record field outside its accepted domain
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ChurnError {
    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ChurnError::ArtifactLoadFailure { .. } => "artifact_load_failure",
            ChurnError::UnknownCategory { .. } => "unknown_category",
            ChurnError::DimensionMismatch { .. } => "dimension_mismatch",
            ChurnError::LayoutMismatch { .. } => "layout_mismatch",
            ChurnError::InferenceFailure(_) => "inference_failure",
            ChurnError::InvalidInput(_) => "invalid_input",
        }
    }

    /// Whether the error was caused by the submitted record rather than the deployment
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ChurnError::UnknownCategory { .. } | ChurnError::InvalidInput(_)
        )
    }

    pub(crate) fn artifact_load(
        artifact: &'static str,
        path: impl Into<PathBuf>,
        reason: impl std::fmt::Display,
    ) -> Self {
        ChurnError::ArtifactLoadFailure {
            artifact,
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChurnError>;
