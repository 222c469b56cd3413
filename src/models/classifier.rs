//! Classifier interface

use crate::error::Result;

/// Opaque trained classifier: one scaled feature vector in, churn probability out.
///
/// Implementations are shared read-only across requests, so any interior
/// state a backend needs while running must be synchronised internally.
pub trait ChurnClassifier: Send + Sync {
    /// Human readable model identifier
    fn name(&self) -> &str;

    /// Input width, when the backend can report it before the first call
    fn input_width(&self) -> Option<usize>;

    /// Churn probability for one feature vector
    fn predict(&self, features: &[f64]) -> Result<f64>;
}
