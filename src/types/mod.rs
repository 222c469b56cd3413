//! Type definitions for the churn prediction pipeline

pub mod customer;
pub mod prediction;

pub use customer::CustomerRecord;
pub use prediction::{PredictionResult, Recommendation, RiskLevel, RiskLevelThresholds};
