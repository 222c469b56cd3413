//! Prediction outcome, risk levels and recommendations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Risk level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Determine risk level from probability and band thresholds
    pub fn from_probability(probability: f64, thresholds: &RiskLevelThresholds) -> Self {
        if probability >= thresholds.critical {
            RiskLevel::Critical
        } else if probability >= thresholds.high {
            RiskLevel::High
        } else if probability >= thresholds.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

/// Configurable risk band lower bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskLevelThresholds {
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for RiskLevelThresholds {
    fn default() -> Self {
        Self {
            medium: 0.25,
            high: 0.5,
            critical: 0.75,
        }
    }
}

/// Headline and follow-up actions shown with a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub headline: String,
    pub actions: Vec<String>,
}

const RETENTION_ACTIONS: [&str; 5] = [
    "Consider offering retention incentives",
    "Schedule a customer success call",
    "Review customer satisfaction metrics",
    "Offer personalized product recommendations",
    "Provide exclusive offers or discounts",
];

const MAINTENANCE_ACTIONS: [&str; 4] = [
    "Customer shows low churn risk",
    "Continue providing excellent service",
    "Consider upselling opportunities",
    "Maintain regular engagement",
];

impl Recommendation {
    /// Map the churn decision and risk band onto a recommendation
    pub fn for_outcome(will_churn: bool, risk_level: RiskLevel) -> Self {
        let (headline, base) = if will_churn {
            ("HIGH RISK - Customer is likely to churn", &RETENTION_ACTIONS[..])
        } else {
            ("LOW RISK - Customer is unlikely to churn", &MAINTENANCE_ACTIONS[..])
        };

        let mut actions: Vec<String> = base.iter().map(|a| a.to_string()).collect();
        match (will_churn, risk_level) {
            (true, RiskLevel::Critical) => {
                actions.insert(0, "Escalate to the retention team within 24 hours".to_string())
            }
            (false, RiskLevel::Medium | RiskLevel::High) => {
                actions.push("Monitor activity for early signs of disengagement".to_string())
            }
            _ => {}
        }

        Self {
            headline: headline.to_string(),
            actions,
        }
    }
}

/// Outcome of scoring one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Unique prediction identifier
    pub prediction_id: String,

    /// Churn probability (0.0 - 1.0)
    pub probability: f64,

    /// `probability >= threshold`
    pub will_churn: bool,

    /// Threshold the decision was made against
    pub threshold: f64,

    /// Risk band of the probability
    pub risk_level: RiskLevel,

    /// What to do about it
    pub recommendation: Recommendation,

    /// Prediction timestamp
    pub timestamp: DateTime<Utc>,
}

impl PredictionResult {
    /// Apply the decision policy to a classifier probability
    pub fn from_probability(
        probability: f64,
        threshold: f64,
        risk_thresholds: &RiskLevelThresholds,
    ) -> Self {
        let will_churn = is_churn(probability, threshold);
        let risk_level = RiskLevel::from_probability(probability, risk_thresholds);

        Self {
            prediction_id: uuid::Uuid::new_v4().to_string(),
            probability,
            will_churn,
            threshold,
            risk_level,
            recommendation: Recommendation::for_outcome(will_churn, risk_level),
            timestamp: Utc::now(),
        }
    }

    /// Probability as a percentage
    pub fn percentage(&self) -> f64 {
        self.probability * 100.0
    }
}

/// Inclusive churn decision
pub fn is_churn(probability: f64, threshold: f64) -> bool {
    probability >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        assert!(!is_churn(0.4999, 0.5));
        assert!(is_churn(0.5, 0.5));
        assert!(is_churn(0.5000, 0.5));

        let thresholds = RiskLevelThresholds::default();
        assert!(!PredictionResult::from_probability(0.4999, 0.5, &thresholds).will_churn);
        assert!(PredictionResult::from_probability(0.5, 0.5, &thresholds).will_churn);
    }

    #[test]
    fn test_risk_level_from_probability() {
        let thresholds = RiskLevelThresholds::default();

        assert_eq!(RiskLevel::from_probability(0.1, &thresholds), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.3, &thresholds), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.5, &thresholds), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(0.95, &thresholds), RiskLevel::Critical);
    }

    #[test]
    fn test_recommendations() {
        let churn = Recommendation::for_outcome(true, RiskLevel::High);
        assert!(churn.headline.starts_with("HIGH RISK"));
        assert_eq!(churn.actions.len(), 5);

        let critical = Recommendation::for_outcome(true, RiskLevel::Critical);
        assert!(critical.actions[0].starts_with("Escalate"));

        let stay = Recommendation::for_outcome(false, RiskLevel::Low);
        assert!(stay.headline.starts_with("LOW RISK"));
        assert_eq!(stay.actions.len(), 4);

        let watch = Recommendation::for_outcome(false, RiskLevel::Medium);
        assert_eq!(watch.actions.len(), 5);
    }

    #[test]
    fn test_prediction_serialization() {
        let result = PredictionResult::from_probability(0.78, 0.5, &RiskLevelThresholds::default());

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"risk_level\":\"critical\""));

        let deserialized: PredictionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, deserialized);
    }
}
