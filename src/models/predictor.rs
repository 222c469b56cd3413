//! Churn predictor: validation, feature assembly, inference and decision

use crate::config::InputRanges;
use crate::error::{ChurnError, Result};
use crate::feature_assembler::FeatureAssembler;
use crate::models::classifier::ChurnClassifier;
use crate::types::customer::CustomerRecord;
use crate::types::prediction::{PredictionResult, RiskLevelThresholds};
use serde::Serialize;
use tracing::debug;

/// Decision policy owned by the predictor
#[derive(Debug, Clone)]
pub struct DecisionPolicy {
    pub threshold: f64,
    pub risk_levels: RiskLevelThresholds,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            risk_levels: RiskLevelThresholds::default(),
        }
    }
}

/// Description of the loaded pipeline
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub classifier: String,
    pub feature_columns: Vec<String>,
    pub threshold: f64,
    pub risk_levels: RiskLevelThresholds,
    pub geography_categories: Vec<String>,
    pub gender_classes: Vec<String>,
    pub input_ranges: InputRanges,
}

/// Immutable context holding every fitted artifact.
///
/// Built once at startup and shared by reference with every request.
pub struct ChurnPredictor {
    assembler: FeatureAssembler,
    classifier: Box<dyn ChurnClassifier>,
    policy: DecisionPolicy,
    input_ranges: InputRanges,
}

impl ChurnPredictor {
    /// Combine the loaded artifacts, checking the classifier accepts the assembled width
    pub fn new(
        assembler: FeatureAssembler,
        classifier: Box<dyn ChurnClassifier>,
        policy: DecisionPolicy,
        input_ranges: InputRanges,
    ) -> Result<Self> {
        if let Some(expected) = classifier.input_width() {
            if expected != assembler.width() {
                return Err(ChurnError::DimensionMismatch {
                    stage: "classifier",
                    expected,
                    actual: assembler.width(),
                });
            }
        }

        Ok(Self {
            assembler,
            classifier,
            policy,
            input_ranges,
        })
    }

    /// Score one customer
    pub fn predict(&self, record: &CustomerRecord) -> Result<PredictionResult> {
        record.validate(&self.input_ranges)?;

        let features = self.assembler.assemble(record)?;
        let probability = self.score(features.as_slice())?;

        let result = PredictionResult::from_probability(
            probability,
            self.policy.threshold,
            &self.policy.risk_levels,
        );

        debug!(
            prediction_id = %result.prediction_id,
            probability = result.probability,
            will_churn = result.will_churn,
            risk_level = result.risk_level.as_str(),
            "Prediction complete"
        );

        Ok(result)
    }

    /// Run the classifier and check its output is a probability
    pub fn score(&self, features: &[f64]) -> Result<f64> {
        let probability = self.classifier.predict(features)?;

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ChurnError::InferenceFailure(format!(
                "{} returned {} which is not a probability",
                self.classifier.name(),
                probability
            )));
        }

        Ok(probability)
    }

    pub fn assembler(&self) -> &FeatureAssembler {
        &self.assembler
    }

    pub fn threshold(&self) -> f64 {
        self.policy.threshold
    }

    pub fn input_ranges(&self) -> &InputRanges {
        &self.input_ranges
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            classifier: self.classifier.name().to_string(),
            feature_columns: self.assembler.column_names(),
            threshold: self.policy.threshold,
            risk_levels: self.policy.risk_levels.clone(),
            geography_categories: self.assembler.geography_categories().to_vec(),
            gender_classes: self.assembler.gender_classes().to_vec(),
            input_ranges: self.input_ranges.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        reference_assembler, reference_predictor, sample_record, REFERENCE_PROBABILITY,
    };
    use crate::types::prediction::RiskLevel;

    struct FixedClassifier(f64);

    impl ChurnClassifier for FixedClassifier {
        fn name(&self) -> &str {
            "fixed"
        }

        fn input_width(&self) -> Option<usize> {
            None
        }

        fn predict(&self, _features: &[f64]) -> Result<f64> {
            Ok(self.0)
        }
    }

    struct FailingClassifier;

    impl ChurnClassifier for FailingClassifier {
        fn name(&self) -> &str {
            "failing"
        }

        fn input_width(&self) -> Option<usize> {
            Some(12)
        }

        fn predict(&self, _features: &[f64]) -> Result<f64> {
            Err(ChurnError::InferenceFailure("runtime error".to_string()))
        }
    }

    fn with_classifier(classifier: Box<dyn ChurnClassifier>) -> Result<ChurnPredictor> {
        ChurnPredictor::new(
            reference_assembler(),
            classifier,
            DecisionPolicy::default(),
            InputRanges::default(),
        )
    }

    #[test]
    fn test_golden_probability() {
        let predictor = reference_predictor();
        let result = predictor.predict(&sample_record()).unwrap();

        assert!(
            (result.probability - REFERENCE_PROBABILITY).abs() < 1e-12,
            "got {}",
            result.probability
        );
        assert!(!result.will_churn);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!(result.recommendation.headline.starts_with("LOW RISK"));
    }

    #[test]
    fn test_high_risk_customer() {
        let record = CustomerRecord {
            credit_score: 520,
            geography: "Germany".to_string(),
            gender: "Female".to_string(),
            age: 62,
            tenure: 1,
            balance: 145000.0,
            num_of_products: 1,
            has_cr_card: false,
            is_active_member: false,
            estimated_salary: 120000.0,
        };

        let result = reference_predictor().predict(&record).unwrap();
        assert!(result.will_churn);
        assert_eq!(result.risk_level, RiskLevel::Critical);
        assert!(result.recommendation.actions[0].starts_with("Escalate"));
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let predictor = reference_predictor();
        let record = sample_record();

        let first = predictor.predict(&record).unwrap();
        let second = predictor.predict(&record).unwrap();

        assert_eq!(first.probability.to_bits(), second.probability.to_bits());
        assert_eq!(first.will_churn, second.will_churn);
        assert_eq!(first.risk_level, second.risk_level);
        assert_eq!(first.recommendation, second.recommendation);
    }

    #[test]
    fn test_unknown_geography_rejected() {
        let mut record = sample_record();
        record.geography = "Portugal".to_string();

        let err = reference_predictor().predict(&record).unwrap_err();
        assert!(matches!(err, ChurnError::UnknownCategory { field: "geography", .. }));
    }

    #[test]
    fn test_out_of_range_input_rejected() {
        let mut record = sample_record();
        record.num_of_products = 9;

        let err = reference_predictor().predict(&record).unwrap_err();
        assert!(matches!(err, ChurnError::InvalidInput(_)));
    }

    #[test]
    fn test_threshold_boundary_through_predictor() {
        let at = with_classifier(Box::new(FixedClassifier(0.5))).unwrap();
        assert!(at.predict(&sample_record()).unwrap().will_churn);

        let below = with_classifier(Box::new(FixedClassifier(0.4999))).unwrap();
        assert!(!below.predict(&sample_record()).unwrap().will_churn);
    }

    #[test]
    fn test_non_probability_output_is_inference_failure() {
        let predictor = with_classifier(Box::new(FixedClassifier(f64::NAN))).unwrap();
        let err = predictor.predict(&sample_record()).unwrap_err();
        assert!(matches!(err, ChurnError::InferenceFailure(_)));

        let predictor = with_classifier(Box::new(FixedClassifier(1.2))).unwrap();
        assert!(predictor.predict(&sample_record()).is_err());
    }

    #[test]
    fn test_classifier_error_surfaces_verbatim() {
        let predictor = with_classifier(Box::new(FailingClassifier)).unwrap();
        let err = predictor.predict(&sample_record()).unwrap_err();
        assert_eq!(err.to_string(), "inference failed: runtime error");
    }

    #[test]
    fn test_classifier_width_checked_at_construction() {
        struct Narrow;
        impl ChurnClassifier for Narrow {
            fn name(&self) -> &str {
                "narrow"
            }
            fn input_width(&self) -> Option<usize> {
                Some(11)
            }
            fn predict(&self, _features: &[f64]) -> Result<f64> {
                Ok(0.0)
            }
        }

        let err = with_classifier(Box::new(Narrow)).err().unwrap();
        assert!(matches!(
            err,
            ChurnError::DimensionMismatch { stage: "classifier", expected: 11, actual: 12 }
        ));
    }
}
