//! Shared fixtures for unit tests

use crate::config::{AppConfig, ClassifierFormat};
use crate::feature_assembler::FeatureAssembler;
use crate::models::{ArtifactLoader, ChurnPredictor};
use crate::types::customer::CustomerRecord;
use std::path::PathBuf;

/// Probability the reference network assigns to [`sample_record`]
pub const REFERENCE_PROBABILITY: f64 = 0.17119900127097595;

pub fn reference_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("artifacts/reference")
}

/// Configuration pointing at the checked-in reference artifacts
pub fn reference_config() -> AppConfig {
    let dir = reference_dir();
    let mut config = AppConfig::default();
    config.artifacts.classifier = dir.join("classifier.json");
    config.artifacts.classifier_format = ClassifierFormat::Dense;
    config.artifacts.label_encoder_gender = dir.join("label_encoder_gender.json");
    config.artifacts.one_hot_encoder_geography = dir.join("one_hot_encoder_geography.json");
    config.artifacts.scaler = dir.join("scaler.json");
    config
}

pub fn reference_assembler() -> FeatureAssembler {
    let config = reference_config();
    ArtifactLoader::new(&config).load_assembler().unwrap()
}

pub fn reference_predictor() -> ChurnPredictor {
    let config = reference_config();
    ArtifactLoader::new(&config).load_all().unwrap()
}

pub fn sample_record() -> CustomerRecord {
    CustomerRecord {
        credit_score: 650,
        geography: "France".to_string(),
        gender: "Female".to_string(),
        age: 40,
        tenure: 3,
        balance: 60000.0,
        num_of_products: 2,
        has_cr_card: true,
        is_active_member: true,
        estimated_salary: 50000.0,
    }
}
