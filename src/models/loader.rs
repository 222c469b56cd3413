//! Artifact loader

use crate::config::{AppConfig, ArtifactsConfig, ClassifierFormat};
use crate::encoders::{LabelEncoder, OneHotEncoder, StandardScaler};
use crate::error::{ChurnError, Result};
use crate::feature_assembler::FeatureAssembler;
use crate::models::classifier::ChurnClassifier;
use crate::models::dense::DenseNetwork;
use crate::models::onnx::OnnxClassifier;
use crate::models::predictor::{ChurnPredictor, DecisionPolicy};
use tracing::info;

/// Loads the four fitted artifacts into a ready predictor.
///
/// Any missing or malformed artifact fails the whole load; there is no
/// partial mode and no retry.
pub struct ArtifactLoader<'a> {
    config: &'a AppConfig,
}

impl<'a> ArtifactLoader<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    fn artifacts(&self) -> &ArtifactsConfig {
        &self.config.artifacts
    }

    /// Load every artifact and assemble the predictor
    pub fn load_all(&self) -> Result<ChurnPredictor> {
        info!("Loading model and preprocessors");

        let assembler = self.load_assembler()?;
        let classifier = self.load_classifier()?;

        let policy = DecisionPolicy {
            threshold: self.config.decision.threshold,
            risk_levels: self.config.decision.risk_levels.clone(),
        };
        let predictor = ChurnPredictor::new(
            assembler,
            classifier,
            policy,
            self.config.input_ranges.clone(),
        )?;

        info!(
            classifier = predictor.classifier_name(),
            features = predictor.assembler().width(),
            threshold = predictor.threshold(),
            "Successfully loaded all components"
        );

        Ok(predictor)
    }

    /// Load the encoders and scaler
    pub fn load_assembler(&self) -> Result<FeatureAssembler> {
        let artifacts = self.artifacts();

        let gender = LabelEncoder::from_file(&artifacts.label_encoder_gender)?;
        info!(
            path = %artifacts.label_encoder_gender.display(),
            classes = ?gender.classes(),
            "Loaded gender label encoder"
        );

        let geography = OneHotEncoder::from_file(&artifacts.one_hot_encoder_geography)?;
        info!(
            path = %artifacts.one_hot_encoder_geography.display(),
            categories = ?geography.categories(),
            columns = geography.width(),
            "Loaded geography one-hot encoder"
        );

        let scaler = StandardScaler::from_file(&artifacts.scaler)?;
        info!(
            path = %artifacts.scaler.display(),
            dimension = scaler.dimension(),
            "Loaded feature scaler"
        );

        FeatureAssembler::new(gender, geography, scaler)
    }

    /// Load the classifier in its configured format
    pub fn load_classifier(&self) -> Result<Box<dyn ChurnClassifier>> {
        let artifacts = self.artifacts();
        let path = &artifacts.classifier;

        let classifier: Box<dyn ChurnClassifier> = match artifacts.classifier_format {
            ClassifierFormat::Onnx => {
                if !path.exists() {
                    return Err(ChurnError::artifact_load(
                        OnnxClassifier::ARTIFACT,
                        path,
                        "file not found",
                    ));
                }
                let model = OnnxClassifier::load(path, artifacts.onnx_threads).map_err(|e| {
                    ChurnError::artifact_load(OnnxClassifier::ARTIFACT, path, format!("{:#}", e))
                })?;
                Box::new(model)
            }
            ClassifierFormat::Dense => Box::new(DenseNetwork::from_file(path)?),
        };

        info!(
            path = %path.display(),
            format = ?artifacts.classifier_format,
            model = classifier.name(),
            "Loaded classifier"
        );

        Ok(classifier)
    }
}
