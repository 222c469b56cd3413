//! Configuration management for the churn prediction service

use crate::types::prediction::RiskLevelThresholds;
use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Environment variable that overrides the configuration file location
pub const CONFIG_PATH_ENV: &str = "CHURN_CONFIG";

/// Backend used to evaluate the exported classifier
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierFormat {
    /// ONNX graph run through ONNX Runtime
    #[default]
    Onnx,
    /// JSON export of a feed-forward network, evaluated in-process
    Dense,
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub decision: DecisionConfig,
    #[serde(default)]
    pub input_ranges: InputRanges,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Locations of the four fitted artifacts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Trained classifier
    pub classifier: PathBuf,
    /// How the classifier file is encoded
    #[serde(default)]
    pub classifier_format: ClassifierFormat,
    /// Intra-op threads for ONNX Runtime (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
    /// Gender label encoder
    pub label_encoder_gender: PathBuf,
    /// Geography one-hot encoder
    pub one_hot_encoder_geography: PathBuf,
    /// Numeric feature scaler
    pub scaler: PathBuf,
}

fn default_onnx_threads() -> usize {
    1
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            classifier: PathBuf::from("artifacts/model.onnx"),
            classifier_format: ClassifierFormat::Onnx,
            onnx_threads: default_onnx_threads(),
            label_encoder_gender: PathBuf::from("artifacts/label_encoder_gender.json"),
            one_hot_encoder_geography: PathBuf::from("artifacts/one_hot_encoder_geography.json"),
            scaler: PathBuf::from("artifacts/scaler.json"),
        }
    }
}

/// Decision policy applied to the classifier output
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Probability at or above which a customer is classified as churning
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Risk band boundaries used for recommendations
    #[serde(default)]
    pub risk_levels: RiskLevelThresholds,
}

fn default_threshold() -> f64 {
    0.5
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            risk_levels: RiskLevelThresholds::default(),
        }
    }
}

/// Accepted domain for one numeric form field
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct InputRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl InputRange {
    pub const fn new(min: f64, max: f64, default: f64) -> Self {
        Self { min, max, default }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Accepted domains for the numeric customer fields
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct InputRanges {
    pub age: InputRange,
    pub credit_score: InputRange,
    pub balance: InputRange,
    pub estimated_salary: InputRange,
    pub tenure: InputRange,
    pub num_of_products: InputRange,
}

impl Default for InputRanges {
    fn default() -> Self {
        Self {
            age: InputRange::new(18.0, 100.0, 40.0),
            credit_score: InputRange::new(300.0, 850.0, 650.0),
            balance: InputRange::new(0.0, 250_000.0, 0.0),
            estimated_salary: InputRange::new(0.0, 200_000.0, 50_000.0),
            tenure: InputRange::new(0.0, 10.0, 5.0),
            num_of_products: InputRange::new(1.0, 4.0, 1.0),
        }
    }
}

impl InputRanges {
    fn iter(&self) -> [(&'static str, &InputRange); 6] {
        [
            ("age", &self.age),
            ("credit_score", &self.credit_score),
            ("balance", &self.balance),
            ("estimated_salary", &self.estimated_salary),
            ("tenure", &self.tenure),
            ("num_of_products", &self.num_of_products),
        ]
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Metrics reporting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Seconds between periodic summaries; 0 disables them
    pub report_interval_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            report_interval_secs: 300,
        }
    }
}

impl AppConfig {
    /// Load configuration from `$CHURN_CONFIG` or the default file
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_path(path)
    }

    /// Load configuration from a specific path, with `CHURN__*` environment overrides
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("CHURN").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the decision policy cannot work with
    pub fn validate(&self) -> Result<()> {
        let threshold = self.decision.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            bail!("decision.threshold must lie in [0, 1], got {}", threshold);
        }

        let levels = &self.decision.risk_levels;
        if !(0.0 <= levels.medium && levels.medium <= levels.high && levels.high <= levels.critical && levels.critical <= 1.0) {
            bail!(
                "decision.risk_levels must satisfy 0 <= medium <= high <= critical <= 1, got {:?}",
                levels
            );
        }

        for (name, range) in self.input_ranges.iter() {
            if range.min > range.max || !range.contains(range.default) {
                bail!(
                    "input_ranges.{} must satisfy min <= default <= max, got {:?}",
                    name,
                    range
                );
            }
        }

        Ok(())
    }
}
