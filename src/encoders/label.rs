//! Label encoder for binary categorical fields

use super::read_json_artifact;
use crate::error::{ChurnError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Maps each fitted class to its position in the vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub const ARTIFACT: &'static str = "gender label encoder";

    /// Build from a fitted vocabulary, in code order
    pub fn new(classes: Vec<String>) -> std::result::Result<Self, String> {
        if classes.is_empty() {
            return Err("encoder has no fitted classes".to_string());
        }
        let mut seen = HashSet::new();
        if let Some(dup) = classes.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(format!("class '{}' appears more than once", dup));
        }
        Ok(Self { classes })
    }

    /// Load the JSON export `{"classes": [..]}`
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw: LabelEncoder = read_json_artifact(Self::ARTIFACT, path)?;
        Self::new(raw.classes).map_err(|reason| ChurnError::artifact_load(Self::ARTIFACT, path, reason))
    }

    /// Numeric code of `value`
    pub fn transform(&self, field: &'static str, value: &str) -> Result<f64> {
        self.classes
            .iter()
            .position(|c| c == value)
            .map(|code| code as f64)
            .ok_or_else(|| ChurnError::UnknownCategory {
                field,
                value: value.to_string(),
                known: self.classes.clone(),
            })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gender() -> LabelEncoder {
        LabelEncoder::new(vec!["Female".to_string(), "Male".to_string()]).unwrap()
    }

    #[test]
    fn test_codes_follow_class_order() {
        let encoder = gender();
        assert_eq!(encoder.transform("gender", "Female").unwrap(), 0.0);
        assert_eq!(encoder.transform("gender", "Male").unwrap(), 1.0);
    }

    #[test]
    fn test_unknown_class_rejected() {
        let err = gender().transform("gender", "female").unwrap_err();
        assert!(matches!(err, ChurnError::UnknownCategory { field: "gender", .. }));
    }

    #[test]
    fn test_duplicate_classes_rejected() {
        assert!(LabelEncoder::new(vec!["A".to_string(), "A".to_string()]).is_err());
        assert!(LabelEncoder::new(Vec::new()).is_err());
    }
}
