//! One-hot encoder for the geography field

use super::read_json_artifact;
use crate::error::{ChurnError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Which fitted category, if any, is dropped from the output columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPolicy {
    /// Drop the first category (N-1 columns)
    First,
}

/// Expands one categorical value into binary indicator columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// Input feature name, used as the column prefix
    feature: String,
    /// Fitted categories in column order
    categories: Vec<String>,
    #[serde(default)]
    drop: Option<DropPolicy>,
}

impl OneHotEncoder {
    pub const ARTIFACT: &'static str = "geography one-hot encoder";

    pub fn new(
        feature: impl Into<String>,
        categories: Vec<String>,
        drop: Option<DropPolicy>,
    ) -> std::result::Result<Self, String> {
        let min = if drop.is_some() { 2 } else { 1 };
        if categories.len() < min {
            return Err(format!(
                "encoder needs at least {} categories, has {}",
                min,
                categories.len()
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = categories.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(format!("category '{}' appears more than once", dup));
        }
        Ok(Self {
            feature: feature.into(),
            categories,
            drop,
        })
    }

    /// Load the JSON export `{"feature": .., "categories": [..], "drop": null|"first"}`
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw: OneHotEncoder = read_json_artifact(Self::ARTIFACT, path)?;
        Self::new(raw.feature, raw.categories, raw.drop)
            .map_err(|reason| ChurnError::artifact_load(Self::ARTIFACT, path, reason))
    }

    /// Number of output columns
    pub fn width(&self) -> usize {
        self.categories.len() - self.dropped()
    }

    /// Output column names, `<feature>_<category>`
    pub fn column_names(&self) -> Vec<String> {
        self.categories[self.dropped()..]
            .iter()
            .map(|c| format!("{}_{}", self.feature, c))
            .collect()
    }

    /// Append the indicator columns for `value` to `out`
    pub fn transform_into(&self, field: &'static str, value: &str, out: &mut Vec<f64>) -> Result<()> {
        let index = self
            .categories
            .iter()
            .position(|c| c == value)
            .ok_or_else(|| ChurnError::UnknownCategory {
                field,
                value: value.to_string(),
                known: self.categories.clone(),
            })?;

        let offset = self.dropped();
        out.extend((offset..self.categories.len()).map(|i| if i == index { 1.0 } else { 0.0 }));
        Ok(())
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    fn dropped(&self) -> usize {
        match self.drop {
            Some(DropPolicy::First) => 1,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries() -> Vec<String> {
        ["France", "Germany", "Spain"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_full_encoding() {
        let encoder = OneHotEncoder::new("Geography", countries(), None).unwrap();
        let mut out = Vec::new();
        encoder.transform_into("geography", "Germany", &mut out).unwrap();

        assert_eq!(out, vec![0.0, 1.0, 0.0]);
        assert_eq!(
            encoder.column_names(),
            vec!["Geography_France", "Geography_Germany", "Geography_Spain"]
        );
    }

    #[test]
    fn test_drop_first_encoding() {
        let encoder = OneHotEncoder::new("Geography", countries(), Some(DropPolicy::First)).unwrap();
        assert_eq!(encoder.width(), 2);

        let mut out = Vec::new();
        encoder.transform_into("geography", "France", &mut out).unwrap();
        encoder.transform_into("geography", "Spain", &mut out).unwrap();
        assert_eq!(out, vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_unknown_geography_is_not_encoded_as_zero() {
        let encoder = OneHotEncoder::new("Geography", countries(), None).unwrap();
        let mut out = Vec::new();

        let err = encoder.transform_into("geography", "Italy", &mut out).unwrap_err();
        assert!(matches!(err, ChurnError::UnknownCategory { ref value, .. } if value == "Italy"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_drop_policy_deserialization() {
        let json = r#"{"feature": "Geography", "categories": ["A", "B"], "drop": "first"}"#;
        let encoder: OneHotEncoder = serde_json::from_str(json).unwrap();
        assert_eq!(encoder.width(), 1);

        let json = r#"{"feature": "Geography", "categories": ["A", "B"]}"#;
        let encoder: OneHotEncoder = serde_json::from_str(json).unwrap();
        assert_eq!(encoder.width(), 2);
    }
}
