//! Feature assembly for churn model inference.
//!
//! Turns a customer record into the scaled numeric vector the classifier
//! was trained on. The column order is fixed by the classifier's input
//! layer:
//!
//! ```text
//! CreditScore, Geography_<c>..., Gender, Age, Tenure, Balance,
//! NumOfProducts, HasCrCard, IsActiveMember, EstimatedSalary
//! ```

use crate::encoders::{LabelEncoder, OneHotEncoder, StandardScaler};
use crate::error::{ChurnError, Result};
use crate::types::customer::CustomerRecord;

/// Column emitted before the geography indicators
pub const LEADING_COLUMN: &str = "CreditScore";

/// Columns emitted after the geography indicators, in order
pub const TRAILING_COLUMNS: [&str; 8] = [
    "Gender",
    "Age",
    "Tenure",
    "Balance",
    "NumOfProducts",
    "HasCrCard",
    "IsActiveMember",
    "EstimatedSalary",
];

/// Scaled feature vector in classifier column order
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFeatureVector(Vec<f64>);

impl EncodedFeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Feature assembler owning the three fitted preprocessing artifacts.
pub struct FeatureAssembler {
    gender: LabelEncoder,
    geography: OneHotEncoder,
    scaler: StandardScaler,
}

impl FeatureAssembler {
    /// Combine the fitted encoders, checking the scaler agrees with the layout
    pub fn new(gender: LabelEncoder, geography: OneHotEncoder, scaler: StandardScaler) -> Result<Self> {
        let assembler = Self {
            gender,
            geography,
            scaler,
        };

        let width = assembler.width();
        if assembler.scaler.dimension() != width {
            return Err(ChurnError::DimensionMismatch {
                stage: "scaler",
                expected: assembler.scaler.dimension(),
                actual: width,
            });
        }

        if let Some(fitted) = assembler.scaler.feature_names() {
            let columns = assembler.column_names();
            if let Some((position, (expected, found))) = columns
                .iter()
                .zip(fitted)
                .enumerate()
                .find(|(_, (expected, found))| expected != found)
            {
                return Err(ChurnError::LayoutMismatch {
                    position,
                    expected: expected.clone(),
                    found: found.clone(),
                });
            }
        }

        Ok(assembler)
    }

    /// Encode, concatenate and scale one record
    pub fn assemble(&self, record: &CustomerRecord) -> Result<EncodedFeatureVector> {
        let mut features = self.encode(record)?;
        self.scaler.transform(&mut features)?;
        Ok(EncodedFeatureVector(features))
    }

    /// Encoded but unscaled features
    pub fn encode(&self, record: &CustomerRecord) -> Result<Vec<f64>> {
        let gender_code = self.gender.transform("gender", &record.gender)?;

        let mut features = Vec::with_capacity(self.width());
        features.push(record.credit_score as f64);
        self.geography
            .transform_into("geography", &record.geography, &mut features)?;
        features.push(gender_code);
        features.push(record.age as f64);
        features.push(record.tenure as f64);
        features.push(record.balance);
        features.push(record.num_of_products as f64);
        features.push(flag(record.has_cr_card));
        features.push(flag(record.is_active_member));
        features.push(record.estimated_salary);

        Ok(features)
    }

    /// Get the number of features produced.
    pub fn width(&self) -> usize {
        1 + self.geography.width() + TRAILING_COLUMNS.len()
    }

    /// Get feature names in classifier order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.width());
        names.push(LEADING_COLUMN.to_string());
        names.extend(self.geography.column_names());
        names.extend(TRAILING_COLUMNS.iter().map(|c| c.to_string()));
        names
    }

    pub fn gender_classes(&self) -> &[String] {
        self.gender.classes()
    }

    pub fn geography_categories(&self) -> &[String] {
        self.geography.categories()
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
