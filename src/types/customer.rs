//! Customer attributes submitted for scoring

use crate::config::{InputRange, InputRanges};
use crate::error::{ChurnError, Result};
use serde::{Deserialize, Serialize};

/// One customer as collected by the form.
///
/// Created per request and never mutated after submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Credit score (typically 300 - 850)
    pub credit_score: i32,

    /// Country of residence, one of the fitted geography categories
    pub geography: String,

    /// Gender, one of the fitted gender classes
    pub gender: String,

    /// Age in years
    pub age: u32,

    /// Years with the bank
    pub tenure: u32,

    /// Account balance
    pub balance: f64,

    /// Number of bank products held
    pub num_of_products: u32,

    /// Holds a credit card
    pub has_cr_card: bool,

    /// Counted as an active member
    pub is_active_member: bool,

    /// Estimated annual salary
    pub estimated_salary: f64,
}

impl CustomerRecord {
    /// Record pre-filled with the form defaults
    pub fn from_defaults(ranges: &InputRanges, geography: &str, gender: &str) -> Self {
        Self {
            credit_score: ranges.credit_score.default as i32,
            geography: geography.to_string(),
            gender: gender.to_string(),
            age: ranges.age.default as u32,
            tenure: ranges.tenure.default as u32,
            balance: ranges.balance.default,
            num_of_products: ranges.num_of_products.default as u32,
            has_cr_card: true,
            is_active_member: true,
            estimated_salary: ranges.estimated_salary.default,
        }
    }

    /// Check every numeric field against its accepted domain.
    ///
    /// Categorical fields are checked later by the encoders.
    pub fn validate(&self, ranges: &InputRanges) -> Result<()> {
        check("credit_score", self.credit_score as f64, &ranges.credit_score)?;
        check("age", self.age as f64, &ranges.age)?;
        check("tenure", self.tenure as f64, &ranges.tenure)?;
        check("balance", self.balance, &ranges.balance)?;
        check("num_of_products", self.num_of_products as f64, &ranges.num_of_products)?;
        check("estimated_salary", self.estimated_salary, &ranges.estimated_salary)?;
        Ok(())
    }
}

fn check(field: &str, value: f64, range: &InputRange) -> Result<()> {
    if !value.is_finite() {
        return Err(ChurnError::InvalidInput(format!("{} must be a finite number", field)));
    }
    if !range.contains(value) {
        return Err(ChurnError::InvalidInput(format!(
            "{} = {} is outside the accepted range [{}, {}]",
            field, value, range.min, range.max
        )));
    }
    Ok(())
}

/// Parse a `Yes`/`No` form toggle
pub fn parse_toggle(field: &str, value: &str) -> Result<bool> {
    match value.trim() {
        v if v.eq_ignore_ascii_case("yes") || v == "1" || v.eq_ignore_ascii_case("true") => Ok(true),
        v if v.eq_ignore_ascii_case("no") || v == "0" || v.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(ChurnError::InvalidInput(format!(
            "{} must be Yes or No, got '{}'",
            field, other
        ))),
    }
}
