//! Range Checking for Numeric Answers

use crate::answers::AssessmentInput;
use crate::error::EncodeError;
use serde::{Deserialize, Serialize};

/// Validation configuration. All ranges are inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Age valid range (years)
    pub age_range: (u32, u32),
    /// BMI valid range (kg/m²)
    pub bmi_range: (f64, f64),
    /// HbA1c valid range (%)
    pub hba1c_range: (f64, f64),
    /// Blood glucose valid range (mg/dL)
    pub glucose_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            age_range: (0, 120),
            bmi_range: (0.0, 60.0),
            hba1c_range: (0.0, 20.0),
            glucose_range: (0.0, 600.0),
        }
    }
}

/// Validator for questionnaire numerics
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), EncodeError> {
        if !value.is_finite() {
            return Err(EncodeError::InvalidNumber {
                field,
                value: value.to_string(),
            });
        }
        if value < range.0 || value > range.1 {
            Err(EncodeError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    pub fn validate_age(&self, age: u32) -> Result<(), EncodeError> {
        let (min, max) = self.config.age_range;
        self.validate_range("age", f64::from(age), (f64::from(min), f64::from(max)))
    }

    pub fn validate_bmi(&self, bmi: f64) -> Result<(), EncodeError> {
        self.validate_range("bmi", bmi, self.config.bmi_range)
    }

    pub fn validate_hba1c(&self, hba1c: f64) -> Result<(), EncodeError> {
        self.validate_range("hba1c", hba1c, self.config.hba1c_range)
    }

    pub fn validate_glucose(&self, glucose: f64) -> Result<(), EncodeError> {
        self.validate_range("blood_glucose", glucose, self.config.glucose_range)
    }

    /// Validate every numeric answer, stopping at the first failure
    pub fn validate(&self, input: &AssessmentInput) -> Result<(), EncodeError> {
        self.validate_age(input.age)?;
        self.validate_bmi(input.bmi)?;
        self.validate_hba1c(input.hba1c)?;
        self.validate_glucose(input.blood_glucose)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
