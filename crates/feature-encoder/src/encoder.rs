//! Feature Vector Assembly

use crate::answers::{AssessmentInput, Gender, SmokingHistory, YesNo};
use crate::error::EncodeError;
use crate::validator::Validator;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 8;

/// Feature names in the order the classifier was trained on
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = [
    "gender",
    "age",
    "hypertension",
    "smoking_history",
    "heart_disease",
    "bmi",
    "HbA1c_level",
    "blood_glucose_level",
];

/// Feature vector for classifier inference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    /// Raw feature values, indexed as [`FEATURE_NAMES`]
    pub values: [f64; FEATURE_DIMENSION],
}

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Encode an assessment into the contracted feature order
pub fn encode(input: &AssessmentInput) -> FeatureVector {
    let values = [
        f64::from(input.gender.code()),
        f64::from(input.age),
        f64::from(input.hypertension.code()),
        f64::from(input.smoking_history.code()),
        f64::from(input.heart_disease.code()),
        input.bmi,
        input.hba1c,
        input.blood_glucose,
    ];
    debug!("Encoded assessment: {:?}", values);
    FeatureVector { values }
}

/// Recover the assessment a vector was encoded from
pub fn decode(features: &FeatureVector) -> Result<AssessmentInput, EncodeError> {
    let v = &features.values;

    let age = v[1];
    if !age.is_finite() || age.fract() != 0.0 || age < 0.0 || age > f64::from(u32::MAX) {
        return Err(EncodeError::InvalidNumber {
            field: "age",
            value: age.to_string(),
        });
    }

    let input = AssessmentInput {
        gender: Gender::from_code(v[0])?,
        age: age as u32,
        hypertension: YesNo::from_code("hypertension", v[2])?,
        smoking_history: SmokingHistory::from_code(v[3])?,
        heart_disease: YesNo::from_code("heart_disease", v[4])?,
        bmi: v[5],
        hba1c: v[6],
        blood_glucose: v[7],
    };

    Validator::default().validate(&input)?;
    Ok(input)
}
