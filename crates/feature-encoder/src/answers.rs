//! Questionnaire Answers
//!
//! Closed option sets for the categorical questions and the typed
//! assessment assembled from one form submission.

use crate::error::EncodeError;
use crate::validator::Validator;
use serde::{Deserialize, Deserializer, Serialize};

/// Gender question options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// All options in display order
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }

    /// Code used in the feature vector
    pub fn code(&self) -> u8 {
        match self {
            Gender::Female => 0,
            Gender::Male => 1,
        }
    }

    /// Look up an option by its display label
    pub fn from_label(label: &str) -> Result<Self, EncodeError> {
        Self::ALL
            .into_iter()
            .find(|g| g.label() == label)
            .ok_or_else(|| EncodeError::UnknownCategory {
                field: "gender",
                label: label.to_string(),
            })
    }

    /// Look up an option by its feature code
    pub fn from_code(code: f64) -> Result<Self, EncodeError> {
        Self::ALL
            .into_iter()
            .find(|g| f64::from(g.code()) == code)
            .ok_or(EncodeError::UnknownCode { field: "gender", code })
    }
}

/// Answer to a yes/no question. `No` encodes as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    No,
    Yes,
}

impl YesNo {
    /// All options in display order
    pub const ALL: [YesNo; 2] = [YesNo::No, YesNo::Yes];

    pub fn label(&self) -> &'static str {
        match self {
            YesNo::No => "No",
            YesNo::Yes => "Yes",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            YesNo::No => 0,
            YesNo::Yes => 1,
        }
    }

    /// Look up an option by its display label; `field` names the question for errors
    pub fn from_label(field: &'static str, label: &str) -> Result<Self, EncodeError> {
        Self::ALL
            .into_iter()
            .find(|a| a.label() == label)
            .ok_or_else(|| EncodeError::UnknownCategory {
                field,
                label: label.to_string(),
            })
    }

    pub fn from_code(field: &'static str, code: f64) -> Result<Self, EncodeError> {
        Self::ALL
            .into_iter()
            .find(|a| f64::from(a.code()) == code)
            .ok_or(EncodeError::UnknownCode { field, code })
    }
}

/// Smoking history options.
///
/// Codes follow the label encoding of the training data and are not
/// in display order of meaning: "Yes" is the ever-smoked category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SmokingHistory {
    #[serde(rename = "Not known")]
    NotKnown,
    Current,
    Yes,
    Former,
    Never,
    #[serde(rename = "Not current")]
    NotCurrent,
}

impl SmokingHistory {
    /// All options, indexed by code
    pub const ALL: [SmokingHistory; 6] = [
        SmokingHistory::NotKnown,
        SmokingHistory::Current,
        SmokingHistory::Yes,
        SmokingHistory::Former,
        SmokingHistory::Never,
        SmokingHistory::NotCurrent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SmokingHistory::NotKnown => "Not known",
            SmokingHistory::Current => "Current",
            SmokingHistory::Yes => "Yes",
            SmokingHistory::Former => "Former",
            SmokingHistory::Never => "Never",
            SmokingHistory::NotCurrent => "Not current",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            SmokingHistory::NotKnown => 0,
            SmokingHistory::Current => 1,
            SmokingHistory::Yes => 2,
            SmokingHistory::Former => 3,
            SmokingHistory::Never => 4,
            SmokingHistory::NotCurrent => 5,
        }
    }

    pub fn from_label(label: &str) -> Result<Self, EncodeError> {
        Self::ALL
            .into_iter()
            .find(|s| s.label() == label)
            .ok_or_else(|| EncodeError::UnknownCategory {
                field: "smoking_history",
                label: label.to_string(),
            })
    }

    pub fn from_code(code: f64) -> Result<Self, EncodeError> {
        Self::ALL
            .into_iter()
            .find(|s| f64::from(s.code()) == code)
            .ok_or(EncodeError::UnknownCode {
                field: "smoking_history",
                code,
            })
    }
}

/// Raw form values as submitted by the questionnaire widgets.
///
/// Numeric answers may arrive as strings (form posts) or as JSON numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAnswers {
    pub gender: String,
    #[serde(deserialize_with = "string_or_number")]
    pub age: String,
    pub hypertension: String,
    pub smoking_history: String,
    pub heart_disease: String,
    #[serde(deserialize_with = "string_or_number")]
    pub bmi: String,
    #[serde(deserialize_with = "string_or_number")]
    pub hba1c: String,
    #[serde(deserialize_with = "string_or_number")]
    pub blood_glucose: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StrOrNum {
    Text(String),
    Int(i64),
    Float(f64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StrOrNum::deserialize(deserializer)? {
        StrOrNum::Text(text) => text,
        StrOrNum::Int(n) => n.to_string(),
        StrOrNum::Float(n) => n.to_string(),
    })
}

/// One row of the response summary table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub question: &'static str,
    pub answer: String,
}

/// Typed answers from one questionnaire submission
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    pub gender: Gender,
    /// Age in whole years
    pub age: u32,
    pub hypertension: YesNo,
    pub smoking_history: SmokingHistory,
    pub heart_disease: YesNo,
    /// Body-mass index (kg/m²)
    pub bmi: f64,
    /// Glycated hemoglobin (%)
    pub hba1c: f64,
    /// Blood glucose (mg/dL)
    pub blood_glucose: f64,
}

impl AssessmentInput {
    /// Parse and validate raw form values against the default ranges
    pub fn from_raw(raw: &RawAnswers) -> Result<Self, EncodeError> {
        Self::from_raw_with(raw, &Validator::default())
    }

    /// Parse raw form values and check them with `validator`
    pub fn from_raw_with(raw: &RawAnswers, validator: &Validator) -> Result<Self, EncodeError> {
        let input = Self {
            gender: Gender::from_label(required("gender", &raw.gender)?)?,
            age: parse_age(&raw.age)?,
            hypertension: YesNo::from_label(
                "hypertension",
                required("hypertension", &raw.hypertension)?,
            )?,
            smoking_history: SmokingHistory::from_label(required(
                "smoking_history",
                &raw.smoking_history,
            )?)?,
            heart_disease: YesNo::from_label(
                "heart_disease",
                required("heart_disease", &raw.heart_disease)?,
            )?,
            bmi: parse_float("bmi", &raw.bmi)?,
            hba1c: parse_float("hba1c", &raw.hba1c)?,
            blood_glucose: parse_float("blood_glucose", &raw.blood_glucose)?,
        };

        validator.validate(&input)?;
        Ok(input)
    }

    /// Raw form values that reproduce this assessment
    pub fn to_raw(&self) -> RawAnswers {
        RawAnswers {
            gender: self.gender.label().to_string(),
            age: self.age.to_string(),
            hypertension: self.hypertension.label().to_string(),
            smoking_history: self.smoking_history.label().to_string(),
            heart_disease: self.heart_disease.label().to_string(),
            bmi: self.bmi.to_string(),
            hba1c: self.hba1c.to_string(),
            blood_glucose: self.blood_glucose.to_string(),
        }
    }

    /// Human-readable echo of the answers, in questionnaire order
    pub fn summary(&self) -> Vec<SummaryRow> {
        let row = |question, answer: String| SummaryRow { question, answer };
        vec![
            row("Gender", self.gender.label().to_string()),
            row("Age", self.age.to_string()),
            row("Hypertension", self.hypertension.label().to_string()),
            row("Smoking History", self.smoking_history.label().to_string()),
            row("Heart Disease", self.heart_disease.label().to_string()),
            row("BMI", format!("{:.2}", self.bmi)),
            row("HbA1c Level", format!("{:.2}", self.hba1c)),
            row("Blood Glucose Level", format!("{:.1}", self.blood_glucose)),
        ]
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, EncodeError> {
    let value = value.trim();
    if value.is_empty() {
        Err(EncodeError::MissingField(field))
    } else {
        Ok(value)
    }
}

fn parse_age(value: &str) -> Result<u32, EncodeError> {
    let value = required("age", value)?;
    value.parse::<u32>().map_err(|_| EncodeError::InvalidNumber {
        field: "age",
        value: value.to_string(),
    })
}

fn parse_float(field: &'static str, value: &str) -> Result<f64, EncodeError> {
    let value = required(field, value)?;
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(EncodeError::InvalidNumber {
            field,
            value: value.to_string(),
        }),
    }
}
