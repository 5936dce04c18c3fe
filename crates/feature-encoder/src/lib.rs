//! Feature Encoding for the Screening Questionnaire
//!
//! Maps questionnaire answers to the fixed-order numeric vector the
//! classifier was trained on, and back to display labels for the summary.

mod answers;
mod encoder;
mod error;
mod validator;

pub use answers::{AssessmentInput, Gender, RawAnswers, SmokingHistory, SummaryRow, YesNo};
pub use encoder::{decode, encode, FeatureVector, FEATURE_DIMENSION, FEATURE_NAMES};
pub use error::EncodeError;
pub use validator::{ValidationConfig, Validator};
