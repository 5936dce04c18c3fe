//! Encoding Error Types

use thiserror::Error;

/// Errors while turning form answers into a feature vector
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// Categorical label outside the closed option set
    #[error("{field} has no option labelled {label:?}")]
    UnknownCategory { field: &'static str, label: String },

    /// Numeric code with no matching option
    #[error("{field} has no option with code {code}")]
    UnknownCode { field: &'static str, code: f64 },

    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Value could not be parsed as a number
    #[error("{field} is not a valid number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
