//! Inference Engine Implementation

use crate::artifact::JsonModel;
use crate::onnx::OnnxModel;
use crate::InferenceError;
use feature_encoder::FeatureVector;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// A loaded binary classifier
pub trait Classifier: Send + Sync {
    /// Predict the class label for one feature vector
    fn predict_label(&self, features: &[f64]) -> Result<i64, InferenceError>;

    /// Short name of the backend, reported in health output
    fn backend_name(&self) -> &'static str;
}

/// Screening outcome derived from the classifier label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScreeningResult {
    /// Label 0
    Negative,
    /// Label 1
    Positive,
}

impl ScreeningResult {
    /// Map a raw classifier label
    pub fn from_label(label: i64) -> Result<Self, InferenceError> {
        match label {
            0 => Ok(ScreeningResult::Negative),
            1 => Ok(ScreeningResult::Positive),
            other => Err(InferenceError::InferenceFailed(format!(
                "classifier returned non-binary label {}",
                other
            ))),
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreeningResult::Negative => "NEGATIVE",
            ScreeningResult::Positive => "POSITIVE",
        }
    }

    /// Get recommended action
    pub fn advice(&self) -> &'static str {
        match self {
            ScreeningResult::Negative => "No Indication Detected",
            ScreeningResult::Positive => "Consult a Doctor",
        }
    }

    pub fn label(&self) -> u8 {
        match self {
            ScreeningResult::Negative => 0,
            ScreeningResult::Positive => 1,
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, ScreeningResult::Positive)
    }
}

/// Result of one inference call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub result: ScreeningResult,
    /// Inference latency in microseconds
    pub latency_us: u64,
}

/// Inference engine wrapping a loaded classifier.
///
/// Constructed once at startup and shared read-only between requests.
pub struct InferenceEngine {
    classifier: Box<dyn Classifier>,
    model_path: String,
}

impl InferenceEngine {
    /// Load a classifier artifact, choosing the backend by file extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        info!("Loading classifier artifact: {}", path.display());

        if !path.is_file() {
            return Err(InferenceError::ArtifactNotFound(path.to_path_buf()));
        }

        let classifier: Box<dyn Classifier> = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Box::new(JsonModel::from_path(path)?),
            Some("onnx") => Box::new(OnnxModel::load(path)?),
            other => {
                return Err(InferenceError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        info!("Classifier ready: backend={}", classifier.backend_name());
        Ok(Self {
            classifier,
            model_path: path.display().to_string(),
        })
    }

    /// Wrap an already constructed classifier
    pub fn with_classifier(classifier: Box<dyn Classifier>) -> Self {
        Self {
            classifier,
            model_path: "in-memory".to_string(),
        }
    }

    /// Run inference on a feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        let start = std::time::Instant::now();

        let label = self.classifier.predict_label(features.as_slice())?;
        let result = ScreeningResult::from_label(label)?;

        let latency_us = start.elapsed().as_micros() as u64;
        debug!("Inference completed in {}us: {}", latency_us, result.as_str());

        Ok(Prediction { result, latency_us })
    }

    pub fn backend_name(&self) -> &'static str {
        self.classifier.backend_name()
    }

    /// Get model path
    pub fn model_path(&self) -> &str {
        &self.model_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_encoder::{encode, AssessmentInput, Gender, SmokingHistory, YesNo};
    use std::io::Write;

    /// Classifier that always answers with the same label
    struct FixedLabel(i64);

    impl Classifier for FixedLabel {
        fn predict_label(&self, _features: &[f64]) -> Result<i64, InferenceError> {
            Ok(self.0)
        }

        fn backend_name(&self) -> &'static str {
            "fixed"
        }
    }

    fn bundled_model() -> &'static str {
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../models/diabetes.json")
    }

    fn assessment(hba1c: f64, blood_glucose: f64) -> AssessmentInput {
        AssessmentInput {
            gender: Gender::Female,
            age: 45,
            hypertension: YesNo::Yes,
            smoking_history: SmokingHistory::Former,
            heart_disease: YesNo::No,
            bmi: 27.5,
            hba1c,
            blood_glucose,
        }
    }

    #[test]
    fn test_label_one_is_positive() {
        let engine = InferenceEngine::with_classifier(Box::new(FixedLabel(1)));
        let prediction = engine.predict(&encode(&assessment(6.1, 140.0))).unwrap();
        assert_eq!(prediction.result, ScreeningResult::Positive);
        assert_eq!(prediction.result.as_str(), "POSITIVE");
    }

    #[test]
    fn test_label_zero_is_negative() {
        let engine = InferenceEngine::with_classifier(Box::new(FixedLabel(0)));
        let prediction = engine.predict(&encode(&assessment(6.1, 140.0))).unwrap();
        assert_eq!(prediction.result, ScreeningResult::Negative);
        assert_eq!(prediction.result.as_str(), "NEGATIVE");
        assert_eq!(prediction.result.advice(), "No Indication Detected");
    }

    #[test]
    fn test_non_binary_label_fails() {
        let engine = InferenceEngine::with_classifier(Box::new(FixedLabel(2)));
        let err = engine.predict(&encode(&assessment(6.1, 140.0))).unwrap_err();
        assert!(matches!(err, InferenceError::InferenceFailed(_)));
    }

    #[test]
    fn test_missing_artifact() {
        let err = InferenceEngine::load("/nonexistent/diabetes.json").err().unwrap();
        assert!(matches!(err, InferenceError::ArtifactNotFound(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diabetes.pkl");
        std::fs::write(&path, b"\x80\x04").unwrap();

        let err = InferenceEngine::load(&path).err().unwrap();
        assert!(matches!(err, InferenceError::UnsupportedFormat(ext) if ext == "pkl"));
    }

    #[test]
    fn test_corrupt_onnx_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diabetes.onnx");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"not an onnx model").unwrap();

        let err = InferenceEngine::load(&path).err().unwrap();
        assert!(matches!(err, InferenceError::ModelLoadError(_)));
    }

    #[test]
    fn test_bundled_artifact() {
        let engine = InferenceEngine::load(bundled_model()).unwrap();
        assert_eq!(engine.backend_name(), "tree_ensemble");

        let low = engine.predict(&encode(&assessment(6.1, 140.0))).unwrap();
        assert_eq!(low.result, ScreeningResult::Negative);

        let high = engine.predict(&encode(&assessment(7.5, 250.0))).unwrap();
        assert_eq!(high.result, ScreeningResult::Positive);
    }
}
