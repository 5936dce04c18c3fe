//! Screening Inference Engine
//!
//! Loads a pre-trained binary classifier once at startup and maps its
//! output label to a screening result. Artifacts are either JSON model
//! descriptions or ONNX graphs run with tract.

mod artifact;
mod engine;
mod onnx;

pub use artifact::{DecisionTree, JsonModel, LogisticRegression, TreeEnsemble, TreeNode};
pub use engine::{Classifier, InferenceEngine, Prediction, ScreeningResult};
pub use onnx::OnnxModel;

use std::path::PathBuf;
use thiserror::Error;

/// Errors during model loading and inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Model is incompatible with the feature encoder: {0}")]
    IncompatibleModel(String),
    #[error("Unsupported model format: {0}")]
    UnsupportedFormat(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
}
