//! JSON Model Artifacts
//!
//! A JSON artifact describes either a logistic regression or an ensemble
//! of decision trees exported from the training pipeline:
//!
//! ```json
//! { "kind": "tree_ensemble", "threshold": 0.5,
//!   "feature_names": ["gender", "age", ...],
//!   "trees": [ { "nodes": [ { "feature": 6, "threshold": 6.65, "left": 1, "right": 2 },
//!                           { "value": 0.02 }, { "value": 0.97 } ] } ] }
//! ```

use crate::engine::Classifier;
use crate::InferenceError;
use feature_encoder::{FEATURE_DIMENSION, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

fn default_threshold() -> f64 {
    0.5
}

/// Classifier described by a JSON artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JsonModel {
    LogisticRegression(LogisticRegression),
    TreeEnsemble(TreeEnsemble),
}

/// Logistic regression over the raw feature vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Positive-class probability at or above which the label is 1
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

/// Averaged ensemble of decision trees (random forest style)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub trees: Vec<DecisionTree>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Node 0 is the root. Children always have a higher index than their parent.
    pub nodes: Vec<TreeNode>,
}

/// Tree node. Splits send `x[feature] <= threshold` to `left`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Positive-class probability
        value: f64,
    },
}

impl JsonModel {
    /// Read and check a JSON artifact
    pub fn from_path(path: &Path) -> Result<Self, InferenceError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;
        let model = Self::from_json(&text)?;
        info!("Loaded {} artifact from {}", model.kind(), path.display());
        Ok(model)
    }

    /// Parse and check a JSON artifact
    pub fn from_json(text: &str) -> Result<Self, InferenceError> {
        let model: JsonModel = serde_json::from_str(text)
            .map_err(|e| InferenceError::ModelLoadError(format!("invalid artifact: {}", e)))?;
        model.check()?;
        Ok(model)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            JsonModel::LogisticRegression(_) => "logistic_regression",
            JsonModel::TreeEnsemble(_) => "tree_ensemble",
        }
    }

    /// Verify the artifact matches the encoder's feature contract
    pub fn check(&self) -> Result<(), InferenceError> {
        let (names, threshold) = match self {
            JsonModel::LogisticRegression(m) => (&m.feature_names, m.threshold),
            JsonModel::TreeEnsemble(m) => (&m.feature_names, m.threshold),
        };

        if let Some(names) = names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(InferenceError::IncompatibleModel(format!(
                    "feature order {:?} does not match {:?}",
                    names, FEATURE_NAMES
                )));
            }
        }

        if !(0.0..=1.0).contains(&threshold) {
            return Err(InferenceError::IncompatibleModel(format!(
                "threshold {} outside [0, 1]",
                threshold
            )));
        }

        match self {
            JsonModel::LogisticRegression(m) => m.check(),
            JsonModel::TreeEnsemble(m) => m.check(),
        }
    }

    /// Positive-class probability for a feature slice
    pub fn probability(&self, features: &[f64]) -> f64 {
        match self {
            JsonModel::LogisticRegression(m) => m.probability(features),
            JsonModel::TreeEnsemble(m) => m.probability(features),
        }
    }

    fn threshold(&self) -> f64 {
        match self {
            JsonModel::LogisticRegression(m) => m.threshold,
            JsonModel::TreeEnsemble(m) => m.threshold,
        }
    }
}

impl LogisticRegression {
    fn check(&self) -> Result<(), InferenceError> {
        if self.coefficients.len() != FEATURE_DIMENSION {
            return Err(InferenceError::IncompatibleModel(format!(
                "expected {} coefficients, got {}",
                FEATURE_DIMENSION,
                self.coefficients.len()
            )));
        }
        Ok(())
    }

    pub fn probability(&self, features: &[f64]) -> f64 {
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>();
        1.0 / (1.0 + (-z).exp())
    }
}

impl TreeEnsemble {
    fn check(&self) -> Result<(), InferenceError> {
        if self.trees.is_empty() {
            return Err(InferenceError::IncompatibleModel("ensemble has no trees".into()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check()
                .map_err(|msg| InferenceError::IncompatibleModel(format!("tree {}: {}", i, msg)))?;
        }
        Ok(())
    }

    /// Mean leaf probability across trees
    pub fn probability(&self, features: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.evaluate(features)).sum();
        total / self.trees.len() as f64
    }
}

impl DecisionTree {
    fn check(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("no nodes".into());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= FEATURE_DIMENSION {
                        return Err(format!("node {} splits on feature {}", idx, feature));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has non-finite threshold", idx));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", idx, child));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(format!("node {} leaf value {} outside [0, 1]", idx, value));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf. Assumes [`DecisionTree::check`] passed.
    pub fn evaluate(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[feature] <= threshold { left } else { right };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

impl Classifier for JsonModel {
    fn predict_label(&self, features: &[f64]) -> Result<i64, InferenceError> {
        if features.len() != FEATURE_DIMENSION {
            return Err(InferenceError::InvalidInputShape {
                expected: FEATURE_DIMENSION,
                actual: features.len(),
            });
        }
        let probability = self.probability(features);
        debug!("{} positive probability {:.4}", self.kind(), probability);
        Ok(i64::from(probability >= self.threshold()))
    }

    fn backend_name(&self) -> &'static str {
        self.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STUMP: &str = r#"{
        "kind": "tree_ensemble",
        "trees": [
            { "nodes": [
                { "feature": 6, "threshold": 6.5, "left": 1, "right": 2 },
                { "value": 0.1 },
                { "value": 0.9 }
            ] }
        ]
    }"#;

    #[test]
    fn test_tree_stump() {
        let model = JsonModel::from_json(STUMP).unwrap();
        let mut x = [0.0, 45.0, 0.0, 4.0, 0.0, 25.0, 5.0, 100.0];
        assert_eq!(model.predict_label(&x).unwrap(), 0);
        x[6] = 6.5;
        assert_eq!(model.predict_label(&x).unwrap(), 0);
        x[6] = 7.0;
        assert_eq!(model.predict_label(&x).unwrap(), 1);
    }

    #[test]
    fn test_logistic_regression() {
        let model = JsonModel::from_json(
            r#"{ "kind": "logistic_regression",
                 "coefficients": [0, 0, 0, 0, 0, 0, 0, 0.05],
                 "intercept": -7.0 }"#,
        )
        .unwrap();
        assert_eq!(model.backend_name(), "logistic_regression");

        let low = [0.0, 45.0, 0.0, 4.0, 0.0, 25.0, 5.0, 100.0];
        let high = [0.0, 45.0, 0.0, 4.0, 0.0, 25.0, 5.0, 200.0];
        assert!(model.probability(&low) < 0.5);
        assert_eq!(model.predict_label(&low).unwrap(), 0);
        assert_eq!(model.predict_label(&high).unwrap(), 1);
    }

    #[test]
    fn test_wrong_coefficient_count_is_incompatible() {
        let err = JsonModel::from_json(
            r#"{ "kind": "logistic_regression", "coefficients": [1, 2, 3], "intercept": 0 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, InferenceError::IncompatibleModel(_)));
    }

    #[test]
    fn test_feature_order_must_match() {
        let err = JsonModel::from_json(
            r#"{ "kind": "logistic_regression",
                 "feature_names": ["age", "gender", "hypertension", "smoking_history",
                                   "heart_disease", "bmi", "HbA1c_level", "blood_glucose_level"],
                 "coefficients": [0, 0, 0, 0, 0, 0, 0, 0], "intercept": 0 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, InferenceError::IncompatibleModel(_)));
    }

    #[test]
    fn test_cyclic_tree_rejected() {
        let err = JsonModel::from_json(
            r#"{ "kind": "tree_ensemble", "trees": [ { "nodes": [
                { "feature": 0, "threshold": 0.5, "left": 0, "right": 1 },
                { "value": 1.0 }
            ] } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, InferenceError::IncompatibleModel(_)));
    }

    #[test]
    fn test_unknown_kind_fails_to_load() {
        let err = JsonModel::from_json(r#"{ "kind": "svm" }"#).unwrap_err();
        assert!(matches!(err, InferenceError::ModelLoadError(_)));
    }

    #[test]
    fn test_wrong_input_length() {
        let model = JsonModel::from_json(STUMP).unwrap();
        let err = model.predict_label(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::InvalidInputShape { expected: 8, actual: 2 }
        ));
    }
}
