//! ONNX Backend
//!
//! Runs a classifier exported to ONNX (for example with skl2onnx) through
//! tract. The graph takes one `[1, 8]` f32 input and its first output holds
//! the predicted class label: a single integer value. Graphs whose first
//! output is a probability or a score are rejected at load time.

use crate::engine::Classifier;
use crate::InferenceError;
use feature_encoder::FEATURE_DIMENSION;
use std::path::Path;
use tracing::{debug, info};
use tract_onnx::prelude::*;

/// Optimized tract plan for an ONNX classifier
pub struct OnnxModel {
    plan: TypedRunnableModel<TypedModel>,
}

impl OnnxModel {
    /// Load and optimize an ONNX graph, pinning its input to one feature row
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let load_error = |e: TractError| {
            InferenceError::ModelLoadError(format!("{}: {}", path.display(), e))
        };

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(load_error)?
            .with_input_fact(0, f32::fact([1, FEATURE_DIMENSION]).into())
            .map_err(load_error)?
            .into_optimized()
            .map_err(load_error)?;

        check_label_output(&model)?;
        let plan = model.into_runnable().map_err(load_error)?;

        info!("ONNX model loaded: {}", path.display());
        Ok(Self { plan })
    }
}

/// The first output must be exactly one integer class label
fn check_label_output(model: &TypedModel) -> Result<(), InferenceError> {
    let fact = model
        .output_fact(0)
        .map_err(|e| InferenceError::IncompatibleModel(format!("no label output: {}", e)))?;

    let integer = matches!(
        fact.datum_type,
        DatumType::I8
            | DatumType::I16
            | DatumType::I32
            | DatumType::I64
            | DatumType::U8
            | DatumType::U16
            | DatumType::U32
            | DatumType::U64
    );
    if !integer {
        return Err(InferenceError::IncompatibleModel(format!(
            "first output must be an integer class label, found {:?}",
            fact.datum_type
        )));
    }

    match fact.shape.as_concrete() {
        Some(dims) if dims.iter().product::<usize>() == 1 => Ok(()),
        _ => Err(InferenceError::IncompatibleModel(format!(
            "first output must hold one label per row, found shape {:?}",
            fact.shape
        ))),
    }
}

impl Classifier for OnnxModel {
    fn predict_label(&self, features: &[f64]) -> Result<i64, InferenceError> {
        if features.len() != FEATURE_DIMENSION {
            return Err(InferenceError::InvalidInputShape {
                expected: FEATURE_DIMENSION,
                actual: features.len(),
            });
        }

        let row: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input = Tensor::from_shape(&[1, FEATURE_DIMENSION], &row)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let first = outputs
            .first()
            .ok_or_else(|| InferenceError::InferenceFailed("model produced no outputs".into()))?;
        let labels = first
            .cast_to::<i64>()
            .map_err(|e| InferenceError::InferenceFailed(format!("label output: {}", e)))?;
        let label = labels
            .as_slice::<i64>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?
            .first()
            .copied()
            .ok_or_else(|| InferenceError::InferenceFailed("empty label output".into()))?;

        debug!("ONNX label {}", label);
        Ok(label)
    }

    fn backend_name(&self) -> &'static str {
        "onnx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InferenceEngine, ScreeningResult};
    use feature_encoder::{encode, AssessmentInput, Gender, SmokingHistory, YesNo};

    // Both graphs read HbA1c (feature 6). The label graph emits int64
    // `[1, 1]` = (hba1c > 6.45); the probability graph emits sigmoid(hba1c).
    fn fixture(name: &str) -> String {
        format!("{}/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    fn features(hba1c: f64) -> Vec<f64> {
        let input = AssessmentInput {
            gender: Gender::Male,
            age: 52,
            hypertension: YesNo::No,
            smoking_history: SmokingHistory::Never,
            heart_disease: YesNo::No,
            bmi: 31.0,
            hba1c,
            blood_glucose: 160.0,
        };
        encode(&input).values.to_vec()
    }

    #[test]
    fn test_label_output_predicts() {
        let model = OnnxModel::load(Path::new(&fixture("hba1c_label.onnx"))).unwrap();
        assert_eq!(model.predict_label(&features(5.4)).unwrap(), 0);
        assert_eq!(model.predict_label(&features(7.2)).unwrap(), 1);
    }

    #[test]
    fn test_engine_runs_onnx_backend() {
        let engine = InferenceEngine::load(fixture("hba1c_label.onnx")).unwrap();
        assert_eq!(engine.backend_name(), "onnx");

        let high = engine.predict(&encode(&AssessmentInput {
            gender: Gender::Female,
            age: 45,
            hypertension: YesNo::Yes,
            smoking_history: SmokingHistory::Former,
            heart_disease: YesNo::No,
            bmi: 27.5,
            hba1c: 8.0,
            blood_glucose: 140.0,
        }))
        .unwrap();
        assert_eq!(high.result, ScreeningResult::Positive);
    }

    #[test]
    fn test_probability_output_rejected() {
        let err = OnnxModel::load(Path::new(&fixture("hba1c_probability.onnx")))
            .err()
            .unwrap();
        assert!(matches!(err, InferenceError::IncompatibleModel(_)));
    }

    #[test]
    fn test_wrong_feature_count() {
        let model = OnnxModel::load(Path::new(&fixture("hba1c_label.onnx"))).unwrap();
        let err = model.predict_label(&[1.0; 5]).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::InvalidInputShape { expected: 8, actual: 5 }
        ));
    }
}
