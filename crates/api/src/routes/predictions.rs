//! Prediction Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use feature_encoder::{FeatureVector, RawAnswers, SummaryRow};
use inference_engine::ScreeningResult;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;

/// Response for the prediction endpoint
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub result: ScreeningResult,
    pub advice: &'static str,
    pub label: u8,
    pub features: FeatureVector,
    pub summary: Vec<SummaryRow>,
}

/// Screen one set of answers
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawAnswers>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(answers) = payload.map_err(|e| {
        warn!("Rejected prediction body: {}", e.body_text());
        ApiError::from(e)
    })?;
    let assessment = state.assess(&answers)?;
    let result = assessment.prediction.result;

    Ok(Json(PredictionResponse {
        result,
        advice: result.advice(),
        label: result.label(),
        features: assessment.features,
        summary: assessment.input.summary(),
    }))
}
