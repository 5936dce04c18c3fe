//! Questionnaire Routes

use axum::{extract::State, http::StatusCode, response::Html, Form};
use feature_encoder::RawAnswers;
use std::sync::Arc;
use tracing::{error, warn};

use crate::error::ApiError;
use crate::render::{questionnaire_page, ResultView};
use crate::AppState;

/// Serve the empty questionnaire
pub async fn questionnaire() -> Html<String> {
    Html(questionnaire_page(&RawAnswers::default(), None, None))
}

/// Handle a questionnaire submission and render the result with the summary table
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Form(answers): Form<RawAnswers>,
) -> (StatusCode, Html<String>) {
    match state.assess(&answers) {
        Ok(assessment) => {
            let summary = assessment.input.summary();
            let view = ResultView {
                result: assessment.prediction.result,
                summary: &summary,
            };
            (
                StatusCode::OK,
                Html(questionnaire_page(&answers, Some(&view), None)),
            )
        }
        Err(e) => {
            match &e {
                ApiError::InvalidInput(_) | ApiError::MalformedBody(_) => {
                    warn!("Rejected submission: {}", e)
                }
                ApiError::Inference(_) => error!("Assessment failed: {}", e),
            }
            (
                e.status(),
                Html(questionnaire_page(&answers, None, Some(&e.to_string()))),
            )
        }
    }
}
