//! API Error Types

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use feature_encoder::EncodeError;
use inference_engine::InferenceError;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while serving an assessment
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body was not valid answer JSON
    #[error("Malformed request body: {}", .0.body_text())]
    MalformedBody(#[from] JsonRejection),
    /// Answers could not be encoded
    #[error("Invalid answers: {0}")]
    InvalidInput(#[from] EncodeError),
    /// Classifier call failed; no retry is attempted
    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody(rejection) => match rejection {
                JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            },
            ApiError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
