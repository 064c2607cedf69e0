use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use crate::pipeline::passport_pipeline::pipeline::PipelineError;

/// Failures surfaced to HTTP callers.
///
/// Only the fixed messages below ever reach the client; the wrapped error
/// text is for server-side logs.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No image provided")]
    InputMissing,
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("request body too large: {0}")]
    BodyTooLarge(String),
    #[error("capture failed: {0}")]
    CaptureFailure(anyhow::Error),
    #[error("decode failed: {0}")]
    DecodeFailure(anyhow::Error),
    #[error("no face detected")]
    NoFaceDetected,
    #[error("{0} faces detected")]
    MultipleFacesDetected(usize),
    #[error("unexpected failure: {0}")]
    Unexpected(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InputMissing
            | Self::InvalidBody(_)
            | Self::NoFaceDetected
            | Self::MultipleFacesDetected(_) => StatusCode::BAD_REQUEST,
            Self::BodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::CaptureFailure(_) | Self::DecodeFailure(_) | Self::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            Self::InputMissing => "No image provided",
            Self::InvalidBody(_) => "Invalid request body",
            Self::BodyTooLarge(_) => "Image too large",
            Self::CaptureFailure(_) => "Failed to capture photo",
            Self::DecodeFailure(_) => "Failed to decode image",
            Self::NoFaceDetected => "No face detected. Photo not captured.",
            Self::MultipleFacesDetected(_) => "Multiple faces detected. Photo not captured.",
            Self::Unexpected(_) => "An internal error occurred",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::BodyTooLarge(rejection.body_text())
        } else {
            ApiError::InvalidBody(rejection.body_text())
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::NoFaceDetected => ApiError::NoFaceDetected,
            PipelineError::MultipleFacesDetected(n) => ApiError::MultipleFacesDetected(n),
            PipelineError::DecodeFailure(err) => ApiError::DecodeFailure(err),
            other @ (PipelineError::Detection(_)
            | PipelineError::EmptyCrop(_)
            | PipelineError::Encode(_)) => ApiError::Unexpected(anyhow::Error::new(other)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "message": self.public_message() }))).into_response()
    }
}
