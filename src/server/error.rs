use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::QuizError;

/// Failure of an HTTP request: either the upload itself could not be read, or
/// quiz generation failed.
#[derive(Debug)]
pub enum ApiError {
    Upload(MultipartError),
    Quiz(QuizError),
}

impl From<QuizError> for ApiError {
    fn from(err: QuizError) -> Self {
        ApiError::Quiz(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Upload(err)
    }
}

/// Status code a generation failure is reported with.
pub fn status_for(err: &QuizError) -> StatusCode {
    match err {
        QuizError::MissingInput => StatusCode::BAD_REQUEST,
        QuizError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        QuizError::Upstream(_)
        | QuizError::MalformedResponse { .. }
        | QuizError::InvalidQuizStructure(_) => StatusCode::BAD_GATEWAY,
        QuizError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
    }
}

/// Client-facing message. Upstream bodies and raw model output stay in the logs.
fn public_message(err: &QuizError) -> String {
    match err {
        QuizError::MissingInput => "No PDF file provided".to_string(),
        QuizError::Configuration(_) => "API key not configured".to_string(),
        QuizError::Upstream(e) => match e.status() {
            Some(status) => format!("AI service error: {}", status),
            None => "AI service unavailable".to_string(),
        },
        QuizError::MalformedResponse { .. } => "Failed to parse quiz from AI response".to_string(),
        QuizError::InvalidQuizStructure(_) => "Invalid quiz structure generated".to_string(),
        QuizError::Timeout(_) => "Quiz generation timed out".to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Upload(err) => {
                tracing::warn!("Upload rejected: {}", err.body_text());
                let body = Json(json!({ "error": err.body_text() }));
                (err.status(), body).into_response()
            }
            ApiError::Quiz(err) => {
                let status = status_for(&err);
                if status.is_server_error() {
                    tracing::error!(upstream_status = ?err.upstream_status(), "Quiz generation failed: {}", err);
                } else {
                    tracing::info!("Quiz request rejected: {}", err);
                }
                let body = Json(json!({
                    "error": public_message(&err),
                    "upstream_status": err.upstream_status(),
                }));
                (status, body).into_response()
            }
        }
    }
}
