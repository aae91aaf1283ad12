use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Html,
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use crate::error::QuizError;
use crate::quiz::Quiz;
use crate::request::Document;

use super::error::ApiError;
use super::state::AppState;

/// Multipart field carrying the document.
pub const UPLOAD_FIELD: &str = "pdf";

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /api/generate-quiz`
///
/// Reads the `pdf` field and generates a quiz from it. Receiving the upload
/// and the external call share one deadline.
#[instrument(skip_all)]
pub async fn generate_quiz(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Quiz>, ApiError> {
    let deadline = state.config.request_timeout;

    let work = async {
        let document = match multipart {
            Ok(multipart) => read_document(multipart).await?,
            Err(rejection) => {
                warn!("Request is not a multipart upload: {}", rejection.body_text());
                None
            }
        };
        let quiz = state.generator.generate(document).await?;
        Ok::<_, ApiError>(quiz)
    };

    match tokio::time::timeout(deadline, work).await {
        Ok(result) => result.map(Json),
        Err(_) => {
            warn!(timeout_secs = deadline.as_secs(), "Request deadline elapsed");
            Err(QuizError::Timeout(deadline).into())
        }
    }
}

/// First `pdf` field of the form, if any. Other fields are skipped.
async fn read_document(mut multipart: Multipart) -> Result<Option<Document>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!(field = ?field.name(), "Skipping form field");
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        debug!(
            file_name = ?file_name,
            content_type = ?content_type,
            size = bytes.len(),
            "Received upload"
        );

        let document = Document::pdf(bytes);
        return Ok(Some(match file_name {
            Some(name) => document.with_file_name(name),
            None => document,
        }));
    }
    Ok(None)
}
