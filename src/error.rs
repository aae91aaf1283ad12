use std::time::Duration;

use thiserror::Error;

use crate::quiz::QuizViolation;

/// Failure of a single quiz generation request.
///
/// Every variant is terminal for the request: nothing is retried and no
/// partially valid quiz is ever returned alongside an error.
#[derive(Error, Debug)]
pub enum QuizError {
    #[error("No PDF file provided")]
    MissingInput,
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Upstream service error: {0}")]
    Upstream(AIError),
    #[error("Failed to parse quiz from AI response: {reason}")]
    MalformedResponse { reason: String, raw: String },
    #[error("Invalid quiz structure generated: {}", describe_violations(.0))]
    InvalidQuizStructure(Vec<QuizViolation>),
    #[error("Quiz generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl QuizError {
    /// HTTP status reported by the external service, when the failure came from it.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            QuizError::Upstream(e) => e.status(),
            _ => None,
        }
    }
}

impl From<AIError> for QuizError {
    fn from(err: AIError) -> Self {
        match err {
            AIError::Configuration(msg) => QuizError::Configuration(msg),
            other => QuizError::Upstream(other),
        }
    }
}

fn describe_violations(violations: &[QuizViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum AIError {
    #[error("Gemini API error: {0}")]
    Gemini(#[from] GeminiError),
    #[error("Missing configuration: {0}")]
    Configuration(String),
    #[error("Mock error: {message}")]
    Mock { status: Option<u16>, message: String },
}

impl AIError {
    pub fn status(&self) -> Option<u16> {
        match self {
            AIError::Gemini(e) => e.status(),
            AIError::Mock { status, .. } => *status,
            AIError::Configuration(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed (status {0})")]
    Authentication(u16),
    #[error("No content parts in response")]
    NoContent,
    #[error("Unreadable response body: {0}")]
    Decode(String),
}

impl GeminiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GeminiError::Api { status, .. } => Some(*status),
            GeminiError::RateLimit => Some(429),
            GeminiError::Authentication(status) => Some(*status),
            GeminiError::Http(_) | GeminiError::NoContent | GeminiError::Decode(_) => None,
        }
    }
}
