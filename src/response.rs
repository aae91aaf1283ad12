//! Quiz response validation: raw model reply in, validated [`Quiz`] out.
//!
//! Schema-guided replies are a bare JSON object; free-text replies carry the
//! object somewhere in prose or a code fence. Both go through the same
//! structural checks, so callers never see which path produced the quiz.

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::QuizError;
use crate::json_utils::extract_first_object;
use crate::quiz::Quiz;

#[instrument(target = "pdf_quiz::response", skip(raw), fields(raw_len = raw.len()))]
pub fn parse_quiz_reply(raw: &str) -> Result<Quiz, QuizError> {
    let value = locate_quiz_object(raw)?;

    Quiz::from_value(value).map_err(|violations| {
        warn!(
            target: "pdf_quiz::response",
            count = violations.len(),
            first = %violations.first().map(ToString::to_string).unwrap_or_default(),
            "Invalid quiz structure generated"
        );
        QuizError::InvalidQuizStructure(violations)
    })
}

/// The whole reply when it is a JSON object, else the first embedded object.
pub fn locate_quiz_object(raw: &str) -> Result<Value, QuizError> {
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(raw.trim()) {
        debug!(target: "pdf_quiz::response", "Reply is a bare JSON object");
        return Ok(value);
    }

    match extract_first_object(raw) {
        Some(value) => {
            debug!(target: "pdf_quiz::response", "Extracted JSON object embedded in text");
            Ok(value)
        }
        None => {
            let reason = if raw.contains('{') {
                "no embedded JSON object could be parsed"
            } else {
                "no JSON object found in response"
            };
            warn!(target: "pdf_quiz::response", raw = %raw, reason, "Failed to parse JSON from response");
            Err(QuizError::MalformedResponse {
                reason: reason.to_string(),
                raw: raw.to_string(),
            })
        }
    }
}
