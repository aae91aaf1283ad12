//! Quiz request construction: one uploaded document in, one provider-neutral
//! generation request out.

use bytes::Bytes;
use schemars::schema_for;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::QuizError;
use crate::quiz::{Quiz, OPTION_COUNT, QUESTION_COUNT};

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Uploaded document. The media type is trusted as given; the bytes are never inspected.
#[derive(Debug, Clone)]
pub struct Document {
    pub bytes: Bytes,
    pub media_type: String,
    pub file_name: Option<String>,
}

impl Document {
    pub fn pdf(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: PDF_MEDIA_TYPE.to_string(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 8192,
        }
    }
}

/// A single-message request: instructions plus the attached document.
///
/// `response_schema` is set only when the target client supports
/// schema-guided output; otherwise the expected shape lives in `prompt`.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub document: Document,
    pub response_schema: Option<Value>,
    pub generation: GenerationConfig,
}

const INSTRUCTIONS: &str = "Analyze the following PDF document and generate a comprehensive 10-question multiple choice quiz.

Instructions:
- Create exactly 10 questions that test understanding of the key concepts, facts, and details from the document
- Each question should have exactly 4 multiple choice options
- Questions should vary in difficulty and cover different sections of the document
- Make sure only one option is clearly correct for each question
- Include a mix of factual recall, comprehension, and application questions
- Avoid questions that are too obvious or too obscure
- Generate a descriptive title for the quiz based on the document content";

const OUTPUT_CONTRACT: &str = "Produce a quiz object with a `title` string and exactly 10 questions, each with exactly 4 options and a zero-based `correctAnswer` index (0-3) of the correct option.";

const EXAMPLE_SHAPE: &str = r#"{
  "title": "Quiz title based on document content",
  "questions": [
    {
      "question": "Question text here?",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correctAnswer": 0
    }
  ]
}"#;

/// Builds the outbound request for one document.
#[derive(Debug, Clone, Default)]
pub struct QuizRequestBuilder {
    generation: GenerationConfig,
}

impl QuizRequestBuilder {
    pub fn new(generation: GenerationConfig) -> Self {
        Self { generation }
    }

    pub fn generation(&self) -> &GenerationConfig {
        &self.generation
    }

    /// Fails with [`QuizError::MissingInput`] when no document (or an empty one) is supplied.
    pub fn build(
        &self,
        document: Option<Document>,
        schema_guided: bool,
    ) -> Result<GenerationRequest, QuizError> {
        let document = match document {
            Some(doc) if !doc.is_empty() => doc,
            _ => return Err(QuizError::MissingInput),
        };

        let (prompt, response_schema) = if schema_guided {
            (schema_guided_prompt(), Some(response_schema()))
        } else {
            (prompt_with_embedded_shape(), None)
        };

        debug!(
            document_len = document.len(),
            media_type = %document.media_type,
            schema_guided,
            prompt_len = prompt.len(),
            "Built quiz generation request"
        );

        Ok(GenerationRequest {
            prompt,
            document,
            response_schema,
            generation: self.generation.clone(),
        })
    }
}

pub fn schema_guided_prompt() -> String {
    format!("{}\n\n{}", INSTRUCTIONS, OUTPUT_CONTRACT)
}

/// Prompt for clients without native schema support: the exact JSON shape is
/// spelled out and the derived schema is appended.
pub fn prompt_with_embedded_shape() -> String {
    let schema = serde_json::to_string_pretty(&schema_for!(Quiz))
        .unwrap_or_else(|_| "Schema serialization failed".to_string());
    format!(
        "{}\n\nPlease respond with a JSON object in this exact format:\n{}\n\n{}\n\n## Response Format\nThe JSON must match this schema:\n```json\n{}\n```",
        INSTRUCTIONS, EXAMPLE_SHAPE, OUTPUT_CONTRACT, schema
    )
}

/// Response schema declared to providers that support schema-guided output.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "questions": {
                "type": "ARRAY",
                "minItems": QUESTION_COUNT,
                "maxItems": QUESTION_COUNT,
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": {
                            "type": "ARRAY",
                            "minItems": OPTION_COUNT,
                            "maxItems": OPTION_COUNT,
                            "items": { "type": "STRING" }
                        },
                        "correctAnswer": {
                            "type": "INTEGER",
                            "minimum": 0,
                            "maximum": OPTION_COUNT - 1
                        }
                    },
                    "required": ["question", "options", "correctAnswer"],
                    "propertyOrdering": ["question", "options", "correctAnswer"]
                }
            }
        },
        "required": ["title", "questions"],
        "propertyOrdering": ["title", "questions"]
    })
}
