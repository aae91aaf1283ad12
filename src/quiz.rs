//! Quiz data model and its structural rules.
//!
//! A quiz always has exactly [`QUESTION_COUNT`] questions, each with exactly
//! [`OPTION_COUNT`] options and a zero-based `correctAnswer` pointing at one of
//! them. Values coming from the model are checked as raw JSON first so that
//! every broken rule can be reported, then converted into the typed form.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const QUESTION_COUNT: usize = 10;
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Quiz", description = "A multiple choice quiz generated from a document")]
pub struct Quiz {
    /// Descriptive title based on the document content
    pub title: String,
    /// Exactly ten questions
    #[schemars(length(min = 10, max = 10))]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Question text
    pub question: String,
    /// Exactly four answer options
    #[schemars(length(min = 4, max = 4))]
    pub options: Vec<String>,
    /// Zero-based index of the correct option
    #[schemars(range(min = 0, max = 3))]
    pub correct_answer: i64,
}

impl Question {
    pub fn correct_option(&self) -> Option<&str> {
        usize::try_from(self.correct_answer)
            .ok()
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }

    pub fn is_correct(&self, option: usize) -> bool {
        i64::try_from(option).map_or(false, |o| o == self.correct_answer)
    }
}

/// One broken structural rule. Question indexes are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizViolation {
    NotAnObject,
    MissingTitle,
    MissingQuestions,
    WrongQuestionCount { found: usize },
    QuestionNotAnObject { index: usize },
    MissingQuestionText { index: usize },
    MissingOptions { index: usize },
    WrongOptionCount { index: usize, found: usize },
    OptionNotText { index: usize, option: usize },
    AnswerNotInteger { index: usize },
    AnswerOutOfRange { index: usize, value: i64 },
    Shape(String),
}

impl fmt::Display for QuizViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizViolation::NotAnObject => write!(f, "quiz is not a JSON object"),
            QuizViolation::MissingTitle => write!(f, "title is missing or empty"),
            QuizViolation::MissingQuestions => write!(f, "questions array is missing"),
            QuizViolation::WrongQuestionCount { found } => {
                write!(f, "expected {} questions, found {}", QUESTION_COUNT, found)
            }
            QuizViolation::QuestionNotAnObject { index } => {
                write!(f, "question {} is not an object", index + 1)
            }
            QuizViolation::MissingQuestionText { index } => {
                write!(f, "question {} has no question text", index + 1)
            }
            QuizViolation::MissingOptions { index } => {
                write!(f, "question {} has no options array", index + 1)
            }
            QuizViolation::WrongOptionCount { index, found } => write!(
                f,
                "question {} has {} options, expected {}",
                index + 1,
                found,
                OPTION_COUNT
            ),
            QuizViolation::OptionNotText { index, option } => {
                write!(f, "question {} option {} is not a string", index + 1, option + 1)
            }
            QuizViolation::AnswerNotInteger { index } => {
                write!(f, "question {} correctAnswer is not an integer", index + 1)
            }
            QuizViolation::AnswerOutOfRange { index, value } => write!(
                f,
                "question {} correctAnswer {} is outside 0..={}",
                index + 1,
                value,
                OPTION_COUNT - 1
            ),
            QuizViolation::Shape(msg) => write!(f, "{}", msg),
        }
    }
}

impl Quiz {
    /// Check every structural rule against a raw JSON value and build the quiz
    /// only when all of them hold. The value is not normalized or reordered.
    pub fn from_value(value: Value) -> Result<Quiz, Vec<QuizViolation>> {
        let violations = collect_violations(&value);
        if !violations.is_empty() {
            return Err(violations);
        }
        serde_json::from_value(value).map_err(|e| vec![QuizViolation::Shape(e.to_string())])
    }
}

fn collect_violations(value: &Value) -> Vec<QuizViolation> {
    let mut out = Vec::new();
    let Some(obj) = value.as_object() else {
        out.push(QuizViolation::NotAnObject);
        return out;
    };

    match obj.get("title").and_then(Value::as_str) {
        Some(title) if !title.is_empty() => {}
        _ => out.push(QuizViolation::MissingTitle),
    }

    let Some(questions) = obj.get("questions").and_then(Value::as_array) else {
        out.push(QuizViolation::MissingQuestions);
        return out;
    };
    if questions.len() != QUESTION_COUNT {
        out.push(QuizViolation::WrongQuestionCount { found: questions.len() });
    }

    for (index, question) in questions.iter().enumerate() {
        check_question(index, question, &mut out);
    }
    out
}

fn check_question(index: usize, value: &Value, out: &mut Vec<QuizViolation>) {
    let Some(q) = value.as_object() else {
        out.push(QuizViolation::QuestionNotAnObject { index });
        return;
    };

    match q.get("question").and_then(Value::as_str) {
        Some(text) if !text.is_empty() => {}
        _ => out.push(QuizViolation::MissingQuestionText { index }),
    }

    match q.get("options").and_then(Value::as_array) {
        None => out.push(QuizViolation::MissingOptions { index }),
        Some(options) => {
            if options.len() != OPTION_COUNT {
                out.push(QuizViolation::WrongOptionCount { index, found: options.len() });
            }
            for (option, v) in options.iter().enumerate() {
                if !v.is_string() {
                    out.push(QuizViolation::OptionNotText { index, option });
                }
            }
        }
    }

    match q.get("correctAnswer").and_then(Value::as_i64) {
        None => out.push(QuizViolation::AnswerNotInteger { index }),
        Some(value) if value < 0 || value >= OPTION_COUNT as i64 => {
            out.push(QuizViolation::AnswerOutOfRange { index, value })
        }
        Some(_) => {}
    }
}
