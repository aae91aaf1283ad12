//! Core generation API: a low-level model client plus the request builder and
//! response validator that turn one document into one validated quiz.
//!
//! - `LowLevelClient` is the provider seam: one call in, raw reply text out.
//! - `QuizGenerator::generate` is the whole operation: build, call once, validate.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::error::{AIError, QuizError};
use crate::quiz::Quiz;
use crate::request::{Document, GenerationConfig, GenerationRequest, QuizRequestBuilder};
use crate::response::parse_quiz_reply;

/// Upper bound on one generation, external call included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Low-level model client abstraction.
///
/// Implementors send exactly one request per `ask_raw` call and return the
/// raw reply text. They must not retry, cache or split the request.
#[async_trait]
pub trait LowLevelClient: Send + Sync + Debug {
    async fn ask_raw(&self, request: GenerationRequest) -> Result<String, AIError>;

    /// Whether the provider accepts a response schema for guided generation.
    /// When false the builder embeds the expected JSON shape in the prompt.
    fn supports_response_schema(&self) -> bool {
        false
    }

    /// Clone this client into a boxed trait object
    fn clone_box(&self) -> Box<dyn LowLevelClient>;
}

impl Clone for Box<dyn LowLevelClient> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl LowLevelClient for Box<dyn LowLevelClient> {
    async fn ask_raw(&self, request: GenerationRequest) -> Result<String, AIError> {
        self.as_ref().ask_raw(request).await
    }

    fn supports_response_schema(&self) -> bool {
        self.as_ref().supports_response_schema()
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        self.as_ref().clone_box()
    }
}

/// Turns documents into validated quizzes through a [`LowLevelClient`].
///
/// Holds no per-request state, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct QuizGenerator<C: LowLevelClient> {
    client: C,
    builder: QuizRequestBuilder,
    timeout: Duration,
}

impl<C: LowLevelClient> QuizGenerator<C> {
    pub fn new(client: C) -> Self {
        info!(timeout_secs = DEFAULT_TIMEOUT.as_secs(), "Creating new QuizGenerator");
        Self {
            client,
            builder: QuizRequestBuilder::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_generation_config(mut self, generation: GenerationConfig) -> Self {
        self.builder = QuizRequestBuilder::new(generation);
        self
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Generate a quiz from one document.
    ///
    /// Missing input fails before any external call. Otherwise exactly one
    /// call is made; its reply is accepted only if every structural rule holds.
    #[instrument(
        target = "pdf_quiz::generator",
        skip(self, document),
        fields(document_len = document.as_ref().map(Document::len))
    )]
    pub async fn generate(&self, document: Option<Document>) -> Result<Quiz, QuizError> {
        let request = self
            .builder
            .build(document, self.client.supports_response_schema())?;

        let raw = match tokio::time::timeout(self.timeout, self.client.ask_raw(request)).await {
            Ok(reply) => reply?,
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "Quiz generation timed out");
                return Err(QuizError::Timeout(self.timeout));
            }
        };

        let quiz = parse_quiz_reply(&raw)?;
        info!(title = %quiz.title, questions = quiz.questions.len(), "Quiz generated");
        Ok(quiz)
    }
}
