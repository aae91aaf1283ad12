use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::{core::LowLevelClient, error::AIError, request::GenerationRequest};

/// JSON text of a valid quiz used by [`MockClient::demo`].
pub fn demo_quiz_json() -> String {
    let questions: Vec<_> = (1..=10)
        .map(|n: i64| {
            let correct = ((n - 1) % 4) as usize;
            let mut options = vec![
                (2 * n + 1).to_string(),
                (2 * n - 1).to_string(),
                (n * n + 5).to_string(),
            ];
            options.insert(correct, (2 * n).to_string());
            json!({
                "question": format!("Demo question {}: what is {} + {}?", n, n, n),
                "options": options,
                "correctAnswer": correct,
            })
        })
        .collect();
    json!({ "title": "Demo Arithmetic Quiz", "questions": questions }).to_string()
}

/// Scripted reply for one call.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    /// Upstream failure with the given HTTP status
    Status { status: u16, message: String },
    /// Wait before producing the inner reply
    Delay(Duration, Box<MockResponse>),
}

impl MockResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn delayed(self, delay: Duration) -> Self {
        Self::Delay(delay, Box::new(self))
    }
}

/// Shared control side of a [`MockClient`]: queue replies, inspect calls.
#[derive(Debug, Default)]
pub struct MockHandle {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<GenerationRequest>>,
    fallback: Mutex<Option<MockResponse>>,
    calls: AtomicUsize,
}

impl MockHandle {
    pub fn push(&self, response: MockResponse) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.push(MockResponse::text(text));
    }

    /// Reply used whenever the queue is empty.
    pub fn set_fallback(&self, response: MockResponse) {
        *self.fallback.lock().unwrap_or_else(PoisonError::into_inner) = Some(response);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.requests().pop()
    }

    fn next_response(&self) -> Option<MockResponse> {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .or_else(|| {
                self.fallback
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone()
            })
    }
}

/// Mock client for testing and offline demos. Replies are taken from the
/// handle's queue in order, then from the fallback; with neither the call
/// fails as an upstream error.
#[derive(Debug, Clone)]
pub struct MockClient {
    handle: Arc<MockHandle>,
    schema_guided: bool,
}

impl MockClient {
    pub fn new() -> (Self, Arc<MockHandle>) {
        Self::with_responses(Vec::new())
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let handle = Arc::new(MockHandle::default());
        for response in responses {
            handle.push(response);
        }
        let client = Self {
            handle: handle.clone(),
            schema_guided: true,
        };
        (client, handle)
    }

    /// Client that answers every call with the same ten-question demo quiz.
    pub fn demo() -> (Self, Arc<MockHandle>) {
        let (client, handle) = Self::new();
        handle.set_fallback(MockResponse::Text(demo_quiz_json()));
        (client, handle)
    }

    /// Behave like a provider without native schema support.
    pub fn without_schema_support(mut self) -> Self {
        self.schema_guided = false;
        self
    }
}

#[async_trait]
impl LowLevelClient for MockClient {
    async fn ask_raw(&self, request: GenerationRequest) -> Result<String, AIError> {
        let call = self.handle.calls.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(call, document_len = request.document.len(), "Mock client called");
        self.handle
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let mut response = self.handle.next_response().ok_or_else(|| AIError::Mock {
            status: None,
            message: "no scripted response left".to_string(),
        })?;

        loop {
            match response {
                MockResponse::Delay(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    response = *inner;
                }
                MockResponse::Text(text) => return Ok(text),
                MockResponse::Status { status, message } => {
                    return Err(AIError::Mock {
                        status: Some(status),
                        message,
                    })
                }
            }
        }
    }

    fn supports_response_schema(&self) -> bool {
        self.schema_guided
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}
