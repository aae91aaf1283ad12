use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::clients::gemini::{GeminiClient, GeminiConfig};
use crate::clients::mock::{MockClient, MockHandle};
use crate::core::LowLevelClient;
use crate::error::AIError;
use crate::request::GenerationRequest;

/// Backend selected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientType {
    #[default]
    Gemini,
    Mock,
}

impl FromStr for ClientType {
    type Err = String;

    /// Parse client type from string (case insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown client type: '{}'. Supported: gemini, mock", s)),
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientType::Gemini => write!(f, "gemini"),
            ClientType::Mock => write!(f, "mock"),
        }
    }
}

/// Cheaply clonable wrapper around any boxed [`LowLevelClient`].
#[derive(Debug, Clone)]
pub struct FlexibleClient {
    inner: Arc<Box<dyn LowLevelClient>>,
}

impl FlexibleClient {
    pub fn new(client: Box<dyn LowLevelClient>) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }

    /// Build the client for `client_type`; the Gemini config is ignored for mocks.
    pub fn from_type(client_type: ClientType, config: GeminiConfig) -> Self {
        match client_type {
            ClientType::Gemini => Self::gemini(config),
            ClientType::Mock => Self::demo(),
        }
    }

    pub fn gemini(config: GeminiConfig) -> Self {
        Self::new(Box::new(GeminiClient::new(config)))
    }

    /// Mock with a handle for scripting replies
    pub fn mock() -> (Self, Arc<MockHandle>) {
        let (client, handle) = MockClient::new();
        (Self::new(Box::new(client)), handle)
    }

    /// Mock that always answers with the demo quiz
    pub fn demo() -> Self {
        let (client, _handle) = MockClient::demo();
        Self::new(Box::new(client))
    }
}

#[async_trait]
impl LowLevelClient for FlexibleClient {
    async fn ask_raw(&self, request: GenerationRequest) -> Result<String, AIError> {
        self.inner.ask_raw(request).await
    }

    fn supports_response_schema(&self) -> bool {
        self.inner.supports_response_schema()
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}
