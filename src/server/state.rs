use std::sync::Arc;
use std::time::Duration;

use crate::clients::flexible::FlexibleClient;
use crate::core::QuizGenerator;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Largest accepted request body; uploads are otherwise not inspected
    pub max_upload_bytes: usize,
    /// Deadline for receiving the upload and generating the quiz
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            request_timeout: crate::core::DEFAULT_TIMEOUT,
        }
    }
}

/// Shared, immutable per-process state. Requests never write to it.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<QuizGenerator<FlexibleClient>>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(generator: QuizGenerator<FlexibleClient>, config: ServerConfig) -> Self {
        Self {
            generator: Arc::new(generator),
            config,
        }
    }
}
