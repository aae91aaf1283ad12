use std::fmt;

use crate::config::KeyFromEnv;

use super::models::GeminiModel;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Clone)]
pub struct GeminiConfig {
    /// Read from the environment by `Default`; checked at call time, not at construction.
    pub api_key: Option<String>,
    pub model: GeminiModel,
    pub base_url: String,
    /// Use `responseSchema` guided output instead of a prompt-embedded JSON shape.
    pub structured_output: bool,
}

impl KeyFromEnv for GeminiConfig {
    const KEY_NAMES: &'static [&'static str] = &[
        "GEMINI_API_KEY",
        "GOOGLE_GENERATIVE_AI_API_KEY",
        "GOOGLE_API_KEY",
    ];
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: Self::find_key(),
            model: GeminiModel::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            structured_output: true,
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("structured_output", &self.structured_output)
            .finish()
    }
}

impl GeminiConfig {
    #[must_use]
    pub fn new(api_key: Option<String>, model: GeminiModel) -> Self {
        Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            structured_output: true,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_structured_output(mut self, enabled: bool) -> Self {
        self.structured_output = enabled;
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model.id()
        )
    }
}
