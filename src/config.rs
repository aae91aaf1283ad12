use std::env;
use std::time::Duration;

use tracing::warn;

use crate::clients::flexible::{ClientType, FlexibleClient};
use crate::clients::gemini::{GeminiConfig, DEFAULT_BASE_URL};
use crate::core::{QuizGenerator, DEFAULT_TIMEOUT};

/// Trait for types that can retrieve their API key from environment variables
pub trait KeyFromEnv {
    /// Environment variable names checked in order; the first non-empty one wins
    const KEY_NAMES: &'static [&'static str];

    /// Find the API key by loading `.env` (if present) and then checking the environment.
    fn find_key() -> Option<String> {
        // Try to load .env file (silently fail if not found)
        let _ = dotenvy::dotenv();

        Self::KEY_NAMES
            .iter()
            .filter_map(|name| env::var(name).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }

    /// Human readable list of the accepted variable names, for error messages.
    fn key_names_hint() -> String {
        Self::KEY_NAMES.join(" or ")
    }
}

/// Generator settings shared by the binaries. Every flag falls back to its
/// environment variable, so `.env` must be loaded before parsing.
#[derive(Debug, Clone, clap::Args)]
pub struct GeneratorArgs {
    /// Backend used to generate quizzes: gemini or mock
    #[arg(long, env = "QUIZ_CLIENT", default_value_t = ClientType::Gemini)]
    pub client: ClientType,

    /// Gemini model identifier
    #[arg(long, env = "QUIZ_MODEL", default_value = "gemini-2.0-flash")]
    pub model: String,

    /// Base URL of the Generative Language API
    #[arg(long, env = "QUIZ_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Ask the API for schema-guided JSON output instead of embedding the shape in the prompt
    #[arg(long, env = "QUIZ_STRUCTURED_OUTPUT", default_value_t = true, action = clap::ArgAction::Set)]
    pub structured_output: bool,

    /// Deadline for one generation, in seconds
    #[arg(long, env = "QUIZ_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,
}

impl GeneratorArgs {
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig::default()
            .with_model(self.model.parse().unwrap_or_default())
            .with_base_url(self.base_url.clone())
            .with_structured_output(self.structured_output)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The API key is resolved here, once at startup; later environment changes are not seen.
    pub fn build_generator(&self) -> QuizGenerator<FlexibleClient> {
        let config = self.gemini_config();
        if self.client == ClientType::Gemini && config.api_key.is_none() {
            warn!(
                "No API key found in {}; quiz generation will fail until one is set",
                GeminiConfig::key_names_hint()
            );
        }
        QuizGenerator::new(FlexibleClient::from_type(self.client, config)).with_timeout(self.timeout())
    }
}
