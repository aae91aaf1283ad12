pub mod config;
pub mod models;

pub use config::*;
pub use models::*;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info, instrument, warn};

use crate::config::KeyFromEnv;
use crate::core::LowLevelClient;
use crate::error::{AIError, GeminiError};
use crate::request::GenerationRequest;

/// Client for the Google Generative Language `generateContent` endpoint.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new(GeminiConfig::default())
    }
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        info!(
            model = %config.model,
            structured_output = config.structured_output,
            has_api_key = config.api_key.is_some(),
            "Creating new Gemini client"
        );
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl LowLevelClient for GeminiClient {
    #[instrument(
        skip(self, request),
        fields(model = %self.config.model, document_len = request.document.len())
    )]
    async fn ask_raw(&self, request: GenerationRequest) -> Result<String, AIError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            error!("No Gemini API key configured");
            AIError::Configuration(format!(
                "no API key for the generative AI service; set {}",
                GeminiConfig::key_names_hint()
            ))
        })?;

        let body = GeminiRequest::new(&request);
        debug!(
            prompt_len = request.prompt.len(),
            schema_guided = request.response_schema.is_some(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request failed");
                GeminiError::Http(e.to_string())
            })?;

        let status = response.status();
        debug!(status = %status, "Received response from Gemini API");

        if status.as_u16() == 429 {
            warn!("Gemini API rate limit exceeded");
            return Err(GeminiError::RateLimit.into());
        }

        if status.as_u16() == 401 || status.as_u16() == 403 {
            error!(status = %status, "Gemini API authentication failed");
            return Err(GeminiError::Authentication(status.as_u16()).into());
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Gemini API error");
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: error_text,
            }
            .into());
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse Gemini response JSON");
            GeminiError::Decode(e.to_string())
        })?;

        debug!(candidates = gemini_response.candidates.len(), "Parsed Gemini response");

        match gemini_response.finish_reason() {
            Some("STOP") | None => {}
            Some(reason) => warn!(finish_reason = reason, "Gemini stopped generating early"),
        }

        let text = gemini_response.into_text().ok_or_else(|| {
            error!("Unexpected API response structure: no content parts");
            GeminiError::NoContent
        })?;

        info!(response_len = text.len(), "Successfully received Gemini response");
        Ok(text)
    }

    fn supports_response_schema(&self) -> bool {
        self.config.structured_output
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}
