//! Minimal Gemini REST API client.
//!
//! A single-purpose client for the `generateContent` endpoint, used to
//! synthesize images with image-capable models. The first inline-data
//! part of the response is returned as base64 bytes plus mime type.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemini_client::GeminiClient;
//!
//! let client = GeminiClient::from_env()?;
//! let image = client.generate_image(gemini_client::DEFAULT_IMAGE_MODEL, prompt).await?;
//! println!("{} bytes of {}", image.data.len(), image.mime);
//! ```

pub mod error;
pub mod types;

pub use error::{GeminiError, Result};
pub use types::{GeneratedImage, DEFAULT_IMAGE_MODEL};

use tracing::{debug, warn};
use types::{GenerateContentRequest, GenerateContentResponse};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Create from `GEMINI_API_KEY`, falling back to `GOOGLE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| GeminiError::Config("GEMINI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for proxies and tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Generate an image from a text prompt.
    ///
    /// Returns the first inline-data part of the response. A response
    /// carrying only text (e.g. safety guidance) is surfaced as an API
    /// error with that text as the message.
    pub async fn generate_image(&self, model: &str, prompt: &str) -> Result<GeneratedImage> {
        let request = GenerateContentRequest::from_text(prompt);
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini request failed");
                GeminiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Gemini API error");
            return Err(GeminiError::Api(format!("Gemini API error: {}", error_text)));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        let parts = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        if let Some(inline) = parts.iter().find_map(|p| p.inline_data.clone()) {
            debug!(model = %model, "Gemini returned inline image data");
            return Ok(GeneratedImage {
                data: inline.data,
                mime: inline.mime_type.unwrap_or_else(|| "image/png".to_string()),
            });
        }

        // Text-only response: surface the model's message
        let text = parts
            .iter()
            .find_map(|p| p.text.clone())
            .unwrap_or_else(|| "No image data returned".to_string());
        Err(GeminiError::Api(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = GeminiClient::new("test-key").with_base_url("https://custom.api.com");
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url, "https://custom.api.com");
    }
}
