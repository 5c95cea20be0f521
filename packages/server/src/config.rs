use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables.
///
/// Provider and spreadsheet credentials are optional: a missing key
/// degrades the corresponding feature (fallback responses, in-memory
/// cache) instead of failing startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub perplexity_api_key: Option<String>,
    pub perplexity_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub sheets_spreadsheet_id: Option<String>,
    pub sheets_api_token: Option<String>,
    pub sheets_tab: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            perplexity_api_key: env::var("PERPLEXITY_API_KEY").ok(),
            perplexity_model: env::var("PERPLEXITY_MODEL")
                .unwrap_or_else(|_| perplexity_client::DEFAULT_MODEL.to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY")
                .ok()
                .or_else(|| env::var("GOOGLE_API_KEY").ok()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| gemini_client::DEFAULT_IMAGE_MODEL.to_string()),
            sheets_spreadsheet_id: env::var("SHEETS_SPREADSHEET_ID").ok(),
            sheets_api_token: env::var("SHEETS_API_TOKEN").ok(),
            sheets_tab: env::var("SHEETS_TAB").unwrap_or_else(|_| "Strains".to_string()),
        })
    }
}
