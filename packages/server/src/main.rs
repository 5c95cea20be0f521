// Main entry point for the strain search API server

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use research::{CompletionProvider, ImageProvider, MemoryStore, SheetsStore, StrainStore};
use server_core::providers::{GeminiImages, SonarProvider};
use server_core::state::AppState;
use server_core::{app::build_app, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,research=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Strain Search API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Pick the cache backend
    let store: Arc<dyn StrainStore> =
        match (&config.sheets_spreadsheet_id, &config.sheets_api_token) {
            (Some(id), Some(token)) => {
                tracing::info!("Using spreadsheet strain cache");
                Arc::new(SheetsStore::new(
                    id.clone(),
                    token.clone(),
                    config.sheets_tab.clone(),
                ))
            }
            _ => {
                tracing::warn!("No spreadsheet configured, strain cache is in-memory only");
                Arc::new(MemoryStore::new())
            }
        };

    if config.perplexity_api_key.is_none() {
        tracing::warn!("PERPLEXITY_API_KEY not set, searches will return fallback responses");
    }
    let provider: Arc<dyn CompletionProvider> = Arc::new(SonarProvider::new(
        config.perplexity_api_key.clone(),
        config.perplexity_model.clone(),
    ));
    let images: Arc<dyn ImageProvider> = Arc::new(GeminiImages::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    ));

    // Build application
    let app = build_app(AppState::new(store, provider, images));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
