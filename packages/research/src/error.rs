//! Typed errors for the research library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur during research operations.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Completion provider unavailable or failed (missing credentials,
    /// non-success HTTP status, malformed payload)
    #[error("completion provider error: {0}")]
    Provider(String),

    /// Strain cache store operation failed
    #[error("strain cache error: {0}")]
    Cache(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// No strain name could be recovered from the response text
    #[error("no strain name found in response text")]
    Unparseable,

    /// Image provider unavailable or failed
    #[error("image provider error: {0}")]
    Image(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl ResearchError {
    /// Wrap an arbitrary error as a cache failure.
    pub fn cache(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Cache(Box::new(err))
    }

    /// Wrap a message as a cache failure.
    pub fn cache_msg(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into().into())
    }
}

/// Result type alias for research operations.
pub type Result<T> = std::result::Result<T, ResearchError>;
