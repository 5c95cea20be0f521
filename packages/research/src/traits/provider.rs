//! Provider traits for the completion and image services.
//!
//! Implementations wrap specific vendors (Perplexity, Gemini, etc.) and
//! handle transport details. The core only requires a success/failure
//! signal and, on success, a single text blob or image payload.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;

/// Message role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A one-shot completion request. No retries, no streaming: once issued
/// the call runs to completion or failure.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub messages: Vec<ChatTurn>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Text completion provider.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run a completion and return the response content.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

#[async_trait]
impl<T: CompletionProvider + ?Sized> CompletionProvider for Arc<T> {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.as_ref().complete(request).await
    }
}

/// A generated image: base64-encoded bytes plus mime type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub data: String,
    pub mime: String,
}

/// Image generation provider.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Synthesize an image from the prompt.
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage>;
}

#[async_trait]
impl<T: ImageProvider + ?Sized> ImageProvider for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage> {
        self.as_ref().generate(prompt).await
    }
}
