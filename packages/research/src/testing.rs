//! Testing utilities: mock provider and failing store.
//!
//! Useful for testing orchestration logic without real provider or
//! spreadsheet calls.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{ResearchError, Result};
use crate::record::StrainRecord;
use crate::traits::provider::{CompletionProvider, CompletionRequest, GeneratedImage, ImageProvider};
use crate::traits::store::{CacheHit, RowLocator, StrainStore};

/// Scripted completion provider.
///
/// Responses are consumed in order; an exhausted script fails like an
/// unavailable provider. Every request is recorded for assertions.
#[derive(Default)]
pub struct MockProvider {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.script.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queue a provider failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.script.lock().unwrap().push_back(Err(message.into()));
        self
    }

    /// All requests made so far.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request);
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ResearchError::Provider(message)),
            None => Err(ResearchError::Provider("mock script exhausted".into())),
        }
    }
}

/// Image provider returning a fixed payload, or failing when empty.
#[derive(Default)]
pub struct MockImageProvider {
    image: Option<GeneratedImage>,
}

impl MockImageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, data: impl Into<String>, mime: impl Into<String>) -> Self {
        self.image = Some(GeneratedImage {
            data: data.into(),
            mime: mime.into(),
        });
        self
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate(&self, _prompt: &str) -> Result<GeneratedImage> {
        self.image
            .clone()
            .ok_or_else(|| ResearchError::Image("no scripted image".into()))
    }
}

/// Store whose every operation fails, for exercising the forced-miss and
/// swallowed-write paths.
#[derive(Default)]
pub struct FailingStore;

impl FailingStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StrainStore for FailingStore {
    async fn find_by_query(&self, _query: &str) -> Result<Option<CacheHit>> {
        Err(ResearchError::cache_msg("store unreachable"))
    }

    async fn insert(&self, _record: &StrainRecord) -> Result<()> {
        Err(ResearchError::cache_msg("store unreachable"))
    }

    async fn update(&self, _locator: RowLocator, _record: &StrainRecord) -> Result<()> {
        Err(ResearchError::cache_msg("store unreachable"))
    }
}
