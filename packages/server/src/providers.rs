//! Adapters binding the provider clients to the research traits.
//!
//! Missing credentials surface as provider errors, which the
//! orchestrator degrades to its fallback paths; the server never refuses
//! to start over an absent key.

use async_trait::async_trait;

use gemini_client::GeminiClient;
use perplexity_client::{ChatRequest, Message, PerplexityClient};
use research::{
    CompletionProvider, CompletionRequest, GeneratedImage, ImageProvider, ResearchError, Role,
};

/// Completion provider over the Perplexity chat completions API.
pub struct SonarProvider {
    client: Option<PerplexityClient>,
    model: String,
}

impl SonarProvider {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: api_key.map(PerplexityClient::new),
            model: model.into(),
        }
    }
}

#[async_trait]
impl CompletionProvider for SonarProvider {
    async fn complete(&self, request: CompletionRequest) -> research::Result<String> {
        let Some(client) = &self.client else {
            return Err(ResearchError::Provider(
                "PERPLEXITY_API_KEY is not configured".into(),
            ));
        };

        let mut chat = ChatRequest::new(&self.model)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .top_p(0.9)
            .message(Message::system(request.system_prompt));
        for turn in request.messages {
            chat = chat.message(match turn.role {
                Role::System => Message::system(turn.content),
                Role::User => Message::user(turn.content),
                Role::Assistant => Message::assistant(turn.content),
            });
        }

        let response = client
            .chat_completion(chat)
            .await
            .map_err(|e| ResearchError::Provider(e.to_string()))?;
        Ok(response.content)
    }
}

/// Image provider over the Gemini generateContent API.
pub struct GeminiImages {
    client: Option<GeminiClient>,
    model: String,
}

impl GeminiImages {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: api_key.map(GeminiClient::new),
            model: model.into(),
        }
    }
}

#[async_trait]
impl ImageProvider for GeminiImages {
    async fn generate(&self, prompt: &str) -> research::Result<GeneratedImage> {
        let Some(client) = &self.client else {
            return Err(ResearchError::Image("GEMINI_API_KEY is not configured".into()));
        };

        let image = client
            .generate_image(&self.model, prompt)
            .await
            .map_err(|e| ResearchError::Image(e.to_string()))?;
        Ok(GeneratedImage {
            data: image.data,
            mime: image.mime,
        })
    }
}
