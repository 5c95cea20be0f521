//! Gemini generateContent request and response types.

use serde::{Deserialize, Serialize};

/// Default image-capable model.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";

/// generateContent request body.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Build a single-turn text request.
    pub fn from_text(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.into()),
                    inline_data: None,
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One content part: text, or inline binary data for images.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

/// Base64-encoded binary payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: Option<String>,
    pub data: String,
}

/// generateContent response body.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

/// A generated image extracted from a response.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    /// Base64 image bytes (no data: prefix)
    pub data: String,
    /// Mime type, defaulting to image/png when the API omits it
    pub mime: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_builds_a_single_part() {
        let request = GenerateContentRequest::from_text("a cannabis bud");
        assert_eq!(request.contents.len(), 1);
        assert_eq!(
            request.contents[0].parts[0].text.as_deref(),
            Some("a cannabis bud")
        );
    }

    #[test]
    fn test_inline_data_uses_camel_case() {
        let json = r#"{"inlineData": {"mimeType": "image/png", "data": "aGVsbG8="}}"#;
        let part: Part = serde_json::from_str(json).unwrap();
        let inline = part.inline_data.unwrap();
        assert_eq!(inline.mime_type.as_deref(), Some("image/png"));
        assert_eq!(inline.data, "aGVsbG8=");
    }
}
