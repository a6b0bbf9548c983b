//! OpenAI-compatible chat completions adapter (Groq).
//!
//! Images are sent as `image_url` parts carrying a `data:` URI. Audio and
//! video attachments have no chat-completions equivalent and are rejected
//! before any request is made.

use serde::{Deserialize, Serialize};

use super::traits::{ProviderAdapter, json_content_type};
use crate::types::{GenerationParams, Payload};
use crate::{BifrostError, Result};

/// Default base URL for the Groq API
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Adapter for OpenAI-style `/chat/completions` endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleAdapter {
    name: String,
    base_url: String,
    model: String,
    params: GenerationParams,
}

impl OpenAiCompatibleAdapter {
    /// Adapter for Groq's hosted endpoint.
    pub fn groq(model: impl Into<String>, params: GenerationParams) -> Self {
        Self::with_base_url("groq", model, params, DEFAULT_BASE_URL)
    }

    /// Create an adapter for any compatible endpoint (also used for testing
    /// with wiremock). `base_url` is the prefix before `/chat/completions`.
    pub fn with_base_url(
        name: impl Into<String>,
        model: impl Into<String>,
        params: GenerationParams,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            params,
        }
    }
}

impl ProviderAdapter for OpenAiCompatibleAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_endpoint(&self, _api_key: &str) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_headers(&self, api_key: &str) -> Vec<(String, String)> {
        vec![
            json_content_type(),
            ("Authorization".to_string(), format!("Bearer {api_key}")),
        ]
    }

    fn build_body(&self, payload: &Payload) -> Result<serde_json::Value> {
        let content = match &payload.attachment {
            None => MessageContent::Text(&payload.prompt),
            Some(data) if data.kind() == "image" => MessageContent::Parts(vec![
                ContentPart::Text {
                    text: &payload.prompt,
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: data.data_uri(),
                    },
                },
            ]),
            Some(data) => {
                return Err(BifrostError::UnsupportedContent(format!(
                    "{} does not accept {} attachments",
                    self.name, data.mime_type
                )));
            }
        };

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
            temperature: self.params.temperature,
            top_p: self.params.top_p,
            max_tokens: self.params.max_output_tokens,
        };
        Ok(serde_json::to_value(&request)?)
    }

    fn parse_response(&self, body: &serde_json::Value) -> Result<String> {
        let response =
            ChatResponse::deserialize(body).map_err(|_| BifrostError::EmptyResponse)?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(BifrostError::EmptyResponse)?;

        choice
            .message
            .and_then(|m| m.content)
            .filter(|t| !t.trim().is_empty())
            .or(choice.text.filter(|t| !t.trim().is_empty()))
            .ok_or(BifrostError::EmptyResponse)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
