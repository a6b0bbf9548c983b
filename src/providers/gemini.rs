//! Google Gemini `generateContent` adapter.
//!
//! See: <https://ai.google.dev/api/generate-content>

use serde::{Deserialize, Serialize};

use super::traits::{ProviderAdapter, json_content_type};
use crate::types::{GenerationParams, InlineData, Payload};
use crate::{BifrostError, Result};

/// Default base URL for the Gemini API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Adapter for Gemini models. The API key travels in the query string.
#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    base_url: String,
    model: String,
    params: GenerationParams,
}

impl GeminiAdapter {
    pub fn new(model: impl Into<String>, params: GenerationParams) -> Self {
        Self::with_base_url(model, params, DEFAULT_BASE_URL)
    }

    /// Create an adapter with a custom base URL (for testing with wiremock).
    pub fn with_base_url(
        model: impl Into<String>,
        params: GenerationParams,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            params,
        }
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_endpoint(&self, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        )
    }

    fn build_headers(&self, _api_key: &str) -> Vec<(String, String)> {
        vec![json_content_type()]
    }

    fn build_body(&self, payload: &Payload) -> Result<serde_json::Value> {
        let mut parts = vec![Part::Text {
            text: &payload.prompt,
        }];
        if let Some(data) = &payload.attachment {
            parts.push(Part::InlineData { inline_data: data });
        }

        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                temperature: self.params.temperature,
                top_p: self.params.top_p,
                top_k: self.params.top_k,
                max_output_tokens: self.params.max_output_tokens,
            },
        };
        Ok(serde_json::to_value(&request)?)
    }

    fn parse_response(&self, body: &serde_json::Value) -> Result<String> {
        let response =
            GenerateContentResponse::deserialize(body).map_err(|_| BifrostError::EmptyResponse)?;
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or(BifrostError::EmptyResponse)?;

        let text = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .filter(|t| !t.trim().is_empty())
            .or(candidate.output.filter(|t| !t.trim().is_empty()))
            .ok_or(BifrostError::EmptyResponse)?;

        Ok(text)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: &'a InlineData },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    output: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn adapter() -> GeminiAdapter {
        GeminiAdapter::with_base_url("gemini-test", GenerationParams::default(), "http://x/")
    }

    #[test]
    fn endpoint_carries_model_and_key() {
        assert_eq!(
            adapter().build_endpoint("k123"),
            "http://x/v1beta/models/gemini-test:generateContent?key=k123"
        );
    }

    #[test]
    fn text_body_shape() {
        let body = adapter().build_body(&Payload::text("hi")).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["generationConfig"]["topK"], 30);
        assert!(body["generationConfig"].get("maxOutputTokens").is_none());
        let temp = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temp - 0.6).abs() < 1e-6);
    }

    #[test]
    fn inline_data_body_shape() {
        let payload =
            Payload::with_attachment("describe", InlineData::from_bytes("image/png", b"png"));
        let body = adapter().build_body(&payload).unwrap();
        let part = &body["contents"][0]["parts"][1]["inline_data"];
        assert_eq!(part["mime_type"], "image/png");
        assert_eq!(part["data"], "cG5n");
    }

    #[test]
    fn parses_concatenated_parts() {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": "Hello, "}, {"text": "world"}]}}]
        });
        assert_eq!(adapter().parse_response(&body).unwrap(), "Hello, world");
    }

    #[test]
    fn parses_legacy_output_field() {
        let body = json!({"candidates": [{"output": "legacy"}]});
        assert_eq!(adapter().parse_response(&body).unwrap(), "legacy");
    }

    #[test]
    fn empty_candidates_is_empty_response() {
        for body in [
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": [{"content": {"parts": []}}]}),
            json!({"candidates": [{"content": {"parts": [{"text": "  "}]}}]}),
            json!({"promptFeedback": {"blockReason": "SAFETY"}}),
            json!("not an object"),
        ] {
            assert_eq!(
                adapter().parse_response(&body),
                Err(BifrostError::EmptyResponse)
            );
        }
    }
}
