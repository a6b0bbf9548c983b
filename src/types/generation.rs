//! Generation parameters shared by every provider.

use serde::{Deserialize, Serialize};

/// Sampling parameters forwarded to the provider on every request.
///
/// Providers that have no equivalent for a parameter (e.g. `top_k` on
/// OpenAI-compatible endpoints) omit it from the wire body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.6,
            top_p: 0.8,
            top_k: 30,
            max_output_tokens: None,
        }
    }
}

impl GenerationParams {
    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = temp;
        self
    }

    pub fn top_p(mut self, p: f32) -> Self {
        self.top_p = p;
        self
    }

    pub fn top_k(mut self, k: u32) -> Self {
        self.top_k = k;
        self
    }

    pub fn max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }
}
