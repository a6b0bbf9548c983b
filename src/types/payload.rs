//! Request payloads handed to provider adapters.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

/// Binary attachment sent inline with a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    /// Base64 (standard alphabet, padded) encoding of the raw bytes.
    pub data: String,
}

impl InlineData {
    /// Encode raw bytes.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Top-level MIME type, e.g. `image` for `image/png`.
    pub fn kind(&self) -> &str {
        self.mime_type
            .split('/')
            .next()
            .unwrap_or_default()
    }

    /// `data:` URI form used by OpenAI-style vision inputs.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// A prompt, optionally with one inline attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub prompt: String,
    pub attachment: Option<InlineData>,
}

impl Payload {
    /// Text-only payload.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            attachment: None,
        }
    }

    /// Prompt plus an inline binary attachment.
    pub fn with_attachment(prompt: impl Into<String>, attachment: InlineData) -> Self {
        Self {
            prompt: prompt.into(),
            attachment: Some(attachment),
        }
    }
}
