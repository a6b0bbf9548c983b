//! Per-content-type payload construction and input validation.

use serde::Deserialize;

use crate::types::{InlineData, Payload};
use crate::{BifrostError, Result};

/// How much the model should say about a text translation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TranslationMode {
    /// Translation only.
    #[default]
    Quick,
    /// Translation plus vocabulary and grammar notes.
    Advanced,
}

/// The three independently cached content families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Text,
    Image,
    Media,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [ContentType::Text, ContentType::Image, ContentType::Media];

    /// Label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::Media => "media",
        }
    }
}

/// One translation request from the UI layer.
#[derive(Debug, Clone, Copy)]
pub enum ContentRequest<'a> {
    Text {
        text: &'a str,
        mode: TranslationMode,
    },
    Image {
        bytes: &'a [u8],
        mime_type: &'a str,
    },
    Media {
        bytes: &'a [u8],
        mime_type: &'a str,
    },
}

impl ContentRequest<'_> {
    pub fn content_type(&self) -> ContentType {
        match self {
            ContentRequest::Text { .. } => ContentType::Text,
            ContentRequest::Image { .. } => ContentType::Image,
            ContentRequest::Media { .. } => ContentType::Media,
        }
    }
}

/// Target language and upload limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    /// Language name used in prompts. Default: "Vietnamese".
    pub target_language: String,
    /// Largest accepted image, in raw bytes. Default: 10 MiB.
    pub max_image_bytes: usize,
    /// Largest accepted audio/video file, in raw bytes. Default: 15 MiB.
    pub max_media_bytes: usize,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            target_language: "Vietnamese".to_string(),
            max_image_bytes: 10 * 1024 * 1024,
            max_media_bytes: 15 * 1024 * 1024,
        }
    }
}

impl TranslationSettings {
    pub(crate) fn text_payload(&self, text: &str, mode: TranslationMode) -> Payload {
        let lang = &self.target_language;
        let prompt = match mode {
            TranslationMode::Quick => format!(
                "Translate the following text into {lang}. \
                 Return only the translation, without explanations or notes.\n\n{text}"
            ),
            TranslationMode::Advanced => format!(
                "Translate the following text into {lang}. After the translation, \
                 explain notable vocabulary, idioms and grammar points in {lang}.\n\n\
                 Text:\n{text}"
            ),
        };
        Payload::text(prompt)
    }

    pub(crate) fn image_payload(&self, data: InlineData) -> Payload {
        let prompt = format!(
            "Extract all text visible in this image and translate it into {}. \
             Return only the translation.",
            self.target_language
        );
        Payload::with_attachment(prompt, data)
    }

    pub(crate) fn media_payload(&self, data: InlineData) -> Payload {
        let prompt = format!(
            "Transcribe the speech in this {} file and translate it into {}. \
             Return only the translation.",
            data.kind(),
            self.target_language
        );
        Payload::with_attachment(prompt, data)
    }
}

/// Reject blank text.
pub(crate) fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(BifrostError::UnsupportedContent("text is empty".into()));
    }
    Ok(())
}

/// Check MIME family and size of a binary upload.
pub(crate) fn validate_binary(
    bytes: &[u8],
    mime_type: &str,
    families: &[&str],
    max_bytes: usize,
) -> Result<()> {
    let family = mime_type.split('/').next().unwrap_or_default();
    if !mime_type.contains('/') || !families.contains(&family) {
        return Err(BifrostError::UnsupportedContent(format!(
            "unsupported MIME type '{mime_type}', expected {}",
            families.join(" or ")
        )));
    }
    if bytes.is_empty() {
        return Err(BifrostError::UnsupportedContent("file is empty".into()));
    }
    if bytes.len() > max_bytes {
        return Err(BifrostError::UnsupportedContent(format!(
            "file is {} bytes, limit is {max_bytes}",
            bytes.len()
        )));
    }
    Ok(())
}
