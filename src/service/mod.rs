//! Translation service: per-content-type caching in front of the request client.
//!
//! [`TranslationService`] is constructed once per session and shared by
//! reference (or `Arc`) with every consumer; there is no global instance.
//! It owns three caches, one [`RequestClient`] and the active provider.
//!
//! ```text
//! resolve(request)
//!   ├─ validate input            (UnsupportedContent, no retry)
//!   ├─ derive key ─► cache.get   (hit: return)
//!   └─ miss ─► client.execute ─► cache.set ─► return
//! ```
//!
//! Concurrent requests for the same uncached key are not coalesced: each
//! one goes upstream on its own and is rate limited independently.

mod builder;
mod content;

pub use builder::TranslationServiceBuilder;
pub use content::{ContentRequest, ContentType, TranslationMode, TranslationSettings};

use std::hash::Hash;

use tracing::{debug, instrument};

use crate::cache::{ContentHash, LruCache, TextKey};
use crate::client::RequestClient;
use crate::providers::ProviderEntry;
use crate::telemetry;
use crate::types::{InlineData, Payload};
use crate::{BifrostError, Result};

use content::{validate_binary, validate_text};

/// Cached, rate-limited translation of text, images and audio/video.
pub struct TranslationService {
    client: RequestClient,
    provider: ProviderEntry,
    settings: TranslationSettings,
    text_cache: LruCache<TextKey, String>,
    image_cache: LruCache<ContentHash, String>,
    media_cache: LruCache<ContentHash, String>,
}

impl TranslationService {
    /// Create a new builder for configuring the service.
    pub fn builder() -> TranslationServiceBuilder {
        TranslationServiceBuilder::new()
    }

    /// Translate any supported content.
    pub async fn resolve(&self, request: ContentRequest<'_>) -> Result<String> {
        match request {
            ContentRequest::Text { text, mode } => self.translate_text(text, mode).await,
            ContentRequest::Image { bytes, mime_type } => {
                self.translate_image(bytes, mime_type).await
            }
            ContentRequest::Media { bytes, mime_type } => {
                self.translate_media(bytes, mime_type).await
            }
        }
    }

    /// Translate a text selection.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn translate_text(&self, text: &str, mode: TranslationMode) -> Result<String> {
        validate_text(text)?;
        let key = TextKey::new(text, mode);
        self.cached(&self.text_cache, ContentType::Text, key, || {
            self.settings.text_payload(text, mode)
        })
        .await
    }

    /// Extract and translate the text in an image.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn translate_image(&self, bytes: &[u8], mime_type: &str) -> Result<String> {
        validate_binary(bytes, mime_type, &["image"], self.settings.max_image_bytes)?;
        let data = InlineData::from_bytes(mime_type, bytes);
        let key = ContentHash::of(&data.data);
        self.cached(&self.image_cache, ContentType::Image, key, || {
            self.settings.image_payload(data)
        })
        .await
    }

    /// Transcribe and translate an audio or video clip.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn translate_media(&self, bytes: &[u8], mime_type: &str) -> Result<String> {
        validate_binary(
            bytes,
            mime_type,
            &["audio", "video"],
            self.settings.max_media_bytes,
        )?;
        let data = InlineData::from_bytes(mime_type, bytes);
        let key = ContentHash::of(&data.data);
        self.cached(&self.media_cache, ContentType::Media, key, || {
            self.settings.media_payload(data)
        })
        .await
    }

    async fn cached<K, F>(
        &self,
        cache: &LruCache<K, String>,
        content: ContentType,
        key: K,
        payload: F,
    ) -> Result<String>
    where
        K: Hash + Eq + Clone,
        F: FnOnce() -> Payload,
    {
        if let Some(hit) = cache.get(&key) {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "content" => content.as_str())
                .increment(1);
            debug!(content = content.as_str(), "cache hit");
            return Ok(hit);
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "content" => content.as_str())
            .increment(1);
        debug!(content = content.as_str(), "cache miss");

        let api_key = self.provider.api_key.as_deref().ok_or_else(|| {
            BifrostError::MissingApiKey(self.provider.adapter.name().to_string())
        })?;
        let text = self
            .client
            .execute(self.provider.adapter.as_ref(), &payload(), api_key)
            .await?;
        cache.set(key, text.clone());
        Ok(text)
    }

    /// Drop every cached result of one content type.
    pub fn clear_cache(&self, content: ContentType) {
        match content {
            ContentType::Text => self.text_cache.clear(),
            ContentType::Image => self.image_cache.clear(),
            ContentType::Media => self.media_cache.clear(),
        }
        debug!(content = content.as_str(), "cache cleared");
    }

    /// Drop every cached result.
    pub fn clear_all_caches(&self) {
        for content in ContentType::ALL {
            self.clear_cache(content);
        }
    }

    /// Entries currently held for one content type.
    pub fn cache_len(&self, content: ContentType) -> usize {
        match content {
            ContentType::Text => self.text_cache.len(),
            ContentType::Image => self.image_cache.len(),
            ContentType::Media => self.media_cache.len(),
        }
    }

    /// Name of the active provider.
    pub fn provider_name(&self) -> &str {
        self.provider.adapter.name()
    }

    pub fn settings(&self) -> &TranslationSettings {
        &self.settings
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }
}
