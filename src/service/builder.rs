//! Builder for configuring translation service instances

use std::collections::HashMap;
use std::sync::Arc;

use super::{TranslationService, TranslationSettings};
use crate::cache::CacheConfig;
use crate::client::{RequestClient, RetryConfig};
use crate::config::Config;
use crate::limiter::RateLimitConfig;
use crate::providers::{ProviderAdapter, ProviderKind, ProviderRegistry};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::GenerationParams;
use crate::Result;

#[derive(Default)]
struct BuiltinProvider {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
}

/// Builder for configuring [`TranslationService`] instances.
pub struct TranslationServiceBuilder {
    active: String,
    builtin: HashMap<ProviderKind, BuiltinProvider>,
    custom: Vec<(Arc<dyn ProviderAdapter>, Option<String>)>,
    generation: GenerationParams,
    text_cache: CacheConfig,
    image_cache: CacheConfig,
    media_cache: CacheConfig,
    rate_limit: RateLimitConfig,
    retry: RetryConfig,
    settings: TranslationSettings,
    transport: Option<Arc<dyn Transport>>,
}

impl Default for TranslationServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationServiceBuilder {
    pub fn new() -> Self {
        Self {
            active: ProviderKind::Gemini.id().to_string(),
            builtin: HashMap::new(),
            custom: Vec::new(),
            generation: GenerationParams::default(),
            text_cache: CacheConfig::default(),
            image_cache: CacheConfig::default().capacity(50),
            media_cache: CacheConfig::default().capacity(50),
            rate_limit: RateLimitConfig::default(),
            retry: RetryConfig::default(),
            settings: TranslationSettings::default(),
            transport: None,
        }
    }

    /// Start from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Self {
        let mut builder = Self::new()
            .provider(config.provider.active.clone())
            .generation(config.generation.clone())
            .text_cache(config.cache.text.clone())
            .image_cache(config.cache.image.clone())
            .media_cache(config.cache.media.clone())
            .rate_limit(config.rate_limit.clone())
            .retry(config.retry.clone())
            .settings(config.translation.clone());

        for kind in ProviderKind::ALL {
            let settings = config.provider.settings(kind);
            let entry = builder.builtin.entry(kind).or_default();
            entry.api_key = settings.api_key.clone();
            entry.model = settings.model.clone();
            entry.base_url = settings.base_url.clone();
        }
        builder
    }

    /// Select the active provider by identifier (e.g. "gemini", "groq").
    pub fn provider(mut self, id: impl Into<String>) -> Self {
        self.active = id.into();
        self
    }

    /// Configure the Gemini API key.
    pub fn gemini(self, api_key: impl Into<String>) -> Self {
        self.api_key(ProviderKind::Gemini, api_key)
    }

    /// Configure the Groq API key.
    pub fn groq(self, api_key: impl Into<String>) -> Self {
        self.api_key(ProviderKind::Groq, api_key)
    }

    /// Set the API key for a built-in provider.
    pub fn api_key(mut self, kind: ProviderKind, api_key: impl Into<String>) -> Self {
        self.builtin.entry(kind).or_default().api_key = Some(api_key.into());
        self
    }

    /// Select the model for a built-in provider.
    pub fn model(mut self, kind: ProviderKind, model: impl Into<String>) -> Self {
        self.builtin.entry(kind).or_default().model = Some(model.into());
        self
    }

    /// Point a built-in provider at a different base URL.
    pub fn base_url(mut self, kind: ProviderKind, url: impl Into<String>) -> Self {
        self.builtin.entry(kind).or_default().base_url = Some(url.into());
        self
    }

    /// Register an additional adapter, replacing any built-in of the same name.
    pub fn adapter(mut self, adapter: Arc<dyn ProviderAdapter>, api_key: Option<String>) -> Self {
        self.custom.push((adapter, api_key));
        self
    }

    /// Set generation parameters for the built-in providers.
    pub fn generation(mut self, params: GenerationParams) -> Self {
        self.generation = params;
        self
    }

    pub fn text_cache(mut self, config: CacheConfig) -> Self {
        self.text_cache = config;
        self
    }

    pub fn image_cache(mut self, config: CacheConfig) -> Self {
        self.image_cache = config;
        self
    }

    pub fn media_cache(mut self, config: CacheConfig) -> Self {
        self.media_cache = config;
        self
    }

    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = config;
        self
    }

    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Set the target language and upload limits.
    pub fn settings(mut self, settings: TranslationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the prompt target language.
    pub fn target_language(mut self, language: impl Into<String>) -> Self {
        self.settings.target_language = language.into();
        self
    }

    /// Use a custom HTTP transport instead of the default `reqwest` one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the service.
    ///
    /// Fails with `ProviderNotFound` if the active provider identifier is
    /// not registered.
    pub fn build(self) -> Result<TranslationService> {
        let mut registry = ProviderRegistry::new();
        for kind in ProviderKind::ALL {
            let builtin = self.builtin.get(&kind);
            let model = builtin
                .and_then(|b| b.model.as_deref())
                .unwrap_or(kind.default_model());
            let base_url = builtin.and_then(|b| b.base_url.as_deref());
            registry.register(
                kind.adapter(model, self.generation.clone(), base_url),
                builtin.and_then(|b| b.api_key.clone()),
            );
        }
        for (adapter, api_key) in self.custom {
            registry.register(adapter, api_key);
        }
        let provider = registry.get(&self.active)?.clone();

        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new()?),
        };

        Ok(TranslationService {
            client: RequestClient::new(transport, &self.rate_limit, self.retry),
            provider,
            settings: self.settings,
            text_cache: self.text_cache.build(),
            image_cache: self.image_cache.build(),
            media_cache: self.media_cache.build(),
        })
    }
}
