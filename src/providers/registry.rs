//! Provider lookup by identifier.
//!
//! The active provider is chosen by a string identifier from configuration.
//! [`ProviderRegistry`] maps identifiers to adapters and their API keys;
//! asking for an identifier that was never registered yields
//! `ProviderNotFound`, which is never retried.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::gemini::{self, GeminiAdapter};
use super::openai_compat::{self, OpenAiCompatibleAdapter};
use super::traits::ProviderAdapter;
use crate::types::GenerationParams;
use crate::{BifrostError, Result};

/// Built-in backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Gemini,
    Groq,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Gemini, ProviderKind::Groq];

    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Groq => "groq",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gemini => gemini::DEFAULT_MODEL,
            ProviderKind::Groq => openai_compat::DEFAULT_MODEL,
        }
    }

    /// Environment variable consulted for this provider's API key.
    pub fn api_key_env(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Groq => "GROQ_API_KEY",
        }
    }

    /// Build the adapter for this backend, optionally against a non-default
    /// base URL (proxies, test servers).
    pub fn adapter(
        self,
        model: &str,
        params: GenerationParams,
        base_url: Option<&str>,
    ) -> Arc<dyn ProviderAdapter> {
        match (self, base_url) {
            (ProviderKind::Gemini, None) => Arc::new(GeminiAdapter::new(model, params)),
            (ProviderKind::Gemini, Some(url)) => {
                Arc::new(GeminiAdapter::with_base_url(model, params, url))
            }
            (ProviderKind::Groq, None) => Arc::new(OpenAiCompatibleAdapter::groq(model, params)),
            (ProviderKind::Groq, Some(url)) => Arc::new(OpenAiCompatibleAdapter::with_base_url(
                self.id(),
                model,
                params,
                url,
            )),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = BifrostError;

    fn from_str(s: &str) -> Result<Self> {
        ProviderKind::ALL
            .into_iter()
            .find(|k| k.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BifrostError::ProviderNotFound(s.to_string()))
    }
}

/// A registered adapter and the key used to authenticate with it.
#[derive(Clone)]
pub struct ProviderEntry {
    pub adapter: Arc<dyn ProviderAdapter>,
    pub api_key: Option<String>,
}

/// Adapters keyed by provider identifier.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, ProviderEntry>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an adapter under its own name.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>, api_key: Option<String>) {
        self.providers.insert(
            adapter.name().to_ascii_lowercase(),
            ProviderEntry { adapter, api_key },
        );
    }

    /// Look up a provider by identifier (case-insensitive).
    pub fn get(&self, id: &str) -> Result<&ProviderEntry> {
        self.providers
            .get(&id.trim().to_ascii_lowercase())
            .ok_or_else(|| BifrostError::ProviderNotFound(id.to_string()))
    }

    /// Identifiers of every registered provider, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
