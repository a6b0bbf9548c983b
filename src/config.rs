//! Configuration loading.
//!
//! Configuration is loaded from TOML with the following resolution order:
//! 1. `--config <path>` (explicit path; must exist)
//! 2. `~/.bifrost/config.toml` (user)
//! 3. built-in defaults
//!
//! API keys not present in the file fall back to the provider's environment
//! variable (`GEMINI_API_KEY`, `GROQ_API_KEY`).
//!
//! ```toml
//! [provider]
//! active = "gemini"
//!
//! [provider.gemini]
//! api_key = "..."
//! model = "gemini-2.0-flash"
//!
//! [generation]
//! temperature = 0.6
//! top_p = 0.8
//! top_k = 30
//!
//! [cache.text]
//! capacity = 100
//! ttl_secs = 3600
//!
//! [rate_limit]
//! limit = 5
//! window_secs = 10
//!
//! [retry]
//! max_retries = 3
//! retry_delay_ms = 1000
//!
//! [translation]
//! target_language = "Vietnamese"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cache::CacheConfig;
use crate::client::RetryConfig;
use crate::limiter::RateLimitConfig;
use crate::providers::ProviderKind;
use crate::service::TranslationSettings;
use crate::types::GenerationParams;
use crate::{BifrostError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProvidersConfig,
    pub generation: GenerationParams,
    pub cache: CachesConfig,
    pub rate_limit: RateLimitConfig,
    pub retry: RetryConfig,
    pub translation: TranslationSettings,
}

/// Active provider and per-provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Provider identifier (default: "gemini").
    pub active: String,
    pub gemini: ProviderSettings,
    pub groq: ProviderSettings,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            active: ProviderKind::Gemini.id().to_string(),
            gemini: ProviderSettings::default(),
            groq: ProviderSettings::default(),
        }
    }
}

impl ProvidersConfig {
    pub fn settings(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::Groq => &self.groq,
        }
    }

    fn settings_mut(&mut self, kind: ProviderKind) -> &mut ProviderSettings {
        match kind {
            ProviderKind::Gemini => &mut self.gemini,
            ProviderKind::Groq => &mut self.groq,
        }
    }
}

/// Settings for one provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    /// Model identifier; the provider default is used when absent.
    pub model: Option<String>,
    /// Base URL override (proxies, testing).
    pub base_url: Option<String>,
}

/// Sizing for the three caches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CachesConfig {
    pub text: CacheConfig,
    pub image: CacheConfig,
    pub media: CacheConfig,
}

impl Default for CachesConfig {
    fn default() -> Self {
        Self {
            text: CacheConfig::default(),
            image: CacheConfig::default().capacity(50),
            media: CacheConfig::default().capacity(50),
        }
    }
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.bifrost/config.toml`
    /// 3. Defaults
    ///
    /// Environment variables fill in any API key the file leaves unset.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| BifrostError::Configuration(format!("Failed to parse config: {e}")))
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BifrostError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            BifrostError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path, or `None` to use defaults.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(BifrostError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".bifrost").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        Ok(None)
    }

    /// Fill unset API keys from the environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for kind in ProviderKind::ALL {
            let settings = self.provider.settings_mut(kind);
            if settings.api_key.is_none() {
                settings.api_key = lookup(kind.api_key_env()).filter(|k| !k.trim().is_empty());
            }
        }
    }
}

/// Serde helper: durations as whole seconds.
pub(crate) mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

/// Serde helper: durations as whole milliseconds.
pub(crate) mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
