//! Caching subsystem.
//!
//! One generic [`LruCache`] type, instantiated three times by the
//! [`TranslationService`](crate::TranslationService):
//!
//! - text: keyed on [`TextKey`] (exact text + translation mode)
//! - image: keyed on [`ContentHash`] of the encoded image
//! - media: keyed on [`ContentHash`] of the encoded audio/video
//!
//! Misses are normal control flow; nothing in this module returns errors.
//! Contents are never persisted across restarts.

pub mod key;
pub mod lru;

pub use key::{ContentHash, TextKey};
pub use lru::LruCache;

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Deserialize;

/// Sizing for a single cache instance.
///
/// ```rust
/// # use bifrost::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .capacity(200)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Zero is treated as one. Default: 100.
    pub capacity: usize,
    /// Time-to-live for cached entries. Default: 1 hour.
    #[serde(rename = "ttl_secs", with = "crate::config::secs")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn capacity(mut self, n: usize) -> Self {
        self.capacity = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Build an empty cache with this sizing.
    pub fn build<K, V>(&self) -> LruCache<K, V>
    where
        K: std::hash::Hash + Eq + Clone,
        V: Clone,
    {
        LruCache::new(NonZeroUsize::new(self.capacity).unwrap_or(NonZeroUsize::MIN), self.ttl)
    }
}
