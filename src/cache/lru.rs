//! Bounded LRU cache with lazy time-to-live expiry.
//!
//! Recency order and eviction come from [`lru::LruCache`]; each value is
//! stored alongside the instant it was written.
//!
//! Expiry is lazy: an entry older than the TTL is treated as absent and
//! removed when it is read, never swept in the background. Reads do not
//! renew an entry's age; only overwriting it with [`LruCache::set`] does.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Thread-safe LRU cache with a fixed capacity and per-entry TTL.
///
/// ```rust
/// # use bifrost::cache::LruCache;
/// # use std::num::NonZeroUsize;
/// # use std::time::Duration;
/// let cache = LruCache::new(NonZeroUsize::new(2).unwrap(), Duration::from_secs(60));
/// cache.set("a", 1);
/// cache.set("b", 2);
/// assert_eq!(cache.get(&"a"), Some(1));
/// cache.set("c", 3); // evicts "b", the least recently used
/// assert_eq!(cache.get(&"b"), None);
/// ```
pub struct LruCache<K, V> {
    inner: Mutex<lru::LruCache<K, Entry<V>>>,
    ttl: Duration,
}

impl<K: Hash + Eq + Clone, V: Clone> LruCache<K, V> {
    /// Create an empty cache.
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(lru::LruCache::new(capacity)),
            ttl,
        }
    }

    // Every mutation completes under the lock, so a poisoned lock still
    // guards a consistent cache.
    fn lock(&self) -> MutexGuard<'_, lru::LruCache<K, Entry<V>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a value, marking it most recently used.
    ///
    /// Returns `None` on miss. An entry older than the TTL is removed and
    /// reported as a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.lock();
        let entry = inner.get(key)?;
        if entry.stored_at.elapsed() <= self.ttl {
            return Some(entry.value.clone());
        }
        inner.pop(key);
        None
    }

    /// Insert or overwrite a value, marking it most recently used.
    ///
    /// Overwriting resets the entry's age. Inserting a new key into a full
    /// cache evicts exactly one entry, the least recently used.
    pub fn set(&self, key: K, value: V) {
        let entry = Entry {
            value,
            stored_at: Instant::now(),
        };
        self.lock().put(key, entry);
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of physically present entries, including expired ones not
    /// yet observed by a read.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    /// Maximum entry age.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.lock().iter().rev().map(|(k, _)| k.clone()).collect()
    }
}
