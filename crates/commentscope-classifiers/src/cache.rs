//! Bounded LRU cache owned by each detector.
//!
//! Keys are the raw comment text. Inputs are immutable strings, so entries
//! never need invalidation; eviction is purely least-recently-used.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default number of entries per detector cache
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Thread-safe fixed-capacity cache keyed by input text
pub struct DetectionCache<V> {
    entries: Mutex<LruCache<String, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> DetectionCache<V> {
    /// Create a cache holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a cached value, refreshing its recency
    pub fn get(&self, text: &str) -> Option<V> {
        let found = self.entries.lock().get(text).cloned();
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    /// Store a value, evicting the least recently used entry when full
    pub fn insert(&self, text: &str, value: V) {
        self.entries.lock().put(text.to_string(), value);
    }

    /// Return the cached value or compute and store it.
    ///
    /// The lock is not held while `compute` runs; two racing callers may both
    /// compute, and the later insert wins.
    pub fn get_or_insert_with(&self, text: &str, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(text) {
            return value;
        }
        let value = compute();
        self.insert(text, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    /// Snapshot of hit/miss counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len: self.len(),
        }
    }
}

impl<V: Clone> Default for DetectionCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

/// Cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
}
