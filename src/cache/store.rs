//! Memory Store Module
//!
//! In-memory reference backend: LRU-bounded storage of serialized values with
//! per-entry expiry.

use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{CacheError, Result};

// == Memory Store ==
/// LRU-bounded key-value store with TTL support.
pub struct MemoryStore {
    /// Key-value storage, most recently used first
    entries: LruCache<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` values (minimum one).
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::new(),
        }
    }

    // == Set ==
    /// Stores a value, replacing any previous one and resetting its TTL.
    ///
    /// When the store is at capacity the least recently used entry is evicted.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - Serialized value
    /// * `ttl_minutes` - Lifetime in minutes, None = never expires
    pub fn set(&mut self, key: String, value: String, ttl_minutes: Option<u64>) -> Result<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidRequest(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        let entry = CacheEntry::new(value, ttl_minutes);
        if let Some((displaced, _)) = self.entries.push(key.clone(), entry) {
            if displaced != key {
                debug!(evicted = %displaced, "LRU eviction");
                self.stats.record_eviction();
            }
        }

        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    // == Get ==
    /// Retrieves a live value by key, marking it most recently used.
    ///
    /// Expired entries are removed and reported as `Expired`.
    pub fn get(&mut self, key: &str) -> Result<String> {
        let expired = match self.entries.peek(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return Err(CacheError::NotFound(key.to_string()));
            }
        };

        if expired {
            self.entries.pop(key);
            self.stats.set_total_entries(self.entries.len());
            self.stats.record_miss();
            return Err(CacheError::Expired(key.to_string()));
        }

        match self.entries.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Ok(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                Err(CacheError::NotFound(key.to_string()))
            }
        }
    }

    // == Delete ==
    pub fn delete(&mut self, key: &str) -> Result<()> {
        match self.entries.pop(key) {
            Some(_) => {
                self.stats.record_forget();
                self.stats.set_total_entries(self.entries.len());
                Ok(())
            }
            None => Err(CacheError::NotFound(key.to_string())),
        }
    }

    // == Contains ==
    /// True if a live entry exists; does not touch LRU order or statistics.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .peek(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.pop(key);
        }

        self.stats.set_total_entries(self.entries.len());
        expired_keys.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
