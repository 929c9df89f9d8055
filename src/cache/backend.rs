//! Cache store interface consumed by the query cache.
//!
//! Values cross this boundary as serialized JSON text so any key-value
//! backend can hold them.

use std::future::Future;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::MemoryStore;
use crate::error::{CacheError, Result};

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Live value for `key`, or None when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` for `ttl_minutes`.
    async fn put(&self, key: &str, value: String, ttl_minutes: u64) -> Result<()>;

    /// Removes `key`. Forgetting an absent key is not an error.
    async fn forget(&self, key: &str) -> Result<()>;

    /// Read-through: returns the cached value, or runs `compute`, stores its
    /// output and returns it.
    ///
    /// The default is a plain get-then-put. It is not atomic: concurrent misses
    /// on the same key each run `compute` and the last write wins.
    async fn remember<F, Fut>(&self, key: &str, ttl_minutes: u64, compute: F) -> Result<String>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<String>> + Send,
    {
        if let Some(value) = self.get(key).await? {
            return Ok(value);
        }

        let value = compute().await?;
        self.put(key, value.clone(), ttl_minutes).await?;
        Ok(value)
    }
}

#[async_trait]
impl CacheStore for RwLock<MemoryStore> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        // Write lock: lookups update LRU order and statistics
        let mut store = self.write().await;
        match store.get(key) {
            Ok(value) => Ok(Some(value)),
            Err(CacheError::NotFound(_)) | Err(CacheError::Expired(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn put(&self, key: &str, value: String, ttl_minutes: u64) -> Result<()> {
        self.write().await.set(key.to_string(), value, Some(ttl_minutes))
    }

    async fn forget(&self, key: &str) -> Result<()> {
        match self.write().await.delete(key) {
            Ok(()) | Err(CacheError::NotFound(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store() -> RwLock<MemoryStore> {
        RwLock::new(MemoryStore::new(16))
    }

    #[tokio::test]
    async fn test_get_absent_is_none() {
        let cache = store();
        assert_eq!(cache.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = store();
        cache.put("k", "\"v\"".to_string(), 5).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("\"v\""));
    }

    #[tokio::test]
    async fn test_forget_absent_is_ok() {
        let cache = store();
        assert!(cache.forget("missing").await.is_ok());
    }

    #[tokio::test]
    async fn test_remember_computes_once() {
        let cache = store();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        for _ in 0..3 {
            let value = cache
                .remember("k", 5, || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("42".to_string())
                })
                .await
                .unwrap();
            assert_eq!(value, "42");
        }

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remember_propagates_compute_error() {
        let cache = store();

        let result = cache
            .remember("k", 5, || async {
                Err(CacheError::RecordStore("offline".to_string()))
            })
            .await;

        assert!(matches!(result, Err(CacheError::RecordStore(_))));
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_rejects_oversized_key() {
        let cache = store();
        let key = "k".repeat(crate::cache::MAX_KEY_LENGTH + 1);
        let result = cache.put(&key, "1".to_string(), 5).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }
}
