//! Dynamic key registry.
//!
//! Per table, the suffixes of every `id.*` and `{column}.*` key created so
//! far are kept as a JSON list under `{table}.where`, so that invalidation can
//! find keys it cannot otherwise enumerate.
//!
//! Registration is a read-modify-write against the cache store and is not
//! atomic. Two first-time registrations racing on one table can both read the
//! same list, and the later `put` drops the other's suffix. The dropped key
//! stays cached until its TTL runs out or until it is queried again, which
//! registers it anew.

use tracing::debug;

use super::keys::{table_key, QueryKey};
use crate::cache::CacheStore;
use crate::error::Result;

pub struct DynamicKeyRegistry<'a, C: CacheStore> {
    store: &'a C,
    table: &'a str,
    ttl_minutes: u64,
}

impl<'a, C: CacheStore> DynamicKeyRegistry<'a, C> {
    pub fn new(store: &'a C, table: &'a str, ttl_minutes: u64) -> Self {
        Self {
            store,
            table,
            ttl_minutes,
        }
    }

    fn key(&self) -> String {
        QueryKey::Registry.for_table(self.table)
    }

    /// Registered suffixes in registration order; empty when the registry
    /// entry is missing.
    pub async fn suffixes(&self) -> Result<Vec<String>> {
        match self.store.get(&self.key()).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Appends `suffix` unless already present. Returns whether it was added.
    pub async fn register(&self, suffix: &str) -> Result<bool> {
        let mut suffixes = self.suffixes().await?;
        if suffixes.iter().any(|known| known == suffix) {
            return Ok(false);
        }

        suffixes.push(suffix.to_string());
        self.store
            .put(&self.key(), serde_json::to_string(&suffixes)?, self.ttl_minutes)
            .await?;

        debug!(table = %self.table, suffix, tracked = suffixes.len(), "registered dynamic cache key");
        Ok(true)
    }

    /// Forgets every tracked key, then the registry itself. Returns the number
    /// of tracked keys forgotten.
    pub async fn forget_all(&self) -> Result<usize> {
        let suffixes = self.suffixes().await?;
        for suffix in &suffixes {
            self.store.forget(&table_key(self.table, suffix)).await?;
        }

        self.store.forget(&self.key()).await?;
        Ok(suffixes.len())
    }
}
