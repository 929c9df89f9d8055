//! Entity query cache.
//!
//! Wraps the common read shapes of one table in read-through calls against a
//! cache store, and invalidates every cached query of the table on write.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::keys::QueryKey;
use super::registry::DynamicKeyRegistry;
use super::result::{CachedRecord, CachedRecords, ResultMode};
use crate::cache::CacheStore;
use crate::config::EntityCacheConfig;
use crate::error::Result;
use crate::lifecycle::{EntityEvent, EventKind, LifecycleEvents, LifecycleHandler};
use crate::record::RecordStore;

pub struct EntityCache<C, S> {
    table: String,
    cache: Arc<C>,
    records: Arc<S>,
    config: EntityCacheConfig,
    full_model_caching: AtomicBool,
}

impl<C: CacheStore, S: RecordStore> EntityCache<C, S> {
    pub fn new(cache: Arc<C>, records: Arc<S>, config: EntityCacheConfig) -> Self {
        Self {
            table: records.table().to_string(),
            full_model_caching: AtomicBool::new(config.full_model_caching),
            cache,
            records,
            config,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Configuration as given at construction. The live full-model flag is
    /// `is_full_model_caching`.
    pub fn config(&self) -> &EntityCacheConfig {
        &self.config
    }

    pub fn records(&self) -> &Arc<S> {
        &self.records
    }

    // == Result Mode ==
    pub fn enable_full_model_caching(&self) {
        self.full_model_caching.store(true, Ordering::SeqCst);
    }

    pub fn disable_full_model_caching(&self) {
        self.full_model_caching.store(false, Ordering::SeqCst);
    }

    pub fn is_full_model_caching(&self) -> bool {
        self.full_model_caching.load(Ordering::SeqCst)
    }

    pub fn result_mode(&self) -> ResultMode {
        ResultMode::from_full_flag(self.is_full_model_caching())
    }

    fn registry(&self) -> DynamicKeyRegistry<'_, C> {
        DynamicKeyRegistry::new(&*self.cache, &self.table, self.config.cache_expiry_minutes)
    }

    /// Dynamic key suffixes currently tracked for this table.
    pub async fn registered_keys(&self) -> Result<Vec<String>> {
        self.registry().suffixes().await
    }

    // == Queries ==
    /// Up to `limit` records ordered by `order_column` descending.
    ///
    /// Cached under a single `latest` key: later calls with other arguments
    /// return the first call's result until the table is invalidated.
    pub async fn get_latest(
        &self,
        limit: usize,
        order_column: &str,
        relations: &[&str],
    ) -> Result<CachedRecords<S::Record>> {
        self.read_through(&QueryKey::Latest, || async move {
            let mut records = self.records.ordered_latest(order_column, limit).await?;
            self.load_relations(&mut records, relations).await?;
            self.result_mode().many(records)
        })
        .await
    }

    /// One record by id. A missing record is cached as `None`.
    pub async fn get_by_id(
        &self,
        id: &S::Id,
        relations: &[&str],
    ) -> Result<Option<CachedRecord<S::Record>>> {
        let key = QueryKey::id(id);
        let result = self
            .read_through(&key, || async move {
                let Some(record) = self.records.find_by_id(id).await? else {
                    return Ok(None);
                };
                let mut records = [record];
                self.load_relations(&mut records, relations).await?;
                let [record] = records;
                self.result_mode().one(record).map(Some)
            })
            .await?;

        self.track(&key).await?;
        Ok(result)
    }

    /// All records with `column == value`.
    ///
    /// `column = "id"` shares its key with `get_by_id`: once one of the two
    /// has cached the key, the other fails with `CacheError::Serialization`
    /// until the table is invalidated.
    pub async fn get_where(
        &self,
        column: &str,
        value: &str,
        relations: &[&str],
    ) -> Result<CachedRecords<S::Record>> {
        let key = QueryKey::where_eq(column, value);
        let result = self
            .read_through(&key, || async move {
                let mut records = self.records.where_equals(column, value).await?;
                self.load_relations(&mut records, relations).await?;
                self.result_mode().many(records)
            })
            .await?;

        self.track(&key).await?;
        Ok(result)
    }

    /// Every record, latest first.
    pub async fn get_all(&self, relations: &[&str]) -> Result<CachedRecords<S::Record>> {
        self.read_through(&QueryKey::All, || async move {
            let mut records = self.records.all().await?;
            self.load_relations(&mut records, relations).await?;
            self.result_mode().many(records)
        })
        .await
    }

    // == Invalidation ==
    /// Forgets every cached query of the table: all tracked dynamic keys, the
    /// registry, then the fixed `all` and `latest` keys. Returns how many
    /// dynamic keys were forgotten.
    pub async fn clear_cache(&self) -> Result<usize> {
        let forgotten = self.registry().forget_all().await?;
        self.cache.forget(&QueryKey::All.for_table(&self.table)).await?;
        self.cache
            .forget(&QueryKey::Latest.for_table(&self.table))
            .await?;

        info!(table = %self.table, dynamic_keys = forgotten, "query cache cleared");
        Ok(forgotten)
    }

    /// Registers a dynamic key. When registration fails the entry is forgotten
    /// before the error is returned, as `clear_cache` could not reach it.
    async fn track(&self, key: &QueryKey) -> Result<()> {
        if let Err(err) = self.registry().register(&key.suffix()).await {
            warn!(table = %self.table, suffix = %key.suffix(), error = %err, "dynamic key not registered, dropping entry");
            self.cache.forget(&key.for_table(&self.table)).await?;
            return Err(err);
        }
        Ok(())
    }

    async fn read_through<T, F, Fut>(&self, key: &QueryKey, query: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        let cache_key = key.for_table(&self.table);
        let raw = {
            let cache_key = cache_key.as_str();
            self.cache
                .remember(cache_key, self.config.cache_expiry_minutes, || async move {
                    debug!(key = cache_key, "query cache miss");
                    let value = query().await?;
                    Ok(serde_json::to_string(&value)?)
                })
                .await?
        };

        Ok(serde_json::from_str(&raw)?)
    }

    async fn load_relations(&self, records: &mut [S::Record], relations: &[&str]) -> Result<()> {
        if relations.is_empty() || records.is_empty() {
            return Ok(());
        }
        self.records.load_relations(records, relations).await
    }
}

impl<C, S> EntityCache<C, S>
where
    C: CacheStore + 'static,
    S: RecordStore + 'static,
{
    // == Lifecycle Wiring ==
    /// Registers invalidation hooks on `events` for each enabled bust flag and
    /// returns how many were registered.
    ///
    /// Hooks hold a weak reference, so a dropped cache stops reacting to
    /// events without unsubscribing.
    pub async fn subscribe(self: &Arc<Self>, events: &LifecycleEvents) -> usize {
        let mut registered = 0;

        if self.config.bust_cache_on_saved {
            events.on_saved(self.invalidation_hook()).await;
            registered += 1;
        }
        if self.config.bust_cache_on_deleted {
            events.on_deleted(self.invalidation_hook()).await;
            registered += 1;
        }

        debug!(table = %self.table, hooks = registered, "subscribed query cache to lifecycle events");
        registered
    }

    fn invalidation_hook(self: &Arc<Self>) -> Arc<dyn LifecycleHandler> {
        Arc::new(InvalidationHook {
            cache: Arc::downgrade(self),
        })
    }
}

struct InvalidationHook<C, S> {
    cache: Weak<EntityCache<C, S>>,
}

#[async_trait]
impl<C, S> LifecycleHandler for InvalidationHook<C, S>
where
    C: CacheStore + 'static,
    S: RecordStore + 'static,
{
    async fn handle(&self, kind: EventKind, event: &EntityEvent) -> Result<()> {
        let Some(cache) = self.cache.upgrade() else {
            return Ok(());
        };
        if event.table != cache.table() {
            return Ok(());
        }

        debug!(?kind, table = %event.table, id = %event.id, "write event, clearing query cache");
        cache.clear_cache().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::record::{MemoryRecordStore, Row};
    use serde_json::{json, Map, Value};
    use tokio::sync::RwLock;

    type TestCache = EntityCache<RwLock<MemoryStore>, MemoryRecordStore>;

    fn attrs(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    async fn setup(config: EntityCacheConfig) -> (Arc<RwLock<MemoryStore>>, Arc<TestCache>) {
        let store = Arc::new(RwLock::new(MemoryStore::new(256)));
        let records = Arc::new(MemoryRecordStore::new("posts"));
        for status in ["draft", "live", "live"] {
            records
                .save(None, attrs(json!({ "status": status })))
                .await
                .unwrap();
        }
        let cache = Arc::new(EntityCache::new(store.clone(), records, config));
        (store, cache)
    }

    #[tokio::test]
    async fn test_get_by_id_caches_and_registers() {
        let (store, cache) = setup(EntityCacheConfig::default()).await;

        let found = cache.get_by_id(&2, &[]).await.unwrap().unwrap();
        assert_eq!(found.into_full().unwrap().id, 2);

        assert!(store.read().await.contains("posts.id.2"));
        assert_eq!(cache.registered_keys().await.unwrap(), vec!["id.2".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_id_is_cached_as_none() {
        let (store, cache) = setup(EntityCacheConfig::default()).await;

        assert!(cache.get_by_id(&99, &[]).await.unwrap().is_none());
        assert_eq!(store.write().await.get("posts.id.99").unwrap(), "null");
    }

    #[tokio::test]
    async fn test_get_where_registers_suffix_once() {
        let (_, cache) = setup(EntityCacheConfig::default()).await;

        for _ in 0..3 {
            let live = cache.get_where("status", "live", &[]).await.unwrap();
            assert_eq!(live.len(), 2);
        }
        assert_eq!(
            cache.registered_keys().await.unwrap(),
            vec!["status.live".to_string()]
        );
    }

    #[tokio::test]
    async fn test_clear_cache_forgets_everything() {
        let (store, cache) = setup(EntityCacheConfig::default()).await;

        cache.get_all(&[]).await.unwrap();
        cache.get_latest(2, "created_at", &[]).await.unwrap();
        cache.get_by_id(&1, &[]).await.unwrap();
        cache.get_where("status", "draft", &[]).await.unwrap();

        assert_eq!(cache.clear_cache().await.unwrap(), 2);

        let store = store.read().await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_projected_mode() {
        let (_, cache) = setup(EntityCacheConfig::default().with_full_model_caching(false)).await;

        let all = cache.get_all(&[]).await.unwrap();
        let plain = all.into_projected().unwrap();
        assert_eq!(plain.len(), 3);
        assert!(plain[0]["status"].is_string());
    }

    #[tokio::test]
    async fn test_mode_toggle() {
        let (_, cache) = setup(EntityCacheConfig::default()).await;

        cache.disable_full_model_caching();
        assert_eq!(cache.result_mode(), ResultMode::Projected);
        cache.enable_full_model_caching();
        assert!(cache.is_full_model_caching());
        assert!(cache.config().full_model_caching);
    }

    #[tokio::test]
    async fn test_subscribe_respects_flags() {
        let (_, cache) = setup(EntityCacheConfig::default().with_bust_on_deleted(false)).await;
        let events = LifecycleEvents::new();

        assert_eq!(cache.subscribe(&events).await, 1);
        assert_eq!(events.handler_count(EventKind::Saved).await, 1);
        assert_eq!(events.handler_count(EventKind::Deleted).await, 0);
    }

    #[tokio::test]
    async fn test_hook_ignores_other_tables_and_dropped_cache() {
        let (store, cache) = setup(EntityCacheConfig::default()).await;
        let events = LifecycleEvents::new();
        cache.subscribe(&events).await;

        cache.get_all(&[]).await.unwrap();
        events.saved(&EntityEvent::new("comments", 1)).await.unwrap();
        assert!(store.read().await.contains("posts.all"));

        drop(cache);
        events.saved(&EntityEvent::new("posts", 1)).await.unwrap();
        assert!(store.read().await.contains("posts.all"));
    }

    #[tokio::test]
    async fn test_full_record_roundtrips_through_cache() {
        let (_, cache) = setup(EntityCacheConfig::default()).await;

        let first: Vec<Row> = cache.get_all(&[]).await.unwrap().into_full().unwrap();
        let second: Vec<Row> = cache.get_all(&[]).await.unwrap().into_full().unwrap();
        assert_eq!(first, second);
    }
}
