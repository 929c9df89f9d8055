//! API Handlers
//!
//! HTTP request handlers for the cached record endpoints.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::MemoryStore;
use crate::config::{Config, EntityCacheConfig};
use crate::error::{CacheError, Result};
use crate::models::{
    CacheModeRequest, CacheModeResponse, ClearResponse, DeleteResponse, HealthResponse,
    KeysResponse, LatestQuery, RecordResponse, RecordsResponse, RelationsQuery, SaveRecordRequest,
    SaveResponse, StatsResponse,
};
use crate::query::EntityCache;
use crate::record::MemoryRecordStore;

/// Query cache over the in-memory backends.
pub type RecordCache = EntityCache<RwLock<MemoryStore>, MemoryRecordStore>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache backend
    pub cache: Arc<RwLock<MemoryStore>>,
    /// Backing table
    pub records: Arc<MemoryRecordStore>,
    /// Query cache for that table
    pub entity: Arc<RecordCache>,
}

impl AppState {
    /// Builds the query cache and subscribes it to the table's write events.
    pub async fn new(
        cache: MemoryStore,
        records: MemoryRecordStore,
        config: EntityCacheConfig,
    ) -> Self {
        let cache = Arc::new(RwLock::new(cache));
        let records = Arc::new(records);
        let entity = Arc::new(EntityCache::new(cache.clone(), records.clone(), config));
        entity.subscribe(records.events()).await;

        Self {
            cache,
            records,
            entity,
        }
    }

    /// Serves an empty table named by the config. It has no relations, so
    /// `?with=` only succeeds while the result is empty; use `new` with a
    /// `belongs_to` table to serve relations.
    pub async fn from_config(config: &Config) -> Self {
        Self::new(
            MemoryStore::new(config.max_entries),
            MemoryRecordStore::new(config.table_name.clone()),
            config.entity.clone(),
        )
        .await
    }
}

fn as_refs(names: &[String]) -> Vec<&str> {
    names.iter().map(String::as_str).collect()
}

/// Handler for GET /records
pub async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<RelationsQuery>,
) -> Result<Json<RecordsResponse>> {
    let relations = query.relation_names();
    let cached = state.entity.get_all(&as_refs(&relations)).await?;

    Ok(Json(RecordsResponse::new(state.entity.table(), cached)?))
}

/// Handler for GET /records/latest
///
/// `limit` and `order_by` only matter on a miss: the latest slot is shared by
/// every parameter combination.
pub async fn latest_handler(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> Result<Json<RecordsResponse>> {
    let relations = query.relation_names();
    let cached = state
        .entity
        .get_latest(query.limit(), query.order_by(), &as_refs(&relations))
        .await?;

    Ok(Json(RecordsResponse::new(state.entity.table(), cached)?))
}

/// Handler for GET /records/id/:id
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<RelationsQuery>,
) -> Result<Json<RecordResponse>> {
    let relations = query.relation_names();
    let cached = state
        .entity
        .get_by_id(&id, &as_refs(&relations))
        .await?
        .ok_or_else(|| CacheError::NotFound(format!("{}.id.{}", state.entity.table(), id)))?;

    Ok(Json(RecordResponse::new(state.entity.table(), cached)?))
}

/// Handler for GET /records/where/:column/:value
pub async fn where_handler(
    State(state): State<AppState>,
    Path((column, value)): Path<(String, String)>,
    Query(query): Query<RelationsQuery>,
) -> Result<Json<RecordsResponse>> {
    let relations = query.relation_names();
    let cached = state
        .entity
        .get_where(&column, &value, &as_refs(&relations))
        .await?;

    Ok(Json(RecordsResponse::new(state.entity.table(), cached)?))
}

/// Handler for PUT /records
pub async fn save_handler(
    State(state): State<AppState>,
    Json(req): Json<SaveRecordRequest>,
) -> Result<Json<SaveResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let record = state.records.save(req.id, req.attributes).await?;
    Ok(Json(SaveResponse::new(record)))
}

/// Handler for DELETE /records/:id
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteResponse>> {
    state
        .records
        .delete(id)
        .await?
        .ok_or_else(|| CacheError::NotFound(format!("record {}", id)))?;

    Ok(Json(DeleteResponse::new(id)))
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    let dynamic_keys = state.entity.clear_cache().await?;
    Ok(Json(ClearResponse::new(state.entity.table(), dynamic_keys)))
}

/// Handler for PUT /cache/mode
pub async fn cache_mode_handler(
    State(state): State<AppState>,
    Json(req): Json<CacheModeRequest>,
) -> Json<CacheModeResponse> {
    if req.full {
        state.entity.enable_full_model_caching();
    } else {
        state.entity.disable_full_model_caching();
    }

    Json(CacheModeResponse {
        full_model_caching: state.entity.is_full_model_caching(),
    })
}

/// Handler for GET /cache/keys
pub async fn keys_handler(State(state): State<AppState>) -> Result<Json<KeysResponse>> {
    let keys = state.entity.registered_keys().await?;
    Ok(Json(KeysResponse {
        table: state.entity.table().to_string(),
        keys,
    }))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.read().await.stats();
    Json(StatsResponse::from(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
