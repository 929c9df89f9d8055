//! Response DTOs for the HTTP surface
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::error::Result;
use crate::query::{CachedRecord, CachedRecords, CachedResult};
use crate::record::Row;

/// Response body for GET /records, /records/latest and /records/where/...
#[derive(Debug, Clone, Serialize)]
pub struct RecordsResponse {
    pub table: String,
    /// Shape the entry was cached in: "full" or "projected"
    pub mode: &'static str,
    pub count: usize,
    pub records: Value,
}

impl RecordsResponse {
    pub fn new(table: impl Into<String>, cached: CachedRecords<Row>) -> Result<Self> {
        let mode = cached.mode().as_str();
        let count = cached.len();
        let records = match cached {
            CachedResult::Full(rows) => serde_json::to_value(rows)?,
            CachedResult::Projected(values) => Value::Array(values),
        };
        Ok(Self {
            table: table.into(),
            mode,
            count,
            records,
        })
    }
}

/// Response body for GET /records/id/:id
#[derive(Debug, Clone, Serialize)]
pub struct RecordResponse {
    pub table: String,
    pub mode: &'static str,
    pub record: Value,
}

impl RecordResponse {
    pub fn new(table: impl Into<String>, cached: CachedRecord<Row>) -> Result<Self> {
        let mode = cached.mode().as_str();
        let record = match cached {
            CachedResult::Full(row) => serde_json::to_value(row)?,
            CachedResult::Projected(value) => value,
        };
        Ok(Self {
            table: table.into(),
            mode,
            record,
        })
    }
}

/// Response body for PUT /records
#[derive(Debug, Clone, Serialize)]
pub struct SaveResponse {
    pub message: String,
    pub record: Row,
}

impl SaveResponse {
    pub fn new(record: Row) -> Self {
        Self {
            message: format!("Record '{}' saved successfully", record.id),
            record,
        }
    }
}

/// Response body for DELETE /records/:id
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: u64,
}

impl DeleteResponse {
    pub fn new(id: u64) -> Self {
        Self {
            message: format!("Record '{}' deleted successfully", id),
            id,
        }
    }
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Dynamic keys forgotten besides the fixed `all` and `latest` keys
    pub dynamic_keys: usize,
}

impl ClearResponse {
    pub fn new(table: &str, dynamic_keys: usize) -> Self {
        Self {
            message: format!("Cache for '{}' cleared", table),
            dynamic_keys,
        }
    }
}

/// Response body for PUT /cache/mode
#[derive(Debug, Clone, Serialize)]
pub struct CacheModeResponse {
    pub full_model_caching: bool,
}

/// Response body for GET /cache/keys
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub table: String,
    pub keys: Vec<String>,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub forgets: u64,
    pub total_entries: usize,
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            forgets: stats.forgets,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
