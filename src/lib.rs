//! Entity Cache - read-through query caching for entity tables
//!
//! Caches the common read shapes of a table (all, latest, by id, by column),
//! tracks the parameterized keys it creates, and drops every cached query of
//! the table when a record is saved or deleted.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod query;
pub mod record;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStore, MemoryStore};
pub use config::{Config, EntityCacheConfig};
pub use error::{CacheError, Result};
pub use lifecycle::{EntityEvent, LifecycleEvents, LifecycleHandler};
pub use query::{CachedRecord, CachedRecords, CachedResult, EntityCache, Record};
pub use record::{MemoryRecordStore, RecordStore, Row};
pub use tasks::spawn_cleanup_task;
