//! Record Store Module
//!
//! The query interface the cache reads through, plus an in-memory table
//! implementation that fires lifecycle events on writes.

mod memory;
mod row;

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;
use crate::query::Record;

pub use memory::MemoryRecordStore;
pub use row::Row;

/// Read side of an entity table.
#[async_trait]
pub trait RecordStore: Send + Sync {
    type Record: Record;
    type Id: fmt::Display + Send + Sync;

    /// Table name, used as the cache key prefix.
    fn table(&self) -> &str;

    async fn find_by_id(&self, id: &Self::Id) -> Result<Option<Self::Record>>;

    async fn where_equals(&self, column: &str, value: &str) -> Result<Vec<Self::Record>>;

    /// Up to `limit` records ordered by `column` descending.
    async fn ordered_latest(&self, column: &str, limit: usize) -> Result<Vec<Self::Record>>;

    /// Every record, most recently created first.
    async fn all(&self) -> Result<Vec<Self::Record>>;

    /// Eager-loads the named relations into `records` in place.
    async fn load_relations(&self, records: &mut [Self::Record], relations: &[&str]) -> Result<()>;
}
