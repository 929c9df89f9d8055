//! In-memory table.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use super::{RecordStore, Row};
use crate::error::{CacheError, Result};
use crate::lifecycle::{EntityEvent, LifecycleEvents};
use crate::query::Record;

/// `name` on this table resolves to the row of `related` whose id is held in
/// this row's `foreign_key` column.
struct BelongsTo {
    related: Arc<MemoryRecordStore>,
    foreign_key: String,
}

pub struct MemoryRecordStore {
    table: String,
    rows: RwLock<BTreeMap<u64, Row>>,
    next_id: AtomicU64,
    relations: HashMap<String, BelongsTo>,
    events: Arc<LifecycleEvents>,
}

impl MemoryRecordStore {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            relations: HashMap::new(),
            events: Arc::new(LifecycleEvents::new()),
        }
    }

    /// Shares an event source with other tables.
    pub fn with_events(mut self, events: Arc<LifecycleEvents>) -> Self {
        self.events = events;
        self
    }

    pub fn belongs_to(
        mut self,
        name: impl Into<String>,
        related: Arc<MemoryRecordStore>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.relations.insert(
            name.into(),
            BelongsTo {
                related,
                foreign_key: foreign_key.into(),
            },
        );
        self
    }

    pub fn events(&self) -> &Arc<LifecycleEvents> {
        &self.events
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    // == Save ==
    /// Updates the row with `id` if it exists, otherwise inserts a new row
    /// (with `id` when given, the next free id when not). Fires `saved` once
    /// the write is visible.
    pub async fn save(&self, id: Option<u64>, attributes: Map<String, Value>) -> Result<Row> {
        let row = {
            let mut rows = self.rows.write().await;
            match id.and_then(|id| rows.get_mut(&id)) {
                Some(existing) => {
                    existing.attributes = attributes;
                    existing.updated_at = Utc::now();
                    existing.clone()
                }
                None => {
                    let id = match id {
                        Some(id) => {
                            self.next_id.fetch_max(id.saturating_add(1), Ordering::SeqCst);
                            id
                        }
                        None => self.next_id.fetch_add(1, Ordering::SeqCst),
                    };
                    let row = Row::new(id, attributes);
                    rows.insert(id, row.clone());
                    row
                }
            }
        };

        debug!(table = %self.table, id = row.id, "record saved");
        self.events.saved(&EntityEvent::new(&self.table, row.id)).await?;
        Ok(row)
    }

    // == Delete ==
    /// Removes a row, firing `deleted` when one was removed.
    pub async fn delete(&self, id: u64) -> Result<Option<Row>> {
        let removed = self.rows.write().await.remove(&id);

        if let Some(row) = &removed {
            debug!(table = %self.table, id = row.id, "record deleted");
            self.events.deleted(&EntityEvent::new(&self.table, row.id)).await?;
        }
        Ok(removed)
    }

    async fn sorted_desc(&self, column: &str) -> Vec<Row> {
        let mut rows: Vec<Row> = self.rows.read().await.values().cloned().collect();
        rows.sort_by(|a, b| b.compare_by(a, column).then_with(|| b.id.cmp(&a.id)));
        rows
    }

    async fn resolve(&self, relation: &BelongsTo, row: &Row) -> Result<Value> {
        let foreign_id = match row.column(&relation.foreign_key) {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.parse().ok(),
            _ => None,
        };

        let related = match foreign_id {
            Some(id) => relation.related.rows.read().await.get(&id).cloned(),
            None => None,
        };

        match related {
            Some(related) => related.to_plain(),
            None => Ok(Value::Null),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    type Record = Row;
    type Id = u64;

    fn table(&self) -> &str {
        &self.table
    }

    async fn find_by_id(&self, id: &u64) -> Result<Option<Row>> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn where_equals(&self, column: &str, value: &str) -> Result<Vec<Row>> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|row| row.column_equals(column, value))
            .cloned()
            .collect())
    }

    async fn ordered_latest(&self, column: &str, limit: usize) -> Result<Vec<Row>> {
        let mut rows = self.sorted_desc(column).await;
        rows.truncate(limit);
        Ok(rows)
    }

    async fn all(&self) -> Result<Vec<Row>> {
        Ok(self.sorted_desc("created_at").await)
    }

    async fn load_relations(&self, records: &mut [Row], relations: &[&str]) -> Result<()> {
        for name in relations {
            let relation = self.relations.get(*name).ok_or_else(|| {
                CacheError::RecordStore(format!(
                    "undefined relation '{}' on table '{}'",
                    name, self.table
                ))
            })?;

            for row in records.iter_mut() {
                let related = self.resolve(relation, row).await?;
                row.relations.insert(name.to_string(), related);
            }
        }
        Ok(())
    }
}
