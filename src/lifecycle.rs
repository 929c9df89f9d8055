//! Lifecycle Events Module
//!
//! Post-write notifications for entity tables. A record store fires `saved`
//! after every create or update and `deleted` after every delete; interested
//! components subscribe handlers explicitly during their own initialization.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;

// == Entity Event ==
/// Identifies the record a write touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityEvent {
    pub table: String,
    pub id: String,
}

impl EntityEvent {
    pub fn new(table: impl Into<String>, id: impl fmt::Display) -> Self {
        Self {
            table: table.into(),
            id: id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Fired after a create or an update
    Saved,
    /// Fired after a delete
    Deleted,
}

#[async_trait]
pub trait LifecycleHandler: Send + Sync {
    async fn handle(&self, kind: EventKind, event: &EntityEvent) -> Result<()>;
}

// == Lifecycle Events ==
/// Handler lists for one event source.
#[derive(Default)]
pub struct LifecycleEvents {
    saved: RwLock<Vec<Arc<dyn LifecycleHandler>>>,
    deleted: RwLock<Vec<Arc<dyn LifecycleHandler>>>,
}

impl LifecycleEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn on_saved(&self, handler: Arc<dyn LifecycleHandler>) {
        self.saved.write().await.push(handler);
    }

    pub async fn on_deleted(&self, handler: Arc<dyn LifecycleHandler>) {
        self.deleted.write().await.push(handler);
    }

    /// Number of handlers registered for `kind`.
    pub async fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers(kind).read().await.len()
    }

    pub async fn saved(&self, event: &EntityEvent) -> Result<()> {
        self.dispatch(EventKind::Saved, event).await
    }

    pub async fn deleted(&self, event: &EntityEvent) -> Result<()> {
        self.dispatch(EventKind::Deleted, event).await
    }

    fn handlers(&self, kind: EventKind) -> &RwLock<Vec<Arc<dyn LifecycleHandler>>> {
        match kind {
            EventKind::Saved => &self.saved,
            EventKind::Deleted => &self.deleted,
        }
    }

    /// Runs handlers in registration order; the first failure stops dispatch
    /// and is returned to the writer.
    async fn dispatch(&self, kind: EventKind, event: &EntityEvent) -> Result<()> {
        // Snapshot so handlers may subscribe further without deadlocking
        let handlers = self.handlers(kind).read().await.clone();
        debug!(?kind, table = %event.table, id = %event.id, handlers = handlers.len(), "dispatching lifecycle event");

        for handler in handlers {
            handler.handle(kind, event).await?;
        }
        Ok(())
    }
}
