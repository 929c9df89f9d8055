//! Query Cache Module
//!
//! Read-through caching of per-table queries with bulk invalidation of the
//! parameterized keys they create.

mod entity;
mod keys;
mod registry;
mod result;


pub use entity::EntityCache;
pub use keys::{table_key, QueryKey, SEPARATOR};
pub use registry::DynamicKeyRegistry;
pub use result::{CachedRecord, CachedRecords, CachedResult, PlainValue, Record, ResultMode};
