//! Cache Module
//!
//! The key-value store interface used by the query cache, and an in-memory
//! backend with TTL expiration and LRU eviction.

mod backend;
mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use backend::CacheStore;
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::MemoryStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
