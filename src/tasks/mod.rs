//! Background Tasks Module
//!
//! Tasks owned by the in-memory cache backend. The query cache itself runs
//! none.
//!
//! # Tasks
//! - Expired entry sweep: drops expired entries at the configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
