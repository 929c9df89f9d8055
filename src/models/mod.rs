//! Request and Response models for the HTTP surface
//!
//! DTOs used for serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CacheModeRequest, LatestQuery, RelationsQuery, SaveRecordRequest};
pub use responses::{
    CacheModeResponse, ClearResponse, DeleteResponse, HealthResponse, KeysResponse,
    RecordResponse, RecordsResponse, SaveResponse, StatsResponse,
};
