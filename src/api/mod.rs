//! API Module
//!
//! HTTP handlers and routing exposing one table's query cache.
//!
//! # Endpoints
//! - `GET|PUT /records` - List (cached) or save a record
//! - `GET /records/latest` - Latest records (cached, fixed key)
//! - `GET /records/id/:id` - One record (cached, dynamic key)
//! - `GET /records/where/:column/:value` - Matching records (cached, dynamic key)
//! - `DELETE /records/:id` - Delete a record
//! - `DELETE /cache`, `PUT /cache/mode`, `GET /cache/keys` - Cache control
//! - `GET /stats`, `GET /health`

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
