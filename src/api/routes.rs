//! API Routes
//!
//! Configures the Axum router with the cached record endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_mode_handler, clear_cache_handler, delete_handler, get_handler, health_handler,
    keys_handler, latest_handler, list_handler, save_handler, stats_handler, where_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /records` - All records, latest first
/// - `PUT /records` - Create or update a record
/// - `GET /records/latest` - Most recent records
/// - `GET /records/id/:id` - One record by id
/// - `GET /records/where/:column/:value` - Records matching a column
/// - `DELETE /records/:id` - Delete a record
/// - `DELETE /cache` - Invalidate the table's query cache
/// - `PUT /cache/mode` - Switch full/projected caching
/// - `GET /cache/keys` - Tracked dynamic keys
/// - `GET /stats` - Cache backend statistics
/// - `GET /health` - Health check endpoint
///
/// The read endpoints accept `?with=a,b`. Names are resolved against the
/// relations defined on the served table; a name it does not define fails
/// with 502. The table built by `AppState::from_config` defines none.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/records", get(list_handler).put(save_handler))
        .route("/records/latest", get(latest_handler))
        .route("/records/id/:id", get(get_handler))
        .route("/records/where/:column/:value", get(where_handler))
        .route("/records/:id", delete(delete_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/mode", put(cache_mode_handler))
        .route("/cache/keys", get(keys_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
