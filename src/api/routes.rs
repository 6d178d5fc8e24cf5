//! API Routes
//!
//! Configures the Axum router with the admin endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_size_handler, cleanup_handler, clear_handler, delete_handler, health_handler,
    memory_warning_handler, stats_handler, AppState,
};

/// Creates the admin router with all endpoints configured.
///
/// # Endpoints
/// - `GET /stats` - Cache statistics
/// - `POST /cleanup` - Run intelligent cleanup now
/// - `PUT /cache-size` - Change the byte budget
/// - `POST /memory-warning` - Raise the low-memory signal
/// - `DELETE /entries` - Clear the cache and its counters
/// - `DELETE /entries/:key` - Remove one entry
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/stats", get(stats_handler))
        .route("/cleanup", post(cleanup_handler))
        .route("/cache-size", put(cache_size_handler))
        .route("/memory-warning", post(memory_warning_handler))
        .route("/entries", delete(clear_handler))
        .route("/entries/:key", delete(delete_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
