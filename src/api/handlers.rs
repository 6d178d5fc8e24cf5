//! API Handlers
//!
//! HTTP request handlers for the admin endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::cache::{CacheConfig, CacheStatistics, IntelligentCache};
use crate::error::{CacheError, Result};
use crate::models::{
    CacheSizeResponse, CleanupResponse, DeleteResponse, HealthResponse, MemoryWarningResponse,
    SetCacheSizeRequest,
};
use crate::tasks::MemoryPressureSignal;
use crate::transit::{CachedValue, TransitCache};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache instance
    pub cache: IntelligentCache<CachedValue>,
    /// Low-memory signal the responder task listens on
    pub memory_signal: MemoryPressureSignal,
}

impl AppState {
    pub fn new(cache: IntelligentCache<CachedValue>, memory_signal: MemoryPressureSignal) -> Self {
        Self {
            cache,
            memory_signal,
        }
    }

    /// Creates a new AppState with a fresh cache built from `config`.
    pub fn from_config(config: CacheConfig) -> Self {
        Self::new(IntelligentCache::new(config), MemoryPressureSignal::new())
    }

    /// Journey/image view of the shared cache.
    pub fn transit(&self) -> TransitCache {
        TransitCache::new(self.cache.clone())
    }
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStatistics> {
    Json(state.cache.statistics())
}

/// Handler for POST /cleanup
///
/// Runs intelligent cleanup immediately, on the blocking pool.
pub async fn cleanup_handler(State(state): State<AppState>) -> Result<Json<CleanupResponse>> {
    let cache = state.cache.clone();
    let report = tokio::task::spawn_blocking(move || cache.perform_cleanup())
        .await
        .map_err(|e| CacheError::Internal(e.to_string()))?;

    Ok(Json(CleanupResponse::new(report)))
}

/// Handler for PUT /cache-size
pub async fn cache_size_handler(
    State(state): State<AppState>,
    Json(req): Json<SetCacheSizeRequest>,
) -> Result<Json<CacheSizeResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let cache = state.cache.clone();
    let cleanup = tokio::task::spawn_blocking(move || cache.set_cache_size(req.bytes))
        .await
        .map_err(|e| CacheError::Internal(e.to_string()))?;

    Ok(Json(CacheSizeResponse {
        max_size_bytes: state.cache.configuration().max_size_bytes,
        cleanup,
    }))
}

/// Handler for POST /memory-warning
///
/// Raises the low-memory signal; the responder task does the shedding.
pub async fn memory_warning_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<MemoryWarningResponse>) {
    let subscribers = state.memory_signal.notify();
    (
        StatusCode::ACCEPTED,
        Json(MemoryWarningResponse::new(subscribers)),
    )
}

/// Handler for DELETE /entries
pub async fn clear_handler(State(state): State<AppState>) -> Json<DeleteResponse> {
    state.cache.clear_all();
    Json(DeleteResponse::cleared())
}

/// Handler for DELETE /entries/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if state.cache.remove(&key) {
        Ok(Json(DeleteResponse::key(key)))
    } else {
        Err(CacheError::NotFound(key))
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
