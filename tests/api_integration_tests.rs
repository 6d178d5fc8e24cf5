//! Integration Tests for Admin API Endpoints
//!
//! Tests full request/response cycle for each endpoint against a shared cache.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use transit_cache::api::create_router;
use transit_cache::cache::ManualClock;
use transit_cache::{
    spawn_memory_pressure_responder, AppState, CacheConfig, CachePriority, CachedValue,
    IntelligentCache, JourneyOption, MemoryPressureSignal,
};

// == Helper Functions ==

fn create_test_state() -> (AppState, ManualClock) {
    let clock = ManualClock::new();
    let cache = IntelligentCache::with_clock(CacheConfig::default(), Arc::new(clock.clone()));
    (AppState::new(cache, MemoryPressureSignal::new()), clock)
}

fn create_test_app() -> Router {
    create_router(create_test_state().0)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn journey(line: &str) -> JourneyOption {
    JourneyOption {
        departure: "2024-05-01T07:58:00+02:00".to_string(),
        arrival: "2024-05-01T08:30:00+02:00".to_string(),
        line: line.to_string(),
        platform: None,
        delay_minutes: Some(2),
    }
}

// == STATS Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint_reflects_cache_activity() {
    let (state, _) = create_test_state();
    let transit = state.transit();
    transit.cache_journey_options("home-work", true, vec![journey("S1"), journey("S2")]);
    assert!(transit.journey_options("home-work").is_some());
    assert!(transit.journey_options("nowhere").is_none());

    let response = create_router(state)
        .oneshot(request("GET", "/stats"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["entry_count"].as_u64().unwrap(), 1);
    assert_eq!(json["hit_count"].as_u64().unwrap(), 1);
    assert_eq!(json["miss_count"].as_u64().unwrap(), 1);
    assert_eq!(json["eviction_count"].as_u64().unwrap(), 0);
    assert_eq!(json["total_size_bytes"].as_u64().unwrap(), 2048);
    assert_eq!(json["average_entry_size"].as_u64().unwrap(), 2048);
    assert_eq!(json["hit_rate"].as_f64().unwrap(), 0.5);
}

// == CLEANUP Endpoint Tests ==

#[tokio::test]
async fn test_cleanup_endpoint_removes_expired() {
    let (state, clock) = create_test_state();
    state
        .transit()
        .cache_image("https://example.org/logo.png", vec![0u8; 64], CachePriority::Low);
    clock.advance(Duration::from_secs(61));

    let response = create_router(state.clone())
        .oneshot(request("POST", "/cleanup"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["report"]["expired"].as_u64().unwrap(), 1);
    assert_eq!(json["report"]["bytes_freed"].as_u64().unwrap(), 64);
    assert!(state.cache.is_empty());
}

// == CACHE-SIZE Endpoint Tests ==

#[tokio::test]
async fn test_cache_size_endpoint_shrinks_cache() {
    let clock = ManualClock::new();
    let cache = IntelligentCache::with_size_provider(
        CacheConfig::default(),
        Arc::new(clock),
        Arc::new(|_: &CachedValue| 200_000),
    );
    for i in 0..10 {
        cache.store(format!("image_{}", i), CachedValue::Text(String::new()), CachePriority::Normal);
    }
    let state = AppState::new(cache, MemoryPressureSignal::new());

    let response = create_router(state.clone())
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/cache-size")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"bytes":500000}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["max_size_bytes"].as_u64().unwrap(), 1_048_576);
    assert_eq!(json["cleanup"]["evicted"].as_u64().unwrap(), 7);
    assert_eq!(state.cache.current_size_bytes(), 600_000);
}

#[tokio::test]
async fn test_cache_size_endpoint_rejects_zero() {
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/cache-size")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"bytes":0}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_invalid_json_request() {
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/cache-size")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"invalid json"#))
                .unwrap(),
        )
        .await
        .unwrap();

    // Axum returns 400 or 422 for JSON parsing errors
    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

// == MEMORY-WARNING Endpoint Tests ==

#[tokio::test]
async fn test_memory_warning_endpoint_reaches_responder() {
    let (state, _) = create_test_state();
    let transit = state.transit();
    transit.cache_image("https://example.org/a.png", vec![1u8; 10], CachePriority::Low);
    transit.cache_journey_options("commute", false, vec![journey("U2")]);
    let responder =
        spawn_memory_pressure_responder(state.cache.clone(), state.memory_signal.subscribe());

    let response = create_router(state.clone())
        .oneshot(request("POST", "/memory-warning"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["subscribers"].as_u64().unwrap(), 1);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(transit.image("https://example.org/a.png").is_none());
    assert!(transit.journey_options("commute").is_some());
    assert_eq!(state.cache.statistics().eviction_count, 1);

    responder.abort();
}

// == ENTRIES Endpoint Tests ==

#[tokio::test]
async fn test_delete_entry_endpoint() {
    let (state, _) = create_test_state();
    state.transit().cache_journey_options("r1", false, vec![journey("S3")]);
    let app = create_router(state.clone());

    let response = app
        .clone()
        .oneshot(request("DELETE", "/entries/journey_r1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"].as_str().unwrap(), "journey_r1");

    let response = app
        .oneshot(request("DELETE", "/entries/journey_r1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Explicit removal is not an eviction
    assert_eq!(state.cache.statistics().eviction_count, 0);
}

#[tokio::test]
async fn test_clear_endpoint_resets_everything() {
    let (state, _) = create_test_state();
    let transit = state.transit();
    transit.cache_journey_options("r1", false, vec![journey("S3")]);
    transit.journey_options("r1");
    transit.journey_options("r2");

    let response = create_router(state.clone())
        .oneshot(request("DELETE", "/entries"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stats = state.cache.statistics();
    assert_eq!(stats.entry_count, 0);
    assert_eq!(stats.total_size_bytes, 0);
    assert_eq!((stats.hit_count, stats.miss_count, stats.eviction_count), (0, 0, 0));
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let response = create_test_app()
        .oneshot(request("GET", "/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}
