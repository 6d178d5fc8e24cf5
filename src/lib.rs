//! Transit Cache - priority-aware in-memory caching
//!
//! Caches journey options and images with priority-derived TTLs, scored
//! eviction and memory-pressure response.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod transit;

pub use api::AppState;
pub use cache::{CacheConfig, CachePriority, CacheStatistics, CleanupReport, IntelligentCache};
pub use config::Config;
pub use tasks::{spawn_cleanup_task, spawn_memory_pressure_responder, MemoryPressureSignal};
pub use transit::{CachedValue, JourneyOption, TransitCache};
