//! Cache Module
//!
//! In-memory caching with priority-derived TTL, scored eviction and
//! memory-pressure response.

mod clock;
pub mod config;
mod entry;
mod priority;
mod shared;
mod size;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use entry::{AccessTracking, CacheEntry};
pub use priority::CachePriority;
pub use shared::IntelligentCache;
pub use size::{
    sequence_size, trait_size_provider, EstimateSize, SizeProvider, DEFAULT_ENTRY_SIZE,
    SEQUENCE_ITEM_SIZE_ESTIMATE,
};
pub use stats::{CacheStatistics, StatsCollector};
pub use store::{CacheStore, CleanupReport, Lookup};
