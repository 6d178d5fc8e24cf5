//! Cache Entry Module
//!
//! Defines individual cache entries with priority-derived TTL and access
//! bookkeeping used by the eviction score.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::cache::CachePriority;

const SECS_PER_HOUR: f64 = 3600.0;

// == Access Tracking ==
/// How a successful retrieval updates an entry's access count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessTracking {
    /// Every hit sets the count back to 1.
    #[default]
    Reset,
    /// Every hit adds 1 to the count.
    Increment,
}

impl std::str::FromStr for AccessTracking {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reset" => Ok(AccessTracking::Reset),
            "increment" => Ok(AccessTracking::Increment),
            other => Err(format!("Unknown access tracking mode: {}", other)),
        }
    }
}

// == Cache Entry ==
/// A single cached payload and its metadata.
///
/// Access metadata is atomic so hits can be recorded while the store is held
/// under a shared lock.
#[derive(Debug)]
pub struct CacheEntry<V> {
    pub key: String,
    pub value: V,
    pub priority: CachePriority,
    pub created_at: Instant,
    pub ttl: Duration,
    /// Approximate footprint in bytes, fixed at insertion
    pub size: usize,
    access_count: AtomicU64,
    /// Nanoseconds after `created_at` of the last successful retrieval
    last_access_offset_ns: AtomicU64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry whose TTL is derived from `priority`.
    pub fn new(key: String, value: V, priority: CachePriority, size: usize, now: Instant) -> Self {
        Self {
            key,
            value,
            priority,
            created_at: now,
            ttl: priority.ttl(),
            size,
            access_count: AtomicU64::new(0),
            last_access_offset_ns: AtomicU64::new(0),
        }
    }

    pub fn access_count(&self) -> u64 {
        self.access_count.load(Ordering::Relaxed)
    }

    pub fn last_accessed(&self) -> Instant {
        self.created_at + Duration::from_nanos(self.last_access_offset_ns.load(Ordering::Relaxed))
    }

    // == Expiry ==
    /// True once more than `ttl` has passed since creation.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.age(now) > self.ttl
    }

    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    pub fn time_since_last_access(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_accessed())
    }

    // == Touch ==
    /// Records a successful retrieval at `now`.
    pub fn touch(&self, now: Instant, tracking: AccessTracking) {
        match tracking {
            AccessTracking::Reset => self.access_count.store(1, Ordering::Relaxed),
            AccessTracking::Increment => {
                self.access_count.fetch_add(1, Ordering::Relaxed);
            }
        }
        let offset = now.saturating_duration_since(self.created_at).as_nanos();
        let offset = u64::try_from(offset).unwrap_or(u64::MAX);
        // fetch_max keeps the timestamp monotonic when touches race
        self.last_access_offset_ns.fetch_max(offset, Ordering::Relaxed);
    }

    // == Eviction Score ==
    /// Higher means a better eviction candidate.
    ///
    /// Lower priority dominates (10 points per tier below Critical); age in
    /// hours, missing accesses below 10 and idle hours add on top.
    pub fn eviction_score(&self, now: Instant) -> f64 {
        let priority_term = f64::from(CachePriority::Critical.rank() - self.priority.rank()) * 10.0;
        let age_hours = self.age(now).as_secs_f64() / SECS_PER_HOUR;
        let frequency_term = 10u64.saturating_sub(self.access_count()) as f64;
        let idle_hours = self.time_since_last_access(now).as_secs_f64() / SECS_PER_HOUR;

        priority_term + age_hours + frequency_term + idle_hours
    }
}
