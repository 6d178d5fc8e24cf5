//! Cache Statistics Module
//!
//! Tracks hits, misses and evictions, and produces point-in-time snapshots.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Stats Collector ==
/// Running counters. Atomic so hits and misses can be recorded under a
/// shared lock.
#[derive(Debug, Default)]
pub struct StatsCollector {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evictions(&self, count: usize) {
        if count > 0 {
            self.evictions.fetch_add(count as u64, Ordering::Relaxed);
        }
    }

    /// Sets every counter back to zero.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Combines the counters with the store's current occupancy.
    pub fn snapshot(&self, entry_count: usize, total_size_bytes: usize) -> CacheStatistics {
        CacheStatistics::new(
            entry_count,
            total_size_bytes,
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            self.evictions.load(Ordering::Relaxed),
        )
    }
}

// == Cache Statistics ==
/// Read-only snapshot of cache occupancy and counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatistics {
    pub entry_count: usize,
    pub total_size_bytes: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    pub eviction_count: u64,
    /// hits / (hits + misses), or 0.0 before any lookup
    pub hit_rate: f64,
    /// total_size_bytes / entry_count, or 0 when empty
    pub average_entry_size: usize,
}

impl CacheStatistics {
    pub fn new(
        entry_count: usize,
        total_size_bytes: usize,
        hit_count: u64,
        miss_count: u64,
        eviction_count: u64,
    ) -> Self {
        let lookups = hit_count + miss_count;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            hit_count as f64 / lookups as f64
        };
        let average_entry_size = if entry_count == 0 {
            0
        } else {
            total_size_bytes / entry_count
        };

        Self {
            entry_count,
            total_size_bytes,
            hit_count,
            miss_count,
            eviction_count,
            hit_rate,
            average_entry_size,
        }
    }
}
