//! Cache Store Module
//!
//! Main cache engine: HashMap storage with a running byte total,
//! priority-derived TTL expiry and two-pass scored eviction.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::config::{CLEANUP_TARGET_RATIO, MIN_CACHE_SIZE_BYTES};
use crate::cache::{
    CacheConfig, CacheEntry, CachePriority, CacheStatistics, Clock, SizeProvider, StatsCollector,
};

// == Cleanup Report ==
/// What a cleanup run removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Entries dropped for being expired or older than `max_age`
    pub expired: usize,
    /// Entries dropped by scoring or by priority under memory pressure
    pub evicted: usize,
    pub bytes_freed: usize,
}

impl CleanupReport {
    pub fn removed(&self) -> usize {
        self.expired + self.evicted
    }
}

// == Lookup ==
/// Outcome of a lookup under shared access.
#[derive(Debug)]
pub enum Lookup<V> {
    Hit(V),
    Missing,
    /// Entry exists but has expired; removing it needs exclusive access.
    Expired,
}

// == Cache Store ==
/// Entry storage plus the eviction policy that keeps it within budget.
pub struct CacheStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Always equal to the sum of the live entries' sizes
    current_size_bytes: usize,
    config: CacheConfig,
    stats: StatsCollector,
    clock: Arc<dyn Clock>,
    size_of: SizeProvider<V>,
}

impl<V> fmt::Debug for CacheStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.entries.len())
            .field("current_size_bytes", &self.current_size_bytes)
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `config` - Budgets and thresholds
    /// * `clock` - Time source for expiry and scoring
    /// * `size_of` - Footprint estimate for each stored payload
    ///
    /// `max_size_bytes` is raised to the 1 MiB floor, as on every other path
    /// that sets a byte budget.
    pub fn new(mut config: CacheConfig, clock: Arc<dyn Clock>, size_of: SizeProvider<V>) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid cache config: {:?}", config);
        config.max_size_bytes = config.max_size_bytes.max(MIN_CACHE_SIZE_BYTES);
        Self {
            entries: HashMap::new(),
            current_size_bytes: 0,
            config,
            stats: StatsCollector::new(),
            clock,
            size_of,
        }
    }

    // == Store ==
    /// Inserts `value` under `key`, replacing any previous entry.
    ///
    /// Runs intelligent cleanup inline when the insert pushes the store over
    /// its cleanup threshold.
    pub fn store(&mut self, key: String, value: V, priority: CachePriority) {
        let now = self.clock.now();
        let size = (self.size_of)(&value);

        self.remove_entry(&key);
        debug!(key = %key, %priority, size, "storing cache entry");
        self.current_size_bytes += size;
        self.entries
            .insert(key.clone(), CacheEntry::new(key, value, priority, size, now));

        if self.should_perform_cleanup() {
            self.perform_intelligent_cleanup();
        }
    }

    // == Lookup ==
    /// Read-only half of a retrieval.
    ///
    /// Records the hit (and touches the entry) or the miss. Expired entries
    /// are reported without being counted so the caller can remove them
    /// under exclusive access via [`CacheStore::retrieve`].
    pub fn lookup(&self, key: &str) -> Lookup<V> {
        self.lookup_with(key, |value| Some(value.clone()))
    }

    /// Like [`CacheStore::lookup`], but hands back `extract(value)`.
    ///
    /// When `extract` yields `None` the payload is not what the caller
    /// wanted: the lookup counts as a miss and the entry is not touched.
    pub fn lookup_with<R, F>(&self, key: &str, extract: F) -> Lookup<R>
    where
        F: FnOnce(&V) -> Option<R>,
    {
        let now = self.clock.now();
        match self.entries.get(key) {
            Some(entry) if entry.is_expired(now) => Lookup::Expired,
            Some(entry) => match extract(&entry.value) {
                Some(found) => {
                    entry.touch(now, self.config.access_tracking);
                    self.stats.record_hit();
                    Lookup::Hit(found)
                }
                None => {
                    self.stats.record_miss();
                    Lookup::Missing
                }
            },
            None => {
                self.stats.record_miss();
                Lookup::Missing
            }
        }
    }

    // == Retrieve ==
    /// Returns a copy of the payload under `key`.
    ///
    /// Missing and expired keys count as misses; expired entries are removed.
    pub fn retrieve(&mut self, key: &str) -> Option<V> {
        self.retrieve_with(key, |value| Some(value.clone()))
    }

    /// Exclusive-access form of [`CacheStore::lookup_with`].
    pub fn retrieve_with<R, F>(&mut self, key: &str, extract: F) -> Option<R>
    where
        F: FnOnce(&V) -> Option<R>,
    {
        match self.lookup_with(key, extract) {
            Lookup::Hit(found) => Some(found),
            Lookup::Missing => None,
            Lookup::Expired => {
                if let Some(entry) = self.remove_entry(key) {
                    debug!(key = %key, priority = %entry.priority, "dropped expired entry on read");
                }
                self.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Deletes the entry under `key`. Returns whether one existed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Clear All ==
    /// Drops every entry and resets all counters.
    pub fn clear_all(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.current_size_bytes = 0;
        self.stats.reset();
        info!(dropped, "cache cleared");
    }

    // == Statistics ==
    pub fn statistics(&self) -> CacheStatistics {
        self.stats.snapshot(self.entries.len(), self.current_size_bytes)
    }

    // == Cleanup Trigger ==
    /// True when either the entry count or the byte total is above the
    /// cleanup threshold.
    pub fn should_perform_cleanup(&self) -> bool {
        let threshold = self.config.cleanup_threshold;
        exceeds(self.entries.len(), self.config.max_entries, threshold)
            || exceeds(self.current_size_bytes, self.config.max_size_bytes, threshold)
    }

    // == Intelligent Cleanup ==
    /// Two-pass cleanup.
    ///
    /// 1. Drop every expired entry and every entry older than `max_age`.
    /// 2. If still over threshold, drop entries in descending eviction score
    ///    until both budgets are at or below 70%.
    pub fn perform_intelligent_cleanup(&mut self) -> CleanupReport {
        let now = self.clock.now();
        let mut report = CleanupReport::default();

        let (expired, expired_bytes) = self.expire_pass(now);
        report.expired = expired;
        report.bytes_freed += expired_bytes;

        if self.should_perform_cleanup() {
            let (evicted, evicted_bytes) = self.score_pass(now);
            report.evicted = evicted;
            report.bytes_freed += evicted_bytes;
        }

        self.finish_cleanup("intelligent cleanup", report)
    }

    // == Memory Warning ==
    /// Aggressive cleanup for low-memory conditions: drops every Low entry,
    /// then everything expired, regardless of thresholds.
    pub fn handle_memory_warning(&mut self) -> CleanupReport {
        let now = self.clock.now();
        let mut report = CleanupReport::default();

        let low_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.priority == CachePriority::Low)
            .map(|(key, _)| key.clone())
            .collect();
        for key in low_keys {
            if let Some(entry) = self.remove_entry(&key) {
                report.evicted += 1;
                report.bytes_freed += entry.size;
            }
        }

        let (expired, expired_bytes) = self.expire_pass(now);
        report.expired = expired;
        report.bytes_freed += expired_bytes;

        self.finish_cleanup("memory warning cleanup", report)
    }

    // == Set Cache Size ==
    /// Changes the byte budget, floored at 1 MiB, and cleans up right away if
    /// the store now holds more bytes than the new limit.
    pub fn set_cache_size(&mut self, bytes: usize) -> Option<CleanupReport> {
        self.config.max_size_bytes = bytes.max(MIN_CACHE_SIZE_BYTES);
        info!(max_size_bytes = self.config.max_size_bytes, "cache size limit updated");
        self.cleanup_if_over_budget()
    }

    // == Set Configuration ==
    /// Replaces the whole configuration, keeping the 1 MiB byte floor, and
    /// cleans up right away if either budget is now exceeded.
    pub fn set_configuration(&mut self, mut config: CacheConfig) -> Option<CleanupReport> {
        config.max_size_bytes = config.max_size_bytes.max(MIN_CACHE_SIZE_BYTES);
        self.config = config;
        self.cleanup_if_over_budget()
    }

    pub fn configuration(&self) -> &CacheConfig {
        &self.config
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn priority_of(&self, key: &str) -> Option<CachePriority> {
        self.entries.get(key).map(|entry| entry.priority)
    }

    pub fn access_count_of(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|entry| entry.access_count())
    }

    pub fn current_size_bytes(&self) -> usize {
        self.current_size_bytes
    }

    /// Recomputes the byte total from the live entries.
    pub fn sum_of_entry_sizes(&self) -> usize {
        self.entries.values().map(|entry| entry.size).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Internals ==
    /// Cleanup after a budget change. Only a store past 100% of a budget is
    /// trimmed; one between the trigger and the limit is left alone.
    fn cleanup_if_over_budget(&mut self) -> Option<CleanupReport> {
        let over_budget = self.entries.len() > self.config.max_entries
            || self.current_size_bytes > self.config.max_size_bytes;
        if over_budget {
            Some(self.perform_intelligent_cleanup())
        } else {
            None
        }
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.current_size_bytes -= entry.size;
        Some(entry)
    }

    /// Drops expired and over-age entries. Returns (count, bytes).
    fn expire_pass(&mut self, now: Instant) -> (usize, usize) {
        let max_age = self.config.max_age;
        let dead: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now) || entry.age(now) > max_age)
            .map(|(key, _)| key.clone())
            .collect();

        let mut bytes = 0;
        for key in &dead {
            if let Some(entry) = self.remove_entry(key) {
                bytes += entry.size;
            }
        }
        (dead.len(), bytes)
    }

    /// Drops highest-scored entries until both budgets are within target.
    /// Returns (count, bytes).
    fn score_pass(&mut self, now: Instant) -> (usize, usize) {
        let mut candidates: Vec<(f64, Instant, String)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.eviction_score(now), entry.last_accessed(), key.clone()))
            .collect();
        // Highest score first; ties go to the longest idle, then by key
        candidates.sort_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then_with(|| a.1.cmp(&b.1))
                .then_with(|| a.2.cmp(&b.2))
        });

        let mut removed = 0;
        let mut bytes = 0;
        for (_, _, key) in candidates {
            if self.within_target() {
                break;
            }
            if let Some(entry) = self.remove_entry(&key) {
                removed += 1;
                bytes += entry.size;
            }
        }
        (removed, bytes)
    }

    fn within_target(&self) -> bool {
        !exceeds(self.entries.len(), self.config.max_entries, CLEANUP_TARGET_RATIO)
            && !exceeds(
                self.current_size_bytes,
                self.config.max_size_bytes,
                CLEANUP_TARGET_RATIO,
            )
    }

    fn finish_cleanup(&self, kind: &'static str, report: CleanupReport) -> CleanupReport {
        self.stats.record_evictions(report.removed());
        if report.removed() > 0 {
            info!(
                expired = report.expired,
                evicted = report.evicted,
                bytes_freed = report.bytes_freed,
                remaining = self.entries.len(),
                "{} removed {} entries",
                kind,
                report.removed()
            );
        } else {
            debug!("{}: nothing to remove", kind);
        }
        report
    }
}

/// `value > limit * ratio`, compared in floating point.
fn exceeds(value: usize, limit: usize, ratio: f64) -> bool {
    value as f64 > limit as f64 * ratio
}
