//! Cache Configuration Module
//!
//! Budgets and thresholds that drive cleanup.

use std::time::Duration;

use serde::Serialize;

use crate::cache::AccessTracking;
use crate::error::{CacheError, Result};

// == Defaults ==
pub const DEFAULT_MAX_ENTRIES: usize = 1000;
pub const DEFAULT_MAX_SIZE_BYTES: usize = 50 * 1024 * 1024;
pub const DEFAULT_CLEANUP_THRESHOLD: f64 = 0.8;
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(3600);
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Smallest byte budget accepted at runtime.
pub const MIN_CACHE_SIZE_BYTES: usize = 1024 * 1024;

/// Fraction of each budget that scored eviction trims down to.
pub const CLEANUP_TARGET_RATIO: f64 = 0.7;

// == Cache Config ==
/// Budgets and thresholds for one cache instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheConfig {
    /// Entry-count budget
    pub max_entries: usize,
    /// Byte budget
    pub max_size_bytes: usize,
    /// Fraction of either budget above which cleanup runs
    pub cleanup_threshold: f64,
    /// Entries older than this are dropped by the expire pass regardless of TTL
    pub max_age: Duration,
    pub access_tracking: AccessTracking,
}

impl CacheConfig {
    /// Rejects budgets that would make cleanup meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "max_entries must be greater than zero".to_string(),
            ));
        }
        if !(self.cleanup_threshold > 0.0 && self.cleanup_threshold <= 1.0) {
            return Err(CacheError::InvalidConfig(format!(
                "cleanup_threshold must be in (0, 1], got {}",
                self.cleanup_threshold
            )));
        }
        if self.max_age.is_zero() {
            return Err(CacheError::InvalidConfig(
                "max_age must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_max_size_bytes(mut self, max_size_bytes: usize) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    pub fn with_cleanup_threshold(mut self, cleanup_threshold: f64) -> Self {
        self.cleanup_threshold = cleanup_threshold;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_access_tracking(mut self, access_tracking: AccessTracking) -> Self {
        self.access_tracking = access_tracking;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            cleanup_threshold: DEFAULT_CLEANUP_THRESHOLD,
            max_age: DEFAULT_MAX_AGE,
            access_tracking: AccessTracking::Reset,
        }
    }
}
