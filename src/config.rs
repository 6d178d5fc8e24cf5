//! Configuration Module
//!
//! Loads service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::config::{
    DEFAULT_CLEANUP_INTERVAL, DEFAULT_CLEANUP_THRESHOLD, DEFAULT_MAX_AGE, DEFAULT_MAX_ENTRIES,
    DEFAULT_MAX_SIZE_BYTES, MIN_CACHE_SIZE_BYTES,
};
use crate::cache::{AccessTracking, CacheConfig};
use crate::error::{CacheError, Result};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Entry-count budget
    pub max_entries: usize,
    /// Byte budget
    pub max_size_bytes: usize,
    /// Fraction of either budget above which cleanup runs
    pub cleanup_threshold: f64,
    /// Maximum entry age in seconds, regardless of priority
    pub max_age: u64,
    /// Periodic sweep interval in seconds
    pub cleanup_interval: u64,
    pub access_tracking: AccessTracking,
    /// Admin HTTP port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Entry budget (default: 1000)
    /// - `MAX_SIZE_BYTES` - Byte budget (default: 52428800)
    /// - `CLEANUP_THRESHOLD` - Cleanup trigger fraction (default: 0.8)
    /// - `MAX_AGE` - Maximum entry age in seconds (default: 3600)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 300)
    /// - `ACCESS_TRACKING` - `reset` or `increment` (default: reset)
    /// - `SERVER_PORT` - Admin HTTP port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            max_size_bytes: env_or("MAX_SIZE_BYTES", defaults.max_size_bytes),
            cleanup_threshold: env_or("CLEANUP_THRESHOLD", defaults.cleanup_threshold),
            max_age: env_or("MAX_AGE", defaults.max_age),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            access_tracking: env_or("ACCESS_TRACKING", defaults.access_tracking),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    /// Cache settings derived from this configuration, validated.
    ///
    /// Also rejects a zero sweep interval, and raises the byte budget to the
    /// 1 MiB floor.
    pub fn cache_config(&self) -> Result<CacheConfig> {
        if self.cleanup_interval == 0 {
            return Err(CacheError::InvalidConfig(
                "cleanup_interval must be at least one second".to_string(),
            ));
        }

        let config = CacheConfig {
            max_entries: self.max_entries,
            max_size_bytes: self.max_size_bytes.max(MIN_CACHE_SIZE_BYTES),
            cleanup_threshold: self.cleanup_threshold,
            max_age: Duration::from_secs(self.max_age),
            access_tracking: self.access_tracking,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            cleanup_threshold: DEFAULT_CLEANUP_THRESHOLD,
            max_age: DEFAULT_MAX_AGE.as_secs(),
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL.as_secs(),
            access_tracking: AccessTracking::Reset,
            server_port: 3000,
        }
    }
}

/// Parses `name` from the environment, falling back to `default` when unset
/// or unparseable.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
