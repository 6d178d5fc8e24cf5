//! Periodic Sweeper Task
//!
//! Background task that runs intelligent cleanup on a fixed period, so stale
//! entries go away even when the cache sees no traffic.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::IntelligentCache;

/// Spawns a background task that runs [`IntelligentCache::perform_cleanup`]
/// every `interval`.
///
/// # Returns
/// A JoinHandle for the spawned task; abort it to stop sweeping.
///
/// # Example
/// ```ignore
/// let cache = IntelligentCache::<String>::new(CacheConfig::default());
/// let sweeper = spawn_cleanup_task(cache.clone(), Duration::from_secs(300));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_cleanup_task<V>(cache: IntelligentCache<V>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("Starting cache sweeper with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            // Cleanup holds the blocking write lock; keep it off the worker
            let sweep = cache.clone();
            match tokio::task::spawn_blocking(move || sweep.perform_cleanup()).await {
                Ok(report) if report.removed() > 0 => {
                    info!(
                        "Periodic sweep: removed {} entries ({} bytes)",
                        report.removed(),
                        report.bytes_freed
                    );
                }
                Ok(_) => debug!("Periodic sweep: nothing to remove"),
                Err(err) => warn!("Periodic sweep failed: {}", err),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, CachePriority, ManualClock};
    use std::sync::Arc;

    fn test_cache() -> (IntelligentCache<String>, ManualClock) {
        let clock = ManualClock::new();
        let cache = IntelligentCache::with_clock(CacheConfig::default(), Arc::new(clock.clone()));
        (cache, clock)
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries() {
        let (cache, clock) = test_cache();
        cache.store("expire_soon", "value".to_string(), CachePriority::Low);
        cache.store("long_lived", "value".to_string(), CachePriority::Critical);
        clock.advance(Duration::from_secs(61));

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(!cache.contains_key("expire_soon"));
        assert!(cache.contains_key("long_lived"));
        assert_eq!(cache.statistics().eviction_count, 1);
        // Removed by the sweeper, not by a read
        assert_eq!(cache.statistics().miss_count, 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_preserves_valid_entries() {
        let (cache, _) = test_cache();
        cache.store("fresh", "value".to_string(), CachePriority::Normal);

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(cache.retrieve("fresh"), Some("value".to_string()));

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_waits_for_lock_off_the_runtime() {
        let (cache, _) = test_cache();
        let (locked_tx, locked_rx) = std::sync::mpsc::channel();
        let holder = {
            let cache = cache.clone();
            std::thread::spawn(move || {
                let _guard = cache.write_guard();
                locked_tx.send(()).unwrap();
                std::thread::sleep(Duration::from_millis(400));
            })
        };
        locked_rx.recv().unwrap();

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_millis(10));
        let started = std::time::Instant::now();
        tokio::time::sleep(Duration::from_millis(100)).await;

        // The single test worker stays free while the sweep waits on the lock
        assert!(started.elapsed() < Duration::from_millis(300));

        handle.abort();
        holder.join().unwrap();
    }

    #[tokio::test]
    async fn test_sweeper_can_be_aborted() {
        let (cache, _) = test_cache();

        let handle = spawn_cleanup_task(cache, Duration::from_secs(1));
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
