//! Shared Cache Module
//!
//! Thread-safe handle around a [`CacheStore`].
//!
//! Mutations take the write lock and serialize. Retrievals take the read
//! lock, so they overlap each other but never a mutation; a hit records its
//! access bookkeeping inside that same read section. Only an expired hit
//! escalates to the write lock, where the key is examined again before
//! anything is removed.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::task::JoinHandle;

use crate::cache::store::Lookup;
use crate::cache::{
    trait_size_provider, CacheConfig, CachePriority, CacheStatistics, CacheStore, CleanupReport,
    Clock, EstimateSize, SizeProvider, SystemClock,
};

// == Intelligent Cache ==
/// Cloneable handle to one shared cache instance.
pub struct IntelligentCache<V> {
    inner: Arc<RwLock<CacheStore<V>>>,
}

impl<V> Clone for IntelligentCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> fmt::Debug for IntelligentCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntelligentCache")
            .field("store", &*self.inner.read())
            .finish()
    }
}

impl<V> IntelligentCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates a cache on the system clock, sizing payloads by their
    /// [`EstimateSize`] impl.
    pub fn new(config: CacheConfig) -> Self
    where
        V: EstimateSize,
    {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self
    where
        V: EstimateSize,
    {
        Self::with_size_provider(config, clock, trait_size_provider())
    }

    /// Creates a cache whose payload sizes come from `size_of`.
    pub fn with_size_provider(
        config: CacheConfig,
        clock: Arc<dyn Clock>,
        size_of: SizeProvider<V>,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheStore::new(config, clock, size_of))),
        }
    }

    // == Store ==
    /// Stores `value` under `key`. May evict other entries before returning.
    pub fn store(&self, key: impl Into<String>, value: V, priority: CachePriority) {
        self.inner.write().store(key.into(), value, priority);
    }

    /// Queues a store on tokio's blocking pool and returns immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn store_detached(
        &self,
        key: impl Into<String>,
        value: V,
        priority: CachePriority,
    ) -> JoinHandle<()> {
        let cache = self.clone();
        let key = key.into();
        tokio::task::spawn_blocking(move || cache.store(key, value, priority))
    }

    // == Retrieve ==
    /// Returns a copy of the payload under `key`, or `None` on a miss.
    pub fn retrieve(&self, key: &str) -> Option<V> {
        self.retrieve_with(key, |value| Some(value.clone()))
    }

    /// Retrieves the part of the payload `extract` picks out.
    ///
    /// A payload `extract` rejects is reported as a miss and left untouched.
    pub fn retrieve_with<R, F>(&self, key: &str, extract: F) -> Option<R>
    where
        F: Fn(&V) -> Option<R>,
    {
        {
            let store = self.inner.read();
            match store.lookup_with(key, &extract) {
                Lookup::Hit(found) => return Some(found),
                Lookup::Missing => return None,
                Lookup::Expired => {}
            }
        }
        // The key may have been replaced or removed since the read lock was
        // released; retrieve looks again under the write lock
        self.inner.write().retrieve_with(key, &extract)
    }

    pub fn remove(&self, key: &str) -> bool {
        self.inner.write().remove(key)
    }

    pub fn clear_all(&self) {
        self.inner.write().clear_all();
    }

    pub fn statistics(&self) -> CacheStatistics {
        self.inner.read().statistics()
    }

    // == Cleanup ==
    /// Runs the two-pass intelligent cleanup now.
    pub fn perform_cleanup(&self) -> CleanupReport {
        self.inner.write().perform_intelligent_cleanup()
    }

    /// Drops every Low entry and everything expired.
    pub fn handle_memory_warning(&self) -> CleanupReport {
        self.inner.write().handle_memory_warning()
    }

    pub fn should_perform_cleanup(&self) -> bool {
        self.inner.read().should_perform_cleanup()
    }

    // == Configuration ==
    pub fn set_cache_size(&self, bytes: usize) -> Option<CleanupReport> {
        self.inner.write().set_cache_size(bytes)
    }

    pub fn set_configuration(&self, config: CacheConfig) -> Option<CleanupReport> {
        self.inner.write().set_configuration(config)
    }

    pub fn configuration(&self) -> CacheConfig {
        self.inner.read().configuration().clone()
    }

    /// Holds the write lock for the guard's lifetime.
    #[cfg(test)]
    pub(crate) fn write_guard(&self) -> parking_lot::RwLockWriteGuard<'_, CacheStore<V>> {
        self.inner.write()
    }

    // == Introspection ==
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.read().contains_key(key)
    }

    pub fn priority_of(&self, key: &str) -> Option<CachePriority> {
        self.inner.read().priority_of(key)
    }

    pub fn access_count_of(&self, key: &str) -> Option<u64> {
        self.inner.read().access_count_of(key)
    }

    pub fn current_size_bytes(&self) -> usize {
        self.inner.read().current_size_bytes()
    }

    /// Byte total recomputed from live entries; equals
    /// [`IntelligentCache::current_size_bytes`] whenever no write is in flight.
    pub fn sum_of_entry_sizes(&self) -> usize {
        self.inner.read().sum_of_entry_sizes()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use std::thread;
    use std::time::Duration;

    fn test_cache() -> (IntelligentCache<String>, ManualClock) {
        let clock = ManualClock::new();
        let cache = IntelligentCache::with_clock(CacheConfig::default(), Arc::new(clock.clone()));
        (cache, clock)
    }

    #[test]
    fn test_clones_share_state() {
        let (cache, _) = test_cache();
        let other = cache.clone();

        cache.store("k", "v".to_string(), CachePriority::Normal);

        assert_eq!(other.retrieve("k"), Some("v".to_string()));
    }

    #[test]
    fn test_expired_retrieve_escalates_and_removes() {
        let (cache, clock) = test_cache();
        cache.store("k", "v".to_string(), CachePriority::Low);

        clock.advance(Duration::from_secs(61));

        assert_eq!(cache.retrieve("k"), None);
        assert!(!cache.contains_key("k"));
        let stats = cache.statistics();
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.total_size_bytes, 0);
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let (cache, _) = test_cache();
        for i in 0..50 {
            cache.store(format!("key{}", i), format!("value{}", i), CachePriority::Normal);
        }

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..200 {
                        let key = format!("key{}", i % 50);
                        if t % 2 == 0 {
                            let _ = cache.retrieve(&key);
                        } else {
                            cache.store(key, format!("value{}-{}", t, i), CachePriority::High);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = cache.statistics();
        assert_eq!(stats.hit_count + stats.miss_count, 4 * 200);
        assert_eq!(cache.current_size_bytes(), cache.sum_of_entry_sizes());
        assert_eq!(cache.len(), 50);
    }

    #[tokio::test]
    async fn test_store_detached() {
        let (cache, _) = test_cache();

        cache
            .store_detached("k", "v".to_string(), CachePriority::Critical)
            .await
            .unwrap();

        assert_eq!(cache.priority_of("k"), Some(CachePriority::Critical));
        assert_eq!(cache.retrieve("k"), Some("v".to_string()));
    }
}
