//! The main cache interface.
//!
//! This module provides the primary `TwoQueueCache` type that users interact
//! with. It wraps the 2Q state machine in a single mutex and provides a
//! clean, thread-safe API.

use parking_lot::Mutex;
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::config::TwoQueueConfig;
use crate::error::CacheResult;
use crate::stats::{CacheStats, StatsSnapshot};
use crate::two_queue::{Segment, TwoQueue};

/// A thread-safe, scan-resistant 2Q cache.
///
/// Every operation, including [`get`](Self::get), runs under one exclusive
/// lock: a hit on a once-seen entry promotes it, so reads mutate state.
///
/// # Example
/// ```
/// use two_queue_cache::TwoQueueCache;
///
/// let cache = TwoQueueCache::new(1000).unwrap();
///
/// cache.set("user:123", "Alice");
/// assert_eq!(cache.get("user:123"), Some("Alice"));
///
/// cache.delete("user:123");
/// assert_eq!(cache.get("user:123"), None);
/// ```
#[derive(Debug)]
pub struct TwoQueueCache<K, V> {
    inner: Arc<Mutex<TwoQueue<K, V>>>,
    config: TwoQueueConfig,
    stats: Arc<CacheStats>,
}

// Manual impl: cloning a handle must not require `K: Clone` or `V: Clone`.
impl<K, V> Clone for TwoQueueCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config.clone(),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<K, V> TwoQueueCache<K, V>
where
    K: Hash + Eq,
{
    /// Create a cache with the default ratios (recent 0.25, ghost 0.50).
    ///
    /// Fails if `capacity` is zero.
    pub fn new(capacity: usize) -> CacheResult<Self> {
        Ok(Self::from_config(TwoQueueConfig::new(capacity).build()?))
    }

    /// Create a cache with explicit ratios.
    ///
    /// # Example
    /// ```
    /// use two_queue_cache::TwoQueueCache;
    ///
    /// let cache = TwoQueueCache::<u64, u64>::with_params(100, 0.1, 0.5).unwrap();
    /// assert_eq!(cache.recent_size(), 10);
    /// assert!(TwoQueueCache::<u64, u64>::with_params(100, 1.5, 0.5).is_err());
    /// ```
    pub fn with_params(capacity: usize, recent_ratio: f64, ghost_ratio: f64) -> CacheResult<Self> {
        let config = TwoQueueConfig::new(capacity)
            .recent_ratio(recent_ratio)
            .ghost_ratio(ghost_ratio)
            .build()?;
        Ok(Self::from_config(config))
    }

    /// Create a cache from a configuration returned by
    /// [`TwoQueueConfig::build`].
    pub fn from_config(config: TwoQueueConfig) -> Self {
        let stats = Arc::new(CacheStats::new());
        let queue = TwoQueue::new(&config, Arc::clone(&stats));
        Self {
            inner: Arc::new(Mutex::new(queue)),
            config,
            stats,
        }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key is absent or its entry has expired. A hit on
    /// an entry seen only once promotes it to the frequent queue.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key)
    }

    /// Set a value in the cache.
    ///
    /// New keys enter the recent queue. Keys already cached, or remembered
    /// as ghosts, go to the frequent queue.
    pub fn set(&self, key: K, value: V) {
        self.inner.lock().set(key, value);
    }

    /// Set a value that expires at `expires`, truncated to the whole second.
    ///
    /// A key already in the frequent queue is overwritten and keeps no
    /// expiry. Otherwise the entry goes to the recent queue, even if the key
    /// is remembered as a ghost.
    ///
    /// # Example
    /// ```
    /// use std::time::{Duration, SystemTime};
    /// use two_queue_cache::TwoQueueCache;
    ///
    /// let cache = TwoQueueCache::new(10).unwrap();
    /// cache.set_with_expire("session", "data", SystemTime::now() + Duration::from_secs(3600));
    /// assert_eq!(cache.get("session"), Some("data"));
    /// ```
    pub fn set_with_expire(&self, key: K, value: V, expires: SystemTime) {
        self.inner.lock().set_with_expire(key, value, expires);
    }

    /// Set a value that expires `ttl` from now. See [`set_with_expire`](Self::set_with_expire).
    pub fn set_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.set_with_expire(key, value, SystemTime::now() + ttl);
    }

    /// Remove a key from all queues, ghost included. Absent keys are ignored.
    pub fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().delete(key);
    }

    /// Remove all entries and ghosts.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Check if a live value is cached for `key`.
    ///
    /// Unlike `get`, this never promotes or reorders anything.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    /// Report which queue currently holds `key`, without touching it.
    pub fn segment_of<Q>(&self, key: &Q) -> Option<Segment>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().segment_of(key)
    }

    /// Keys held by one queue, least recently touched first.
    pub fn keys(&self, segment: Segment) -> Vec<K>
    where
        K: Clone,
    {
        self.inner.lock().keys(segment)
    }

    /// Number of value-holding entries (recent + frequent).
    ///
    /// Note: This may include expired entries that haven't been purged yet.
    pub fn len(&self) -> usize {
        let lengths = self.inner.lock().lengths();
        lengths.recent + lengths.frequent
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn recent_len(&self) -> usize {
        self.inner.lock().lengths().recent
    }

    pub fn frequent_len(&self) -> usize {
        self.inner.lock().lengths().frequent
    }

    pub fn ghost_len(&self) -> usize {
        self.inner.lock().lengths().ghost
    }

    /// Maximum number of value-holding entries.
    pub fn capacity(&self) -> usize {
        self.config.capacity()
    }

    /// Target size of the recent queue.
    pub fn recent_size(&self) -> usize {
        self.config.recent_size()
    }

    /// Maximum number of remembered ghost keys.
    pub fn ghost_capacity(&self) -> usize {
        self.config.ghost_capacity()
    }

    pub fn config(&self) -> &TwoQueueConfig {
        &self.config
    }

    /// Get a snapshot of the counters and queue lengths.
    ///
    /// # Example
    /// ```
    /// use two_queue_cache::TwoQueueCache;
    ///
    /// let cache = TwoQueueCache::new(10).unwrap();
    /// cache.set("key", "value");
    /// let _ = cache.get("key");        // Hit, promotes
    /// let _ = cache.get("missing");    // Miss
    ///
    /// let stats = cache.stats();
    /// assert_eq!((stats.hits, stats.misses, stats.promotions), (1, 1, 1));
    /// assert_eq!(stats.frequent_len, 1);
    /// ```
    pub fn stats(&self) -> StatsSnapshot {
        let lengths = self.inner.lock().lengths();
        self.stats.snapshot(lengths)
    }

    /// Get a reference to the internal statistics counter.
    ///
    /// This is useful for integrating with external metrics systems.
    pub fn stats_ref(&self) -> Arc<CacheStats> {
        Arc::clone(&self.stats)
    }
}
