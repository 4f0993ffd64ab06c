//! Statistics for the cache.
//!
//! Atomic counters recorded by the 2Q state machine while it holds the
//! cache lock. Reading them never takes the lock.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for cache operations.
///
/// All counters are atomic and can be safely accessed from multiple threads.
/// Use `TwoQueueCache::stats()` to get a snapshot.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Number of get operations that found a live value.
    hits: AtomicU64,

    /// Number of get operations that found nothing (or an expired value).
    misses: AtomicU64,

    /// Entries moved from the recent queue to the frequent queue.
    promotions: AtomicU64,

    /// Returning keys admitted straight to the frequent queue from the ghost queue.
    ghost_hits: AtomicU64,

    /// Entries evicted from the recent queue.
    recent_evictions: AtomicU64,

    /// Entries evicted from the frequent queue.
    frequent_evictions: AtomicU64,

    /// Total number of set operations performed.
    sets: AtomicU64,

    /// Total number of delete operations performed.
    deletes: AtomicU64,
}

impl CacheStats {
    /// Create a new stats instance with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_promotion(&self) {
        self.promotions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ghost_hit(&self) {
        self.ghost_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_recent_eviction(&self) {
        self.recent_evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_frequent_eviction(&self) {
        self.frequent_evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    // Getters for reading statistics

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn promotions(&self) -> u64 {
        self.promotions.load(Ordering::Relaxed)
    }

    pub fn ghost_hits(&self) -> u64 {
        self.ghost_hits.load(Ordering::Relaxed)
    }

    pub fn recent_evictions(&self) -> u64 {
        self.recent_evictions.load(Ordering::Relaxed)
    }

    pub fn frequent_evictions(&self) -> u64 {
        self.frequent_evictions.load(Ordering::Relaxed)
    }

    /// Evictions from either value-holding queue.
    pub fn evictions(&self) -> u64 {
        self.recent_evictions() + self.frequent_evictions()
    }

    pub fn sets(&self) -> u64 {
        self.sets.load(Ordering::Relaxed)
    }

    pub fn deletes(&self) -> u64 {
        self.deletes.load(Ordering::Relaxed)
    }

    /// Calculate the hit rate as a percentage (0.0 to 100.0).
    /// Returns 0.0 if no lookups have been performed.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let misses = self.misses();
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }

    /// Create a snapshot of the counters combined with the queue lengths
    /// observed by the caller.
    pub fn snapshot(&self, lengths: QueueLengths) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits(),
            misses: self.misses(),
            promotions: self.promotions(),
            ghost_hits: self.ghost_hits(),
            recent_evictions: self.recent_evictions(),
            frequent_evictions: self.frequent_evictions(),
            sets: self.sets(),
            deletes: self.deletes(),
            hit_rate: self.hit_rate(),
            recent_len: lengths.recent,
            frequent_len: lengths.frequent,
            ghost_len: lengths.ghost,
        }
    }
}

/// Queue lengths captured under the cache lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueLengths {
    pub recent: usize,
    pub frequent: usize,
    pub ghost: usize,
}

/// A point-in-time snapshot of cache statistics.
///
/// Unlike `CacheStats`, this struct contains plain values (not atomics)
/// and can be easily logged or compared.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub promotions: u64,
    pub ghost_hits: u64,
    pub recent_evictions: u64,
    pub frequent_evictions: u64,
    pub sets: u64,
    pub deletes: u64,
    pub hit_rate: f64,
    pub recent_len: usize,
    pub frequent_len: usize,
    pub ghost_len: usize,
}

impl StatsSnapshot {
    /// Number of value-holding entries at snapshot time.
    pub fn size(&self) -> usize {
        self.recent_len + self.frequent_len
    }
}
