//! The 2Q admission and eviction state machine.
//!
//! Three bounded stores make up the policy:
//!
//! - `recent` holds entries seen once, in insertion/touch order.
//! - `frequent` holds entries seen at least twice, in touch order.
//! - `ghost` remembers the keys (not values) of entries evicted from `recent`.
//!
//! Both value-holding stores are bounded by the overall capacity. The
//! recent queue's share, `recent_size`, is only a target consulted when a
//! victim is chosen; it is never the recent store's hard bound. Space is
//! made before every insertion that can grow `recent + frequent`.
//!
//! `TwoQueue` is not synchronized. [`TwoQueueCache`](crate::TwoQueueCache)
//! wraps it in a single mutex.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::SystemTime;

use tracing::{debug, trace};

use crate::config::TwoQueueConfig;
use crate::lru::LruStore;
use crate::stats::{CacheStats, QueueLengths};

/// Which of the three queues currently holds a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Seen once since admission.
    Recent,
    /// Seen at least twice.
    Frequent,
    /// Evicted from the recent queue; only the key is remembered.
    Ghost,
}

/// Unsynchronized 2Q cache state.
#[derive(Debug)]
pub struct TwoQueue<K, V> {
    capacity: usize,
    recent_size: usize,
    recent: LruStore<K, V>,
    frequent: LruStore<K, V>,
    ghost: LruStore<K, ()>,
    stats: Arc<CacheStats>,
}

impl<K, V> TwoQueue<K, V>
where
    K: Hash + Eq,
{
    /// Build the three stores from a validated configuration.
    pub fn new(config: &TwoQueueConfig, stats: Arc<CacheStats>) -> Self {
        Self {
            capacity: config.capacity(),
            recent_size: config.recent_size(),
            recent: LruStore::new(config.capacity()),
            frequent: LruStore::new(config.capacity()),
            ghost: LruStore::new(config.ghost_capacity()),
            stats,
        }
    }

    /// Look up `key`, promoting it to the frequent queue if it was only seen once.
    ///
    /// Misses are not remembered.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        if let Some(value) = self.frequent.get(key) {
            self.stats.record_hit();
            return Some(value.clone());
        }

        // A second observation moves the entry out of `recent` without
        // any eviction bookkeeping: the total size does not change.
        if let Some((owned, value)) = self.recent.take(key) {
            self.stats.record_hit();
            self.stats.record_promotion();
            self.admit_frequent(owned, value.clone());
            return Some(value);
        }

        self.stats.record_miss();
        None
    }

    /// Insert or update `key`.
    pub fn set(&mut self, key: K, value: V) {
        self.stats.record_set();

        if self.frequent.exist(&key) {
            self.admit_frequent(key, value);
            return;
        }

        // Updating a once-seen entry counts as its second observation.
        if self.recent.take(&key).is_some() {
            self.stats.record_promotion();
            self.admit_frequent(key, value);
            return;
        }

        // The key was evicted from `recent` and came back: skip straight to `frequent`.
        if self.ghost.exist(&key) {
            self.ensure_space(true);
            self.ghost.delete(&key);
            self.stats.record_ghost_hit();
            debug!(
                frequent_len = self.frequent.len(),
                "ghost key re-admitted to frequent queue"
            );
            self.admit_frequent(key, value);
            return;
        }

        self.ensure_space(false);
        self.recent.set(key, value);
    }

    /// Insert or update `key` with an expiry instant.
    ///
    /// Frequent entries are overwritten without an expiry. Anything else
    /// lands in the recent queue, bounded only by that store's own
    /// capacity. The ghost queue is neither consulted nor updated, so a
    /// returning key is not fast-tracked to the frequent queue on this path.
    pub fn set_with_expire(&mut self, key: K, value: V, expires: SystemTime) {
        self.stats.record_set();

        if self.frequent.exist(&key) {
            self.admit_frequent(key, value);
            return;
        }

        if self.recent.set_with_expire(key, value, expires).is_some() {
            self.stats.record_recent_eviction();
            trace!("recent queue dropped its oldest entry on an expiring insert");
        }
    }

    /// Remove `key` from all three queues. Absent keys are ignored.
    pub fn delete<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let in_frequent = self.frequent.delete(key).is_some();
        let in_recent = self.recent.delete(key).is_some();
        let in_ghost = self.ghost.delete(key).is_some();

        if in_frequent || in_recent || in_ghost {
            self.stats.record_delete();
        }
    }

    /// Empty all three queues.
    pub fn clear(&mut self) {
        self.recent.clear();
        self.frequent.clear();
        self.ghost.clear();
        debug!("cleared all queues");
    }

    /// Whether `key` holds a live value. Does not promote or touch.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.frequent.contains(key) || self.recent.contains(key)
    }

    /// Report which queue holds `key`. A value-holding queue wins over the ghost queue.
    pub fn segment_of<Q>(&self, key: &Q) -> Option<Segment>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.frequent.contains(key) {
            Some(Segment::Frequent)
        } else if self.recent.contains(key) {
            Some(Segment::Recent)
        } else if self.ghost.contains(key) {
            Some(Segment::Ghost)
        } else {
            None
        }
    }

    /// Keys of one queue, least recently touched first.
    pub fn keys(&self, segment: Segment) -> Vec<K>
    where
        K: Clone,
    {
        match segment {
            Segment::Recent => self.recent.keys_oldest_first().cloned().collect(),
            Segment::Frequent => self.frequent.keys_oldest_first().cloned().collect(),
            Segment::Ghost => self.ghost.keys_oldest_first().cloned().collect(),
        }
    }

    pub fn lengths(&self) -> QueueLengths {
        QueueLengths {
            recent: self.recent.len(),
            frequent: self.frequent.len(),
            ghost: self.ghost.len(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn recent_size(&self) -> usize {
        self.recent_size
    }

    pub fn ghost_capacity(&self) -> usize {
        self.ghost.capacity()
    }

    // Private helper methods

    fn admit_frequent(&mut self, key: K, value: V) {
        if self.frequent.set(key, value).is_some() {
            self.stats.record_frequent_eviction();
        }
    }

    /// Evict until one more value-holding entry fits.
    fn ensure_space(&mut self, ghost_reentry: bool) {
        while self.recent.len() + self.frequent.len() >= self.capacity {
            if !self.evict_one(ghost_reentry) {
                break;
            }
        }
    }

    /// Pick one victim. Returns `false` when both value-holding queues are empty.
    fn evict_one(&mut self, ghost_reentry: bool) -> bool {
        let recent_len = self.recent.len();

        // At exactly the target, a ghost re-entry pushes pressure onto
        // `frequent`: the incoming key bypasses `recent` anyway.
        let over_target = recent_len > self.recent_size
            || (recent_len == self.recent_size && !ghost_reentry);

        if recent_len > 0 && over_target {
            return self.evict_recent();
        }

        match self.frequent.delete_oldest() {
            Some(_) => {
                self.stats.record_frequent_eviction();
                trace!(
                    frequent_len = self.frequent.len(),
                    "evicted oldest frequent entry"
                );
                true
            }
            // Only reachable when `recent` fills the whole capacity.
            None => self.evict_recent(),
        }
    }

    fn evict_recent(&mut self) -> bool {
        match self.recent.delete_oldest() {
            Some(evicted) => {
                self.ghost.set(evicted, ());
                self.stats.record_recent_eviction();
                trace!(
                    recent_len = self.recent.len(),
                    ghost_len = self.ghost.len(),
                    "evicted oldest recent entry to ghost queue"
                );
                true
            }
            None => false,
        }
    }
}
