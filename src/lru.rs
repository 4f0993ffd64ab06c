//! Bounded, recency-ordered key/value store.
//!
//! This is the building block each of the three 2Q queues is made of.
//! Entries live in an `IndexMap`, which doubles as the hash index and the
//! node arena. Recency order is an index-linked list threaded through the
//! map's slots, so touching, removing and evicting are all O(1): removal
//! uses `swap_remove` and patches the links of the node that moved into
//! the vacated slot.

use indexmap::IndexMap;
use std::borrow::Borrow;
use std::hash::Hash;
use std::time::SystemTime;

use crate::entry::{now_seconds, Entry};

#[derive(Debug, Clone)]
struct Node<V> {
    entry: Entry<V>,
    /// Next older node.
    prev: Option<usize>,
    /// Next newer node.
    next: Option<usize>,
}

/// A capacity-bounded map that evicts its least recently touched entry on overflow.
///
/// Expired entries are treated as absent by [`get`](Self::get),
/// [`peek`](Self::peek) and [`exist`](Self::exist), which purge them on
/// sight. Nothing sweeps expired entries in the background.
///
/// A store with capacity zero retains nothing.
#[derive(Debug, Clone)]
pub struct LruStore<K, V> {
    map: IndexMap<K, Node<V>>,
    oldest: Option<usize>,
    newest: Option<usize>,
    capacity: usize,
}

impl<K, V> LruStore<K, V>
where
    K: Hash + Eq,
{
    /// Create an empty store that holds at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            map: IndexMap::new(),
            oldest: None,
            newest: None,
            capacity,
        }
    }

    /// Look up a live value and mark it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.live_index(key)?;
        self.touch(idx);
        Some(&self.map[idx].entry.value)
    }

    /// Look up a live value without changing recency order.
    pub fn peek<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.live_index(key)?;
        Some(&self.map[idx].entry.value)
    }

    /// Check whether a live entry exists for `key`. Does not touch.
    pub fn exist<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.live_index(key).is_some()
    }

    /// Read-only liveness check. Unlike [`exist`](Self::exist), an expired
    /// entry is left in place.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map
            .get(key)
            .is_some_and(|node| !node.entry.is_expired_at(now_seconds()))
    }

    /// Insert or overwrite `key` with no expiry and mark it most recently used.
    ///
    /// Returns the key evicted to make room, if any.
    pub fn set(&mut self, key: K, value: V) -> Option<K> {
        self.insert(key, Entry::new(value))
    }

    /// Insert or overwrite `key`, expiring at `expires` (truncated to the second).
    ///
    /// Returns the key evicted to make room, if any.
    pub fn set_with_expire(&mut self, key: K, value: V, expires: SystemTime) -> Option<K> {
        self.insert(key, Entry::with_expiration(value, expires))
    }

    /// Remove `key` whether or not it has expired.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.map.get_index_of(key)?;
        self.remove_index(idx).map(|(_, node)| node.entry.into_value())
    }

    /// Remove a live entry and hand back its owned key and value.
    ///
    /// Used to move an entry between stores without cloning the key.
    pub fn take<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.live_index(key)?;
        self.remove_index(idx)
            .map(|(key, node)| (key, node.entry.into_value()))
    }

    /// Evict the least recently touched entry, returning its key.
    pub fn delete_oldest(&mut self) -> Option<K> {
        let idx = self.oldest?;
        self.remove_index(idx).map(|(key, _)| key)
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.map.clear();
        self.oldest = None;
        self.newest = None;
    }

    /// Iterate keys from least to most recently touched.
    pub fn keys_oldest_first(&self) -> impl Iterator<Item = &K> + '_ {
        std::iter::successors(self.oldest, move |&idx| self.map[idx].next)
            .filter_map(move |idx| self.map.get_index(idx).map(|(key, _)| key))
    }

    // Private helper methods

    fn insert(&mut self, key: K, entry: Entry<V>) -> Option<K> {
        if let Some(idx) = self.map.get_index_of(&key) {
            self.map[idx].entry = entry;
            self.touch(idx);
            return None;
        }

        if self.capacity == 0 {
            return None;
        }

        // Make room before inserting so the store never exceeds capacity.
        let evicted = if self.map.len() >= self.capacity {
            self.delete_oldest()
        } else {
            None
        };

        let node = Node {
            entry,
            prev: None,
            next: None,
        };
        let (idx, _) = self.map.insert_full(key, node);
        self.link_newest(idx);
        evicted
    }

    /// Resolve `key` to a slot, purging it if it has expired.
    fn live_index<Q>(&mut self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.map.get_index_of(key)?;
        if self.map[idx].entry.is_expired_at(now_seconds()) {
            self.remove_index(idx);
            return None;
        }
        Some(idx)
    }

    fn touch(&mut self, idx: usize) {
        if self.newest != Some(idx) {
            self.unlink(idx);
            self.link_newest(idx);
        }
    }

    fn link_newest(&mut self, idx: usize) {
        let prev = self.newest;
        {
            let node = &mut self.map[idx];
            node.prev = prev;
            node.next = None;
        }
        match prev {
            Some(p) => self.map[p].next = Some(idx),
            None => self.oldest = Some(idx),
        }
        self.newest = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = &self.map[idx];
            (node.prev, node.next)
        };
        match prev {
            Some(p) => self.map[p].next = next,
            None => self.oldest = next,
        }
        match next {
            Some(n) => self.map[n].prev = prev,
            None => self.newest = prev,
        }
        let node = &mut self.map[idx];
        node.prev = None;
        node.next = None;
    }

    fn remove_index(&mut self, idx: usize) -> Option<(K, Node<V>)> {
        let last = self.map.len().checked_sub(1)?;
        self.unlink(idx);
        let removed = self.map.swap_remove_index(idx)?;

        if idx != last {
            // The former last slot now lives at `idx`; repoint its neighbours.
            let (prev, next) = {
                let moved = &self.map[idx];
                (moved.prev, moved.next)
            };
            match prev {
                Some(p) => self.map[p].next = Some(idx),
                None => self.oldest = Some(idx),
            }
            match next {
                Some(n) => self.map[n].prev = Some(idx),
                None => self.newest = Some(idx),
            }
        }

        Some(removed)
    }
}
