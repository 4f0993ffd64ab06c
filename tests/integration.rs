//! Integration tests for the cache library.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

use two_queue_cache::{CacheError, Segment, TwoQueueCache, TwoQueueConfig};

fn numbered() -> Vec<(String, String)> {
    [
        ("1", "one"),
        ("2", "two"),
        ("3", "three"),
        ("4", "four"),
        ("5", "five"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[test]
fn test_basic_workflow() {
    let cache = TwoQueueCache::new(16).unwrap();

    assert!(cache.is_empty());
    assert_eq!(cache.len(), 0);

    cache.set("key1".to_string(), "value1".to_string());
    assert_eq!(cache.len(), 1);
    assert!(!cache.is_empty());

    assert_eq!(cache.get("key1"), Some("value1".to_string()));
    assert!(cache.contains("key1"));
    assert!(!cache.contains("nonexistent"));

    cache.delete("key1");
    assert!(!cache.contains("key1"));

    cache.set("a".to_string(), "1".to_string());
    cache.set("b".to_string(), "2".to_string());
    cache.set("c".to_string(), "3".to_string());
    assert_eq!(cache.len(), 3);
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_literal_two_queue_scenario() {
    let cache = TwoQueueCache::new(4).unwrap();

    for (k, v) in numbered() {
        cache.set(k, v);
    }

    // "1" was already pushed out to the ghost queue by "5"
    assert_eq!(cache.get("1"), None);
    assert_eq!(cache.get("2"), Some("two".to_string()));
    assert_eq!(cache.get("2"), Some("two".to_string()));
    assert_eq!(cache.segment_of("2"), Some(Segment::Frequent));

    assert_eq!(cache.get("5"), Some("five".to_string()));

    // Room for "6" comes out of the recent queue, oldest first
    cache.set("6".to_string(), "six".to_string());
    assert_eq!(cache.get("3"), None);

    // Frequent entries are immune to recent-queue eviction
    assert_eq!(cache.get("2"), Some("two".to_string()));

    for (k, _) in numbered() {
        cache.delete(k.as_str());
        assert_eq!(cache.get(k.as_str()), None);
    }
}

#[test]
fn test_scan_resistance_ghost_reentry() {
    let cache = TwoQueueCache::new(4).unwrap();
    assert_eq!(cache.recent_size(), 1);
    assert_eq!(cache.ghost_capacity(), 2);

    for k in 1..=5 {
        cache.set(k, k * 10);
    }
    assert_eq!(cache.segment_of(&1), Some(Segment::Ghost));

    cache.set(1, 11);
    assert_eq!(cache.segment_of(&1), Some(Segment::Frequent));
    assert_eq!(cache.get(&1), Some(11));
    assert!(cache.len() <= cache.capacity());
}

#[test]
fn test_scan_does_not_flush_hot_set() {
    let cache = TwoQueueCache::new(100).unwrap();

    // Touch each hot key twice so it lands in the frequent queue
    for k in 0..20u32 {
        cache.set(k, k);
        let _ = cache.get(&k);
    }

    // One pass over many never-repeated keys
    for k in 1_000..5_000u32 {
        cache.set(k, k);
    }

    for k in 0..20u32 {
        assert_eq!(cache.get(&k), Some(k), "hot key {} was flushed", k);
    }
    assert_eq!(cache.frequent_len(), 20);
    assert!(cache.len() <= 100);
}

#[test]
fn test_ghost_reentry_at_target_evicts_frequent() {
    let cache = TwoQueueCache::new(4).unwrap();
    for k in 1..=5 {
        cache.set(k, k);
    }
    for k in 2..=4 {
        let _ = cache.get(&k);
    }
    assert_eq!(cache.keys(Segment::Recent), vec![5]);
    assert_eq!(cache.keys(Segment::Frequent), vec![2, 3, 4]);

    cache.set(1, 1);

    // recent was exactly at target: the oldest frequent entry made room
    assert_eq!(cache.keys(Segment::Recent), vec![5]);
    assert_eq!(cache.keys(Segment::Frequent), vec![3, 4, 1]);
    assert_eq!(cache.get(&2), None);
}

#[test]
fn test_deletion_completeness() {
    let cache = TwoQueueCache::new(4).unwrap();
    for k in 1..=5 {
        cache.set(k, k);
    }
    let _ = cache.get(&3);

    assert_eq!(cache.segment_of(&1), Some(Segment::Ghost));
    assert_eq!(cache.segment_of(&2), Some(Segment::Recent));
    assert_eq!(cache.segment_of(&3), Some(Segment::Frequent));

    for k in 1..=3 {
        cache.delete(&k);
        assert_eq!(cache.get(&k), None);
        assert_eq!(cache.segment_of(&k), None);
    }

    // A deleted ghost is not fast-tracked any more
    cache.set(1, 1);
    assert_eq!(cache.segment_of(&1), Some(Segment::Recent));
}

#[test]
fn test_idempotent_delete() {
    let cache = TwoQueueCache::new(4).unwrap();
    cache.set(1, 1);
    cache.delete(&2);
    cache.delete(&2);

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.segment_of(&1), Some(Segment::Recent));
    assert_eq!(cache.stats().deletes, 0);
}

#[test]
fn test_clear_totality() {
    let cache = TwoQueueCache::new(8).unwrap();
    for k in 0..20 {
        cache.set(k, k);
        if k % 3 == 0 {
            let _ = cache.get(&k);
        }
    }
    assert!(cache.ghost_len() > 0);

    cache.clear();
    assert_eq!(cache.ghost_len(), 0);
    for k in 0..20 {
        assert_eq!(cache.get(&k), None);
    }
}

#[test]
fn test_expiry_on_recent_path() {
    let cache = TwoQueueCache::new(8).unwrap();

    cache.set_with_ttl("kept", "a", Duration::from_secs(2));
    cache.set_with_ttl("dropped", "b", Duration::from_secs(2));

    // Promote "kept" before it expires; frequent entries carry no expiry
    assert_eq!(cache.get("kept"), Some("a"));
    assert_eq!(cache.segment_of("kept"), Some(Segment::Frequent));

    thread::sleep(Duration::from_millis(3_100));

    assert_eq!(cache.get("kept"), Some("a"));
    assert_eq!(cache.get("dropped"), None);
}

#[test]
fn test_past_expiry_is_a_miss() {
    let cache = TwoQueueCache::new(8).unwrap();
    cache.set_with_expire(1, 1, SystemTime::now() - Duration::from_secs(1));
    assert!(!cache.contains(&1));
    assert_eq!(cache.get(&1), None);
}

#[test]
fn test_set_with_expire_on_frequent_ignores_expiry() {
    let cache = TwoQueueCache::new(8).unwrap();
    cache.set(1, 1);
    cache.set(1, 2);
    assert_eq!(cache.segment_of(&1), Some(Segment::Frequent));

    cache.set_with_expire(1, 3, SystemTime::now() - Duration::from_secs(60));
    assert_eq!(cache.get(&1), Some(3));
}

/// Documented behavior: the expiring path does not fast-track ghosts.
/// A returning key written with an expiry goes to the recent queue, and
/// its ghost record stays behind.
#[test]
fn test_set_with_expire_does_not_readmit_ghosts() {
    let cache = TwoQueueCache::new(4).unwrap();
    for k in 1..=5 {
        cache.set(k, k);
    }
    assert_eq!(cache.segment_of(&1), Some(Segment::Ghost));

    cache.set_with_expire(1, 100, SystemTime::now() + Duration::from_secs(3600));

    assert_eq!(cache.segment_of(&1), Some(Segment::Recent));
    assert!(cache.keys(Segment::Ghost).contains(&1));
    assert!(!cache.keys(Segment::Frequent).contains(&1));

    // A plain write afterwards is a repeat observation and promotes it
    cache.set(1, 101);
    assert_eq!(cache.segment_of(&1), Some(Segment::Frequent));
}

/// Documented behavior: expiring writes are bounded by the recent store's
/// own capacity, not by the combined recent + frequent budget.
#[test]
fn test_set_with_expire_uses_recent_store_bound() {
    let cache = TwoQueueCache::new(4).unwrap();
    cache.set(100, 0);
    let _ = cache.get(&100);

    let future = SystemTime::now() + Duration::from_secs(3600);
    for k in 0..10 {
        cache.set_with_expire(k, k, future);
    }

    assert_eq!(cache.recent_len(), 4);
    assert_eq!(cache.frequent_len(), 1);
    assert_eq!(cache.keys(Segment::Recent), vec![6, 7, 8, 9]);

    // The next plain insertion restores the combined bound
    cache.set(50, 50);
    assert!(cache.len() <= cache.capacity());
}

#[test]
fn test_construction_failures() {
    assert!(matches!(
        TwoQueueCache::<u32, u32>::new(0),
        Err(CacheError::InvalidCapacity(0))
    ));
    assert!(matches!(
        TwoQueueCache::<u32, u32>::with_params(10, 1.1, 0.5),
        Err(CacheError::InvalidRatio {
            name: "recent_ratio",
            ..
        })
    ));
    assert!(TwoQueueCache::<u32, u32>::with_params(10, 0.5, -0.1).is_err());
    assert!(TwoQueueCache::<u32, u32>::with_params(10, 0.0, 0.0).is_ok());
}

#[test]
fn test_config_builder() {
    let config = TwoQueueConfig::new(200)
        .recent_ratio(0.1)
        .ghost_ratio(0.25)
        .build()
        .unwrap();

    let cache: TwoQueueCache<u32, u32> = TwoQueueCache::from_config(config.clone());
    assert_eq!(cache.config(), &config);
    assert_eq!(cache.recent_size(), 20);
    assert_eq!(cache.ghost_capacity(), 50);
}

#[test]
fn test_stats_accuracy() {
    let cache = TwoQueueCache::new(4).unwrap();

    for k in 1..=5 {
        cache.set(k, k);
    }
    let _ = cache.get(&2); // Hit, promotion
    let _ = cache.get(&2); // Hit
    let _ = cache.get(&1); // Miss (ghost)
    cache.set(1, 1); // Ghost re-admission
    cache.delete(&5);

    let stats = cache.stats();
    assert_eq!(stats.sets, 6);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.promotions, 1);
    assert_eq!(stats.ghost_hits, 1);
    assert_eq!(stats.recent_evictions, 2);
    assert_eq!(stats.frequent_evictions, 0);
    assert_eq!(stats.deletes, 1);
    assert_eq!(stats.size(), cache.len());
}

#[test]
fn test_cache_clone_shares_data() {
    let cache1 = TwoQueueCache::new(8).unwrap();
    cache1.set("key", "value1");

    let cache2 = cache1.clone();
    assert_eq!(cache2.get("key"), cache1.get("key"));

    cache2.set("key", "value2");
    assert_eq!(cache1.get("key"), Some("value2"));
}

#[test]
fn test_concurrent_mixed_operations_respect_capacity() {
    let cache = Arc::new(TwoQueueCache::new(64).unwrap());

    let handles: Vec<_> = (0..8u64)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..2_000u64 {
                    let key = (t * 7 + i * 13) % 200;
                    match i % 5 {
                        0 | 1 => cache.set(key, i),
                        2 | 3 => {
                            let _ = cache.get(&key);
                        }
                        _ => cache.delete(&key),
                    }
                    assert!(cache.len() <= 64);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(cache.len() <= 64);
    assert!(cache.ghost_len() <= cache.ghost_capacity());

    let recent = cache.keys(Segment::Recent);
    let frequent = cache.keys(Segment::Frequent);
    assert!(recent.iter().all(|k| !frequent.contains(k)));
}

#[test]
fn test_concurrent_reads_keep_hot_keys() {
    let cache = Arc::new(TwoQueueCache::new(1000).unwrap());

    for i in 0..100 {
        cache.set(format!("key_{}", i), format!("value_{}", i));
    }

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for _ in 0..100 {
                    for i in 0..100 {
                        let _ = cache.get(&format!("key_{}", i));
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    // Every key was read at least twice, so all of them were promoted
    assert_eq!(cache.frequent_len(), 100);
    assert_eq!(cache.recent_len(), 0);
}
