//! # Two-Queue Cache
//!
//! A bounded, thread-safe cache implementing the 2Q admission and eviction
//! policy.
//!
//! ## Features
//!
//! - **Scan resistance**: keys seen once live in a small recent queue; only
//!   keys seen again reach the frequent queue, so one-pass scans cannot
//!   flush the hot set
//! - **Ghost tracking**: keys evicted from the recent queue are remembered
//!   (without values) and fast-tracked to the frequent queue if they return
//! - **Lazy expiry**: entries can carry a whole-second expiry checked on read
//! - **Thread-safe**: share across threads with `Clone` (uses `Arc` internally)
//! - **Statistics**: hits, misses, promotions, ghost hits, evictions
//!
//! ## Quick Start
//!
//! ```rust
//! use two_queue_cache::{Segment, TwoQueueCache};
//!
//! // 4 entries: recent target 1, ghost capacity 2
//! let cache = TwoQueueCache::new(4).unwrap();
//!
//! for (k, v) in [(1, "one"), (2, "two"), (3, "three"), (4, "four"), (5, "five")] {
//!     cache.set(k, v);
//! }
//!
//! // 1 was pushed out of the recent queue; only its key is remembered.
//! assert_eq!(cache.get(&1), None);
//! assert_eq!(cache.segment_of(&1), Some(Segment::Ghost));
//!
//! // Coming back, it skips the recent queue.
//! cache.set(1, "one");
//! assert_eq!(cache.segment_of(&1), Some(Segment::Frequent));
//! ```
//!
//! ## Thread Safety
//!
//! Every operation holds one exclusive lock for its whole duration, so all
//! observable states are reachable by some serial order of the calls.
//!
//! ```rust
//! use two_queue_cache::TwoQueueCache;
//! use std::thread;
//!
//! let cache = TwoQueueCache::new(128).unwrap();
//!
//! let handles: Vec<_> = (0..4).map(|i| {
//!     let cache = cache.clone();
//!     thread::spawn(move || {
//!         cache.set(format!("key_{}", i), format!("value_{}", i));
//!     })
//! }).collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 4);
//! ```

pub mod cache;
pub mod config;
pub mod entry;
pub mod error;
pub mod lru;
pub mod stats;
pub mod two_queue;

pub use cache::TwoQueueCache;
pub use config::{TwoQueueConfig, DEFAULT_GHOST_RATIO, DEFAULT_RECENT_RATIO};
pub use error::{CacheError, CacheResult};
pub use lru::LruStore;
pub use stats::{CacheStats, QueueLengths, StatsSnapshot};
pub use two_queue::Segment;

// Server/client support
pub mod protocol;
pub use protocol::Command;

pub mod cli;
pub use cli::{Cli, ClientCommand, ServerArgs};
