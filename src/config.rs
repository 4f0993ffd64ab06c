//! Configuration for the two-queue cache.
//!
//! This module provides a builder for the overall capacity and the two
//! ratios that size the recent queue target and the ghost queue.

use crate::error::{CacheError, CacheResult};

/// Share of the capacity the recent queue is allowed to hold before
/// eviction pressure shifts to it.
pub const DEFAULT_RECENT_RATIO: f64 = 0.25;

/// Size of the ghost queue relative to the capacity.
pub const DEFAULT_GHOST_RATIO: f64 = 0.50;

/// Configuration for creating a new cache instance.
///
/// Use the builder pattern to construct configuration:
///
/// ```
/// use two_queue_cache::TwoQueueConfig;
///
/// let config = TwoQueueConfig::new(1_000)
///     .recent_ratio(0.25)
///     .ghost_ratio(0.5)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.recent_size(), 250);
/// assert_eq!(config.ghost_capacity(), 500);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TwoQueueConfig {
    /// Maximum number of value-holding entries (recent + frequent).
    pub(crate) capacity: usize,

    /// Fraction of `capacity` targeted for the recent queue.
    pub(crate) recent_ratio: f64,

    /// Fraction of `capacity` remembered as ghost keys.
    pub(crate) ghost_ratio: f64,
}

impl TwoQueueConfig {
    /// Start a configuration with the default ratios.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            recent_ratio: DEFAULT_RECENT_RATIO,
            ghost_ratio: DEFAULT_GHOST_RATIO,
        }
    }

    /// Set the recent queue's target share of the capacity.
    ///
    /// This is a soft target consulted when choosing a victim. The recent
    /// queue itself may grow up to the full capacity.
    pub fn recent_ratio(mut self, ratio: f64) -> Self {
        self.recent_ratio = ratio;
        self
    }

    /// Set how many evicted recent keys are remembered, as a share of the capacity.
    pub fn ghost_ratio(mut self, ratio: f64) -> Self {
        self.ghost_ratio = ratio;
        self
    }

    /// Validate and build the final configuration.
    ///
    /// Fails if the capacity is zero or either ratio lies outside `[0, 1]`.
    pub fn build(self) -> CacheResult<Self> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity(self.capacity));
        }
        check_ratio("recent_ratio", self.recent_ratio)?;
        check_ratio("ghost_ratio", self.ghost_ratio)?;
        Ok(self)
    }

    /// Get the overall capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the recent queue ratio.
    pub fn get_recent_ratio(&self) -> f64 {
        self.recent_ratio
    }

    /// Get the ghost queue ratio.
    pub fn get_ghost_ratio(&self) -> f64 {
        self.ghost_ratio
    }

    /// `floor(capacity * recent_ratio)`.
    pub fn recent_size(&self) -> usize {
        (self.capacity as f64 * self.recent_ratio) as usize
    }

    /// `floor(capacity * ghost_ratio)`.
    pub fn ghost_capacity(&self) -> usize {
        (self.capacity as f64 * self.ghost_ratio) as usize
    }
}

fn check_ratio(name: &'static str, value: f64) -> CacheResult<()> {
    // NaN fails the range check too.
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CacheError::InvalidRatio { name, value })
    }
}
