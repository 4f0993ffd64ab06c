//! Cache entry with an optional whole-second expiry.

use std::time::{SystemTime, UNIX_EPOCH};

/// A single stored value and its expiry metadata.
///
/// Expiry is kept as whole Unix seconds. Sub-second precision of the
/// instant handed to the cache is truncated away.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    /// The stored value.
    pub(crate) value: V,

    /// Unix second at which this entry stops being visible. `None` means no expiry.
    pub(crate) expires_at: Option<u64>,
}

impl<V> Entry<V> {
    /// Create a new entry with no expiration.
    pub fn new(value: V) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Create a new entry that expires at the given instant.
    pub fn with_expiration(value: V, expires_at: SystemTime) -> Self {
        Self {
            value,
            expires_at: Some(unix_seconds(expires_at)),
        }
    }

    /// Check if this entry has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_seconds())
    }

    /// Check if this entry has expired at a given Unix second.
    /// This is useful for testing with a controlled clock.
    pub fn is_expired_at(&self, now_secs: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_secs >= expires,
            None => false,
        }
    }

    /// Get a reference to the value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consume the entry, returning the value.
    pub fn into_value(self) -> V {
        self.value
    }

    /// Get the expiration second, if set.
    pub fn expires_at(&self) -> Option<u64> {
        self.expires_at
    }
}

/// Truncate an instant to whole seconds since the Unix epoch.
///
/// Instants before the epoch clamp to zero, which makes them already expired.
pub fn unix_seconds(instant: SystemTime) -> u64 {
    instant
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// The current wall-clock time in whole Unix seconds.
pub fn now_seconds() -> u64 {
    unix_seconds(SystemTime::now())
}
