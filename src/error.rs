//! Error types for the two-queue cache library.
//!
//! Cache operations themselves cannot fail: a miss is `None`, not an error.
//! The only failure point of the cache is construction with an invalid
//! configuration. The remaining variants belong to the text protocol spoken
//! by the demo server.

use std::fmt;
use std::io;

/// The main error type for the crate.
#[derive(Debug)]
pub enum CacheError {
    /// The cache capacity must be at least one entry.
    InvalidCapacity(usize),

    /// A sizing ratio was outside `[0, 1]` (or NaN).
    InvalidRatio { name: &'static str, value: f64 },

    /// The command received was invalid or malformed.
    InvalidCommand(String),

    /// Failed to parse the input buffer or protocol message.
    ParseError(String),

    /// An I/O error occurred (network, file, etc.).
    IoError(io::Error),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::InvalidCapacity(capacity) => {
                write!(f, "invalid capacity: {} (must be greater than 0)", capacity)
            }
            CacheError::InvalidRatio { name, value } => {
                write!(f, "invalid {}: {} (must be within [0, 1])", name, value)
            }
            CacheError::InvalidCommand(cmd) => write!(f, "invalid command: '{}'", cmd),
            CacheError::ParseError(msg) => write!(f, "parse error: {}", msg),
            CacheError::IoError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for CacheError {
    fn from(err: io::Error) -> Self {
        CacheError::IoError(err)
    }
}

/// A specialized Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
