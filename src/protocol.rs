//! Text protocol for the cache server.
//!
//! One command per read, words separated by whitespace:
//!
//! ```text
//! get <key>
//! set <key> <value...>
//! setex <key> <ttl_secs> <value...>
//! del <key>
//! clear
//! ping
//! stats
//! ```
//!
//! Values may contain spaces; everything after the fixed arguments is
//! joined back with single spaces.

use bytes::{Bytes, BytesMut};
use std::time::Duration;

use crate::cache::TwoQueueCache;
use crate::error::{CacheError, CacheResult};

/// A parsed protocol command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get { key: String },
    Set { key: String, value: String },
    SetEx { key: String, ttl_secs: u64, value: String },
    Delete { key: String },
    Clear,
    Ping,
    Stats,
}

impl Command {
    /// Parse a command out of a read buffer. The buffer is consumed.
    pub fn parse(buf: &mut BytesMut) -> CacheResult<Command> {
        Self::from_words(&split_words(buf))
    }

    /// Parse a command from already split words.
    pub fn from_words(words: &[String]) -> CacheResult<Command> {
        let (name, args) = words
            .split_first()
            .ok_or_else(|| CacheError::ParseError("empty command".to_string()))?;

        match name.to_lowercase().as_str() {
            "get" => Ok(Command::Get {
                key: required(args, 0, "key")?,
            }),
            "set" => Ok(Command::Set {
                key: required(args, 0, "key")?,
                value: rest(args, 1, "value")?,
            }),
            "setex" => {
                let ttl = required(args, 1, "ttl")?;
                let ttl_secs = ttl
                    .parse()
                    .map_err(|_| CacheError::ParseError(format!("invalid ttl '{}'", ttl)))?;
                Ok(Command::SetEx {
                    key: required(args, 0, "key")?,
                    ttl_secs,
                    value: rest(args, 2, "value")?,
                })
            }
            "delete" | "del" => Ok(Command::Delete {
                key: required(args, 0, "key")?,
            }),
            "clear" => Ok(Command::Clear),
            "ping" => Ok(Command::Ping),
            "stats" | "info" => Ok(Command::Stats),
            _ => Err(CacheError::InvalidCommand(name.clone())),
        }
    }

    /// Get the protocol keyword of this command.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Get { .. } => "get",
            Command::Set { .. } => "set",
            Command::SetEx { .. } => "setex",
            Command::Delete { .. } => "delete",
            Command::Clear => "clear",
            Command::Ping => "ping",
            Command::Stats => "stats",
        }
    }

    /// Render the command the way a client sends it.
    pub fn to_wire(&self) -> String {
        match self {
            Command::Get { key } | Command::Delete { key } => format!("{} {}", self.as_str(), key),
            Command::Set { key, value } => format!("set {} {}", key, value),
            Command::SetEx {
                key,
                ttl_secs,
                value,
            } => format!("setex {} {} {}", key, ttl_secs, value),
            Command::Clear | Command::Ping | Command::Stats => self.as_str().to_string(),
        }
    }

    /// Run the command against the cache and produce the response line.
    pub fn execute(self, cache: &TwoQueueCache<String, Bytes>) -> String {
        match self {
            Command::Get { key } => match cache.get(key.as_str()) {
                Some(value) => match std::str::from_utf8(&value) {
                    Ok(s) => s.to_string(),
                    Err(_) => format!("(binary data: {} bytes)", value.len()),
                },
                // Empty response for a miss
                None => String::new(),
            },
            Command::Set { key, value } => {
                let existed = cache.contains(key.as_str());
                cache.set(key, Bytes::from(value));
                if existed {
                    "r Ok".to_string()
                } else {
                    "Ok".to_string()
                }
            }
            Command::SetEx {
                key,
                ttl_secs,
                value,
            } => {
                cache.set_with_ttl(key, Bytes::from(value), Duration::from_secs(ttl_secs));
                "Ok".to_string()
            }
            Command::Delete { key } => {
                let existed = cache.segment_of(key.as_str()).is_some();
                cache.delete(key.as_str());
                if existed {
                    "Ok".to_string()
                } else {
                    String::new()
                }
            }
            Command::Clear => {
                cache.clear();
                "Ok".to_string()
            }
            Command::Ping => "PONG".to_string(),
            Command::Stats => {
                let stats = cache.stats();
                format!(
                    "hits:{} misses:{} recent:{} frequent:{} ghost:{} evictions:{} hit_rate:{:.1}%",
                    stats.hits,
                    stats.misses,
                    stats.recent_len,
                    stats.frequent_len,
                    stats.ghost_len,
                    stats.recent_evictions + stats.frequent_evictions,
                    stats.hit_rate
                )
            }
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Drain the buffer and split it into whitespace-separated words.
pub fn split_words(buf: &mut BytesMut) -> Vec<String> {
    let bytes = buf.split().freeze();
    bytes
        .split(|b| b.is_ascii_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| String::from_utf8_lossy(word).into_owned())
        .collect()
}

fn required(args: &[String], index: usize, name: &str) -> CacheResult<String> {
    args.get(index)
        .cloned()
        .ok_or_else(|| CacheError::ParseError(format!("missing {} argument", name)))
}

fn rest(args: &[String], from: usize, name: &str) -> CacheResult<String> {
    match args.get(from..) {
        Some(words) if !words.is_empty() => Ok(words.join(" ")),
        _ => Err(CacheError::ParseError(format!("missing {} argument", name))),
    }
}
