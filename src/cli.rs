//! Command-line interface definitions.
//!
//! This module defines the CLI structure for the cache server and client using clap.

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_GHOST_RATIO, DEFAULT_RECENT_RATIO};
use crate::protocol::Command;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

/// 2Q cache server.
#[derive(Parser, Debug)]
#[command(name = "cache-server")]
#[command(author, version, about, long_about = None)]
pub struct ServerArgs {
    /// Address to bind.
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Maximum number of cached values.
    #[arg(short, long, default_value_t = 10_000)]
    pub capacity: usize,

    /// Target share of the capacity for keys seen once.
    #[arg(long, default_value_t = DEFAULT_RECENT_RATIO)]
    pub recent_ratio: f64,

    /// Share of the capacity remembered as evicted keys.
    #[arg(long, default_value_t = DEFAULT_GHOST_RATIO)]
    pub ghost_ratio: f64,
}

/// 2Q cache client.
///
/// A CLI tool for interacting with the cache server.
#[derive(Parser, Debug)]
#[command(name = "cache-client")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Server host.
    #[arg(long, global = true, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Server port.
    #[arg(short, long, global = true, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// The command to execute.
    #[clap(subcommand)]
    pub command: ClientCommand,
}

/// Available client commands.
#[derive(Subcommand, Debug)]
pub enum ClientCommand {
    /// Get a value by key.
    ///
    /// A hit on a key seen only once promotes it to the frequent queue.
    Get {
        /// The key to look up.
        key: String,
    },

    /// Set a key-value pair.
    Set {
        /// The key to store the value under.
        key: String,
        /// The value to store.
        value: String,
    },

    /// Set a key-value pair that expires after a number of seconds.
    Setex {
        /// The key to store the value under.
        key: String,
        /// Seconds until the entry expires.
        ttl: u64,
        /// The value to store.
        value: String,
    },

    /// Delete a key.
    Delete {
        /// The key to delete.
        key: String,
    },

    /// Remove every entry.
    Clear,

    /// Ping the server.
    Ping,

    /// Get server statistics.
    ///
    /// Shows hits, misses, queue lengths, and hit rate.
    Stats,
}

impl From<ClientCommand> for Command {
    fn from(command: ClientCommand) -> Self {
        match command {
            ClientCommand::Get { key } => Command::Get { key },
            ClientCommand::Set { key, value } => Command::Set { key, value },
            ClientCommand::Setex { key, ttl, value } => Command::SetEx {
                key,
                ttl_secs: ttl,
                value,
            },
            ClientCommand::Delete { key } => Command::Delete { key },
            ClientCommand::Clear => Command::Clear,
            ClientCommand::Ping => Command::Ping,
            ClientCommand::Stats => Command::Stats,
        }
    }
}
