//! 2Q cache server.
//!
//! This binary runs a TCP server that accepts cache commands from clients.

use bytes::{Bytes, BytesMut};
use clap::Parser;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    signal,
};
use tracing::{error, info, warn};

use two_queue_cache::{Command, ServerArgs, TwoQueueCache};

/// Entry point for the cache server.
#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = ServerArgs::parse();

    let cache: TwoQueueCache<String, Bytes> =
        TwoQueueCache::with_params(args.capacity, args.recent_ratio, args.ghost_ratio)?;

    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("Cache server listening on {}", addr);
    info!(
        capacity = cache.capacity(),
        recent_size = cache.recent_size(),
        ghost_capacity = cache.ghost_capacity(),
        "2Q cache configured"
    );

    let shutdown_cache = cache.clone();
    tokio::spawn(async move {
        if let Ok(()) = signal::ctrl_c().await {
            let stats = shutdown_cache.stats();
            info!(
                hits = stats.hits,
                misses = stats.misses,
                size = stats.size(),
                ghosts = stats.ghost_len,
                "Shutting down"
            );
            std::process::exit(0);
        }
    });

    loop {
        match listener.accept().await {
            Ok((socket, peer)) => {
                info!("Connection from {}", peer);

                // Clone the cache handle for this connection
                let cache = cache.clone();

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(socket, cache).await {
                        warn!("Connection error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Serve commands on one connection until the client hangs up.
async fn handle_connection(
    mut socket: TcpStream,
    cache: TwoQueueCache<String, Bytes>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut buf = BytesMut::with_capacity(1024);

    loop {
        let n = socket.read_buf(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }

        let response = match Command::parse(&mut buf) {
            Ok(command) => command.execute(&cache),
            Err(e) => format!("ERR {}", e),
        };

        socket.write_all(response.as_bytes()).await?;
    }
}
