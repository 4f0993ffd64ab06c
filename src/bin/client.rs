//! 2Q cache client.
//!
//! This binary provides a CLI for interacting with a running cache server.

use bytes::BytesMut;
use clap::Parser;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

use two_queue_cache::cli::Cli;
use two_queue_cache::Command;

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let addr = format!("{}:{}", args.host, args.port);
    let mut stream = match TcpStream::connect(&addr).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to connect to server at {}: {}", addr, e);
            eprintln!("Make sure the server is running with: cargo run --bin server");
            std::process::exit(1);
        }
    };

    let command = Command::from(args.command);
    stream.write_all(command.to_wire().as_bytes()).await?;

    let mut buf = BytesMut::with_capacity(1024);
    let _ = stream.read_buf(&mut buf).await?;

    let response = match std::str::from_utf8(&buf) {
        Ok(resp) => resp,
        Err(e) => {
            eprintln!("Failed to parse response: {}", e);
            std::process::exit(1);
        }
    };

    if response.starts_with("ERR") {
        eprintln!("Error: {}", response);
        std::process::exit(1);
    }

    match (&command, response) {
        (Command::Get { key }, "") => println!("Key '{}' not found", key),
        (Command::Delete { key }, "") => println!("Key '{}' not found", key),
        (Command::Delete { key }, _) => println!("Deleted key '{}'", key),
        (Command::Set { key, .. }, "r Ok") => println!("Updated key '{}'", key),
        (Command::Set { key, .. }, _) | (Command::SetEx { key, .. }, _) => {
            println!("Set key '{}'", key)
        }
        (Command::Stats, _) => {
            println!("Cache Statistics:");
            for part in response.split_whitespace() {
                if let Some((name, value)) = part.split_once(':') {
                    println!("  {}: {}", name, value);
                }
            }
        }
        _ => println!("{}", response),
    }

    Ok(())
}
