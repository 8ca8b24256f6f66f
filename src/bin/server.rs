//! Chat server entry point.

use log::info;
use std::sync::Arc;
use tokio::io::{BufReader, stdin};

use ember_chat::config::ChatConfig;
use ember_chat::console::Console;
use ember_chat::server::ChatServer;

#[tokio::main]
async fn main() {
    // env_logger picks up the RUST_LOG environment variable
    env_logger::init();

    let config = match ChatConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Launching chat server...");

    let server = Arc::new(ChatServer::new(config).await);

    // The operator console runs beside the accept loop, sharing its
    // registry and broadcaster.
    let console = Console::new(
        server.registry(),
        server.broadcaster(),
        BufReader::new(stdin()),
    );
    tokio::spawn(console.run());

    server.start().await;
}
