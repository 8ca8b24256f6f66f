//! Chat client entry point.

use ember_chat::client::{connect_with_retry, run_client};
use ember_chat::config::ChatConfig;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match ChatConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    match connect_with_retry(&config).await {
        Ok(stream) => {
            println!("Connected to the chat server at {}.", config.socket_addr());
            run_client(stream, &config).await;
        }
        Err(e) => {
            eprintln!("Could not contact the chat server at this time.");
            eprintln!("The server may be offline or down for maintenance.");
            eprintln!("({})", e);
            std::process::exit(1);
        }
    }
}
