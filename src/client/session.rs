//! Interactive client loops.

use log::warn;
use std::io::{self, Write as _};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, stdin};
use tokio::net::TcpStream;

use crate::config::ChatConfig;
use crate::protocol;

/// Runs the interactive client over an established connection. A spawned
/// task prints inbound broadcasts while the foreground loop forwards typed
/// lines; typing the quit sentinel sends it and waits for the server's
/// acknowledgment before returning.
pub async fn run_client(stream: TcpStream, config: &ChatConfig) {
    let (mut read_half, mut write_half) = stream.into_split();
    let buffer_size = config.buffer_size;

    let receiver = tokio::spawn(async move {
        let mut buf = vec![0u8; buffer_size];
        loop {
            match read_half.read(&mut buf).await {
                Ok(0) => {
                    println!("\nConnection to server lost.");
                    return;
                }
                Ok(n) => {
                    let text = String::from_utf8_lossy(&buf[..n]).to_string();
                    if text == protocol::QUIT_SENTINEL {
                        // Server acknowledged our quit; we are done.
                        return;
                    }
                    print!("{}", text);
                    let _ = io::stdout().flush();
                }
                Err(e) => {
                    warn!("Failed to read from server: {}", e);
                    println!("\nConnection to server lost.");
                    return;
                }
            }
        }
    });

    let mut lines = BufReader::new(stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if line == protocol::QUIT_SENTINEL {
            let _ = write_half.write_all(protocol::QUIT_SENTINEL.as_bytes()).await;
            break;
        }
        if line.is_empty() {
            continue;
        }
        if let Err(e) = write_half.write_all(line.as_bytes()).await {
            warn!("Failed to send message: {}", e);
            println!("Connection to server lost.");
            break;
        }
    }

    let _ = receiver.await;
}
