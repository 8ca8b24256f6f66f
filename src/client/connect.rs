//! Server connection with bounded retry.

use log::{info, warn};
use tokio::net::TcpStream;
use tokio::time::sleep;

use crate::config::ChatConfig;
use crate::error::ConnectError;

/// Tries the configured address once, then up to `max_retries` more times
/// with a fixed delay between attempts. The retry budget is a hard bound;
/// after the final failure the error carries the total attempt count and no
/// further attempt is made.
pub async fn connect_with_retry(config: &ChatConfig) -> Result<TcpStream, ConnectError> {
    let addr = config.socket_addr();
    let mut attempts = 0;

    loop {
        attempts += 1;
        match TcpStream::connect(&addr).await {
            Ok(stream) => {
                info!("Connected to chat server at {}", addr);
                return Ok(stream);
            }
            Err(e) => {
                if attempts > config.max_retries {
                    return Err(ConnectError::RetriesExhausted {
                        attempts,
                        source: e,
                    });
                }
                warn!(
                    "Could not contact the chat server, try {}/{}",
                    attempts, config.max_retries
                );
                sleep(config.retry_delay()).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn unreachable_config(max_retries: usize) -> ChatConfig {
        // Bind and immediately drop a listener so the port is known dead.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        ChatConfig {
            host: "127.0.0.1".to_string(),
            port,
            retry_delay_secs: 0,
            max_retries,
            ..ChatConfig::default()
        }
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let config = unreachable_config(2).await;

        match connect_with_retry(&config).await {
            Err(ConnectError::RetriesExhausted { attempts, .. }) => {
                // Initial attempt plus two retries, never a fourth
                assert_eq!(attempts, 3);
            }
            Ok(_) => panic!("connect to a dead port should not succeed"),
        }
    }

    #[tokio::test]
    async fn test_connect_succeeds_without_retry() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let config = ChatConfig {
            host: "127.0.0.1".to_string(),
            port,
            retry_delay_secs: 0,
            ..ChatConfig::default()
        };

        let stream = connect_with_retry(&config).await.unwrap();
        assert_eq!(stream.peer_addr().unwrap().port(), port);
    }
}
