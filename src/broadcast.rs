//! Broadcast engine
//!
//! Best-effort fan-out of one message to every registered connection, named
//! and pending alike. The whole fan-out runs under the registry lock, so a
//! broadcast never interleaves with a registration or removal. Delivery
//! order across recipients is unspecified.

use log::warn;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::registry::Registry;

/// Delivers messages to every connection in the registry.
pub struct Broadcaster<W> {
    registry: Arc<Registry<W>>,
}

impl<W> Clone for Broadcaster<W> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<W: AsyncWrite + Unpin> Broadcaster<W> {
    pub fn new(registry: Arc<Registry<W>>) -> Self {
        Self { registry }
    }

    /// Composes `prefix + message` and attempts delivery to every registered
    /// connection. A recipient whose write fails (closed socket, broken
    /// pipe) is logged and skipped; the remaining recipients still receive
    /// the payload. Failures never surface to the caller.
    pub async fn broadcast(&self, message: &str, prefix: &str) {
        let payload = format!("{}{}", prefix, message);
        let mut peers = self.registry.peers.lock().await;

        for (addr, peer) in peers.iter_mut() {
            if let Err(e) = peer.writer_mut().write_all(payload.as_bytes()).await {
                warn!("Dropping broadcast to {}: {}", addr, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, duplex, split};
    use tokio::sync::Notify;

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{}", port).parse().unwrap()
    }

    #[tokio::test]
    async fn test_failed_recipient_does_not_abort_fan_out() {
        let registry = Arc::new(Registry::new());
        let broadcaster = Broadcaster::new(Arc::clone(&registry));

        let (server_a, mut client_a) = duplex(256);
        let (server_b, client_b) = duplex(256);
        let (server_c, mut client_c) = duplex(256);

        let (_read_a, write_a) = split(server_a);
        let (_read_b, write_b) = split(server_b);
        let (_read_c, write_c) = split(server_c);

        registry
            .register(addr(9000), write_a, Arc::new(Notify::new()))
            .await;
        registry
            .register(addr(9001), write_b, Arc::new(Notify::new()))
            .await;
        registry
            .register(addr(9002), write_c, Arc::new(Notify::new()))
            .await;

        // Close one recipient's end; its delivery must fail without
        // blocking the others.
        drop(client_b);

        broadcaster.broadcast("test", "\nSERVER: ").await;

        let mut buf = [0u8; 64];
        let n = client_a.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"\nSERVER: test");
        let n = client_c.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"\nSERVER: test");
    }

    #[tokio::test]
    async fn test_broadcast_reaches_pending_and_named_peers() {
        let registry = Arc::new(Registry::new());
        let broadcaster = Broadcaster::new(Arc::clone(&registry));

        let (server_a, mut client_a) = duplex(256);
        let (server_b, mut client_b) = duplex(256);
        let (_read_a, write_a) = split(server_a);
        let (_read_b, write_b) = split(server_b);

        registry
            .register(addr(9100), write_a, Arc::new(Notify::new()))
            .await;
        registry
            .register(addr(9101), write_b, Arc::new(Notify::new()))
            .await;
        registry
            .promote(&addr(9100), "Alice".to_string())
            .await
            .unwrap();

        broadcaster.broadcast("hello", "\nAlice: ").await;

        let mut buf = [0u8; 64];
        let n = client_a.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"\nAlice: hello");
        let n = client_b.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"\nAlice: hello");
    }
}
