//! Connection registry
//!
//! Shared table of live connections, keyed by the remote address captured at
//! accept time. Every entry carries the connection's write half; entries that
//! have joined the chat also carry a display name. Because both facets live
//! in one map entry, a named connection is always also an addressed one, and
//! removal drops both atomically.
//!
//! All access goes through one `tokio::sync::Mutex`; session handlers, the
//! broadcast engine, and the operator console share that single
//! mutual-exclusion discipline and never see the map itself. No accept or
//! connect I/O happens here.

mod peer;

pub use peer::{Peer, PeerInfo};

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{Mutex, Notify};

use crate::error::RegistryError;

/// Registry for tracking active and pending connections.
pub struct Registry<W> {
    pub(crate) peers: Mutex<HashMap<SocketAddr, Peer<W>>>,
}

impl<W> Registry<W> {
    pub fn new() -> Self {
        Self {
            peers: Mutex::new(HashMap::new()),
        }
    }
}

impl<W> Default for Registry<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: AsyncWrite + Unpin> Registry<W> {
    /// Adds a pending entry for a freshly accepted connection.
    pub async fn register(&self, addr: SocketAddr, writer: W, shutdown: Arc<Notify>) {
        let mut peers = self.peers.lock().await;
        peers.insert(addr, Peer::new(addr, writer, shutdown));
    }

    /// Attaches a display name to an already-registered entry.
    pub async fn promote(&self, addr: &SocketAddr, name: String) -> Result<(), RegistryError> {
        let mut peers = self.peers.lock().await;
        match peers.get_mut(addr) {
            Some(peer) => {
                peer.set_display_name(name);
                Ok(())
            }
            None => Err(RegistryError::UnknownConnection(*addr)),
        }
    }

    /// Removes an entry, returning it so the caller can close or signal it.
    /// Absent entries are a silent no-op. Dropping the returned peer closes
    /// its write half.
    pub async fn unregister(&self, addr: &SocketAddr) -> Option<Peer<W>> {
        let mut peers = self.peers.lock().await;
        peers.remove(addr)
    }

    /// Removes and returns every entry. Used by the operator `quit` path.
    pub async fn drain(&self) -> Vec<Peer<W>> {
        let mut peers = self.peers.lock().await;
        peers.drain().map(|(_, peer)| peer).collect()
    }

    /// Consistent point-in-time enumeration of all entries, pending and named.
    pub async fn snapshot(&self) -> Vec<PeerInfo> {
        let peers = self.peers.lock().await;
        peers
            .values()
            .map(|peer| PeerInfo {
                addr: *peer.remote_addr(),
                display_name: peer.display_name().cloned(),
            })
            .collect()
    }

    /// Writes one payload to one registered peer.
    pub async fn send_to(&self, addr: &SocketAddr, payload: &str) -> Result<(), RegistryError> {
        let mut peers = self.peers.lock().await;
        let peer = peers
            .get_mut(addr)
            .ok_or(RegistryError::UnknownConnection(*addr))?;
        peer.writer_mut()
            .write_all(payload.as_bytes())
            .await
            .map_err(|e| RegistryError::Delivery(*addr, e))
    }

    pub async fn len(&self) -> usize {
        let peers = self.peers.lock().await;
        peers.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{}", port).parse().unwrap()
    }

    fn shutdown() -> Arc<Notify> {
        Arc::new(Notify::new())
    }

    /// Every named entry in a snapshot must also be an addressed entry.
    fn assert_names_subset_of_addresses(snapshot: &[PeerInfo]) {
        let addresses: Vec<SocketAddr> = snapshot.iter().map(|p| p.addr).collect();
        for info in snapshot.iter().filter(|p| p.is_named()) {
            assert!(addresses.contains(&info.addr));
        }
    }

    #[tokio::test]
    async fn test_register_then_promote() {
        let registry: Registry<Vec<u8>> = Registry::new();

        registry.register(addr(1000), Vec::new(), shutdown()).await;
        registry.register(addr(1001), Vec::new(), shutdown()).await;
        assert_names_subset_of_addresses(&registry.snapshot().await);

        registry
            .promote(&addr(1000), "Alice".to_string())
            .await
            .unwrap();

        let snapshot = registry.snapshot().await;
        assert_names_subset_of_addresses(&snapshot);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.iter().filter(|p| p.is_named()).count(), 1);

        let alice = snapshot.iter().find(|p| p.addr == addr(1000)).unwrap();
        assert_eq!(alice.display_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_promote_unknown_connection_fails() {
        let registry: Registry<Vec<u8>> = Registry::new();

        let result = registry.promote(&addr(2000), "Ghost".to_string()).await;
        assert!(matches!(
            result,
            Err(RegistryError::UnknownConnection(a)) if a == addr(2000)
        ));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_unregister_removes_both_facets() {
        let registry: Registry<Vec<u8>> = Registry::new();

        registry.register(addr(3000), Vec::new(), shutdown()).await;
        registry
            .promote(&addr(3000), "Alice".to_string())
            .await
            .unwrap();

        let removed = registry.unregister(&addr(3000)).await;
        assert_eq!(
            removed.and_then(|p| p.display_name().cloned()).as_deref(),
            Some("Alice")
        );
        assert!(registry.snapshot().await.is_empty());

        // Removing again is a silent no-op
        assert!(registry.unregister(&addr(3000)).await.is_none());
    }

    #[tokio::test]
    async fn test_invariant_holds_across_operation_sequence() {
        let registry: Registry<Vec<u8>> = Registry::new();

        registry.register(addr(4000), Vec::new(), shutdown()).await;
        assert_names_subset_of_addresses(&registry.snapshot().await);

        registry.register(addr(4001), Vec::new(), shutdown()).await;
        registry
            .promote(&addr(4001), "Bob".to_string())
            .await
            .unwrap();
        assert_names_subset_of_addresses(&registry.snapshot().await);

        registry.unregister(&addr(4001)).await;
        assert_names_subset_of_addresses(&registry.snapshot().await);

        registry
            .promote(&addr(4000), "Carol".to_string())
            .await
            .unwrap();
        registry.register(addr(4002), Vec::new(), shutdown()).await;
        let snapshot = registry.snapshot().await;
        assert_names_subset_of_addresses(&snapshot);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.iter().filter(|p| p.is_named()).count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_names_are_allowed() {
        let registry: Registry<Vec<u8>> = Registry::new();

        registry.register(addr(5000), Vec::new(), shutdown()).await;
        registry.register(addr(5001), Vec::new(), shutdown()).await;
        registry
            .promote(&addr(5000), "Echo".to_string())
            .await
            .unwrap();
        registry
            .promote(&addr(5001), "Echo".to_string())
            .await
            .unwrap();

        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.iter().filter(|p| p.is_named()).count(), 2);
    }

    #[tokio::test]
    async fn test_send_to_writes_payload() {
        let registry: Registry<Vec<u8>> = Registry::new();

        registry.register(addr(6000), Vec::new(), shutdown()).await;
        registry.send_to(&addr(6000), "hello").await.unwrap();

        let mut peer = registry.unregister(&addr(6000)).await.unwrap();
        assert_eq!(peer.writer_mut().as_slice(), b"hello");
    }

    #[tokio::test]
    async fn test_send_to_unknown_connection_fails() {
        let registry: Registry<Vec<u8>> = Registry::new();

        let result = registry.send_to(&addr(7000), "hello").await;
        assert!(matches!(
            result,
            Err(RegistryError::UnknownConnection(a)) if a == addr(7000)
        ));
    }

    #[tokio::test]
    async fn test_drain_empties_registry() {
        let registry: Registry<Vec<u8>> = Registry::new();

        registry.register(addr(8000), Vec::new(), shutdown()).await;
        registry.register(addr(8001), Vec::new(), shutdown()).await;

        let drained = registry.drain().await;
        assert_eq!(drained.len(), 2);
        assert!(registry.is_empty().await);
    }
}
