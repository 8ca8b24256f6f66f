//! Per-connection registry entry.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Notify;

/// One registered connection: its write half, optional display name, and the
/// handle used to wake its session task on an operator kick.
///
/// The display name starts absent (a pending connection) and is set exactly
/// once when the peer joins the chat. Names are not required to be unique;
/// two peers may share one.
pub struct Peer<W> {
    writer: W,
    remote_addr: SocketAddr,
    display_name: Option<String>,
    shutdown: Arc<Notify>,
}

impl<W> Peer<W> {
    pub fn new(remote_addr: SocketAddr, writer: W, shutdown: Arc<Notify>) -> Self {
        Self {
            writer,
            remote_addr,
            display_name: None,
            shutdown,
        }
    }

    /// Returns the display name if the peer has joined the chat.
    pub fn display_name(&self) -> Option<&String> {
        self.display_name.as_ref()
    }

    /// Returns the address captured at accept time.
    pub fn remote_addr(&self) -> &SocketAddr {
        &self.remote_addr
    }

    /// Returns the handle that wakes this peer's session task.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.shutdown)
    }

    pub(crate) fn set_display_name(&mut self, name: String) {
        self.display_name = Some(name);
    }

    pub(crate) fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }
}

/// Point-in-time view of one registry entry, safe to hold outside the lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerInfo {
    pub addr: SocketAddr,
    pub display_name: Option<String>,
}

impl PeerInfo {
    /// Whether the connection has joined the chat with a name.
    pub fn is_named(&self) -> bool {
        self.display_name.is_some()
    }
}
