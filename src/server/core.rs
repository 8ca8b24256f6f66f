use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::net::tcp::OwnedWriteHalf;

use crate::broadcast::Broadcaster;
use crate::config::ChatConfig;
use crate::registry::Registry;
use crate::session::handle_session;

/// Registry entry type for real TCP connections.
pub type ChatRegistry = Registry<OwnedWriteHalf>;

/// The chat server: one listener, one shared registry, one broadcaster.
pub struct ChatServer {
    registry: Arc<ChatRegistry>,
    broadcaster: Broadcaster<OwnedWriteHalf>,
    listener: TcpListener,
    config: Arc<ChatConfig>,
}

impl ChatServer {
    /// Binds the configured address. A bind failure is fatal: the server
    /// cannot run without its listening socket.
    pub async fn new(config: ChatConfig) -> Self {
        let bind_addr = config.socket_addr();

        let listener = match TcpListener::bind(&bind_addr).await {
            Ok(listener) => {
                info!("Server bound to {}", bind_addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", bind_addr, e);
                panic!("Server startup failed on socket {}: {}", bind_addr, e);
            }
        };

        let registry = Arc::new(ChatRegistry::new());
        let broadcaster = Broadcaster::new(Arc::clone(&registry));

        Self {
            registry,
            broadcaster,
            listener,
            config: Arc::new(config),
        }
    }

    /// Shared connection registry, for the operator console and tests.
    pub fn registry(&self) -> Arc<ChatRegistry> {
        Arc::clone(&self.registry)
    }

    /// Broadcast engine over this server's registry.
    pub fn broadcaster(&self) -> Broadcaster<OwnedWriteHalf> {
        self.broadcaster.clone()
    }

    /// Address the listener actually bound (resolves port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop: one spawned session task per connection, so a slow or
    /// stalled peer never blocks the next accept. An accept failure is
    /// fatal to the listening socket and stops the server.
    pub async fn start(&self) {
        info!("Starting chat server on {}", self.config.socket_addr());

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!("{} has connected", addr);

                    let registry = Arc::clone(&self.registry);
                    let broadcaster = self.broadcaster.clone();
                    let buffer_size = self.config.buffer_size;

                    tokio::spawn(async move {
                        handle_session(stream, addr, registry, broadcaster, buffer_size).await;
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    break;
                }
            }
        }

        info!("Listener closed, server stopping");
    }
}
