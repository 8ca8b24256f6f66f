//! Session handler
//!
//! Drives one connection from greeting to close. The first payload a
//! connection sends becomes its display name, verbatim; after that every
//! payload is either the quit sentinel or a chat line to relay. Reads block
//! only this session's task, and no read here has a timeout: a peer that
//! never sends anything holds its task (and registry entry) indefinitely.
//!
//! Failure semantics: a read error or EOF is a terminal disconnect for this
//! session only. The handler unregisters, announces the departure if the
//! peer had joined, and returns; it never retries the read and never takes
//! another session down with it.

use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Notify;

use crate::broadcast::Broadcaster;
use crate::protocol;
use crate::registry::Registry;
use crate::session::Session;

/// Takes ownership of a freshly accepted TCP connection: greets it,
/// registers the write half, and runs the receive loop to completion.
pub async fn handle_session(
    mut stream: TcpStream,
    remote_addr: SocketAddr,
    registry: Arc<Registry<OwnedWriteHalf>>,
    broadcaster: Broadcaster<OwnedWriteHalf>,
    buffer_size: usize,
) {
    if let Err(e) = stream.write_all(protocol::GREETING.as_bytes()).await {
        warn!("Failed to greet {}: {}", remote_addr, e);
        return;
    }

    let (read_half, write_half) = stream.into_split();
    let shutdown = Arc::new(Notify::new());
    registry
        .register(remote_addr, write_half, Arc::clone(&shutdown))
        .await;

    run_session(
        read_half,
        remote_addr,
        registry,
        broadcaster,
        shutdown,
        buffer_size,
    )
    .await;
}

/// Receive loop for one registered connection. Generic over the read half so
/// the lifecycle can be driven through an in-memory pipe instead of a socket.
///
/// The caller must have registered the connection's write half under
/// `remote_addr` together with the `shutdown` handle; an operator kick
/// removes the entry and fires that handle to end this loop.
pub async fn run_session<R, W>(
    mut reader: R,
    remote_addr: SocketAddr,
    registry: Arc<Registry<W>>,
    broadcaster: Broadcaster<W>,
    shutdown: Arc<Notify>,
    buffer_size: usize,
) where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = Session::new(remote_addr);
    session.register();

    let mut buf = vec![0u8; buffer_size];

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                // Operator kick: the console already sent the notice,
                // announced the removal, and dropped the registry entry.
                session.terminate();
                info!("Session {} closed by operator", remote_addr);
                return;
            }
            read = reader.read(&mut buf) => match read {
                Ok(0) => {
                    disconnect(&mut session, &registry, &broadcaster).await;
                    return;
                }
                Ok(n) => {
                    let payload = String::from_utf8_lossy(&buf[..n]).to_string();

                    if session.is_pending() {
                        let name = payload.clone();
                        if let Err(e) = registry.promote(&remote_addr, payload).await {
                            error!("Failed to promote {}: {}", remote_addr, e);
                            session.terminate();
                            return;
                        }
                        session.activate(name.clone());

                        if let Err(e) = registry
                            .send_to(&remote_addr, &protocol::welcome(&name))
                            .await
                        {
                            warn!("Failed to welcome {}: {}", remote_addr, e);
                        }
                        broadcaster.broadcast(&protocol::join_notice(&name), "").await;
                        info!("Client '{}' ~ {} joined the chat room", name, remote_addr);
                    } else if payload == protocol::QUIT_SENTINEL {
                        client_quit(&mut session, &registry, &broadcaster).await;
                        return;
                    } else {
                        let name = session.display_name().unwrap_or("").to_string();
                        broadcaster
                            .broadcast(&payload, &protocol::chat_prefix(&name))
                            .await;
                    }
                }
                Err(e) => {
                    warn!("Failed to read from {}: {}", remote_addr, e);
                    disconnect(&mut session, &registry, &broadcaster).await;
                    return;
                }
            }
        }
    }
}

/// Client-initiated quit: acknowledge with the sentinel, then leave the room.
async fn client_quit<W: AsyncWrite + Unpin>(
    session: &mut Session,
    registry: &Registry<W>,
    broadcaster: &Broadcaster<W>,
) {
    session.terminate();
    let addr = *session.remote_addr();

    if let Err(e) = registry.send_to(&addr, protocol::QUIT_SENTINEL).await {
        warn!("Failed to acknowledge quit from {}: {}", addr, e);
    }

    leave(session, registry, broadcaster).await;
}

/// Abrupt disconnect: EOF or read failure with no sentinel exchange.
async fn disconnect<W: AsyncWrite + Unpin>(
    session: &mut Session,
    registry: &Registry<W>,
    broadcaster: &Broadcaster<W>,
) {
    session.terminate();
    leave(session, registry, broadcaster).await;
}

/// Shared exit path: unregister, then announce the departure to the peers
/// that remain. If the entry is already gone (a kick won the race), the
/// console has announced the removal and nothing is broadcast here, keeping
/// the notice to exactly one.
async fn leave<W: AsyncWrite + Unpin>(
    session: &mut Session,
    registry: &Registry<W>,
    broadcaster: &Broadcaster<W>,
) {
    let addr = *session.remote_addr();
    if registry.unregister(&addr).await.is_none() {
        return;
    }

    match session.display_name() {
        Some(name) => {
            broadcaster
                .broadcast(&protocol::departure_notice(name), "")
                .await;
            info!("Client '{}' ~ {} disconnected", name, addr);
        }
        None => {
            info!("Connection {} closed before joining the chat", addr);
        }
    }
}
