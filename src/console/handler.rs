//! Console command loop and dispatch.
//!
//! Runs as its own task alongside the acceptor; every registry or broadcast
//! touch goes through the same shared handles the session tasks use, so the
//! operator never races them unprotected.

use log::{info, warn};
use std::io::{self, Write as _};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, Lines};

use crate::broadcast::Broadcaster;
use crate::console::commands::{ConsoleCommand, parse_command};
use crate::error::ConsoleError;
use crate::protocol;
use crate::registry::{PeerInfo, Registry};

pub const BANNER: &str = r#"
#################################################
##                                             ##
##             Ember Chat - SERVER             ##
##                                             ##
#################################################

Type 'help' to see a list of available server commands."#;

/// Serializes administrative commands against the registry and the
/// broadcast engine. Generic over the input reader so the loop can be fed
/// from something other than stdin.
pub struct Console<W, R> {
    registry: Arc<Registry<W>>,
    broadcaster: Broadcaster<W>,
    input: Lines<R>,
}

impl<W, R> Console<W, R>
where
    W: AsyncWrite + Unpin,
    R: AsyncBufRead + Unpin,
{
    pub fn new(registry: Arc<Registry<W>>, broadcaster: Broadcaster<W>, input: R) -> Self {
        Self {
            registry,
            broadcaster,
            input: input.lines(),
        }
    }

    /// Reads operator lines until the input closes or `quit` stops the
    /// process.
    pub async fn run(mut self) {
        println!("{}", BANNER);

        loop {
            prompt(">> ");
            match self.input.next_line().await {
                Ok(Some(line)) => self.dispatch(parse_command(&line)).await,
                Ok(None) => {
                    info!("Console input closed");
                    return;
                }
                Err(e) => {
                    warn!("Failed to read console input: {}", e);
                    return;
                }
            }
        }
    }

    async fn dispatch(&mut self, command: ConsoleCommand) {
        match command {
            ConsoleCommand::Help => {
                println!("BC   - Broadcast a message to the chat room.");
                println!("CLS  - Clear the screen.");
                println!("HELP - Provides help information for server commands.");
                println!("KICK - Kick a client from the server.");
                println!("LS   - List the current connections.");
                println!("QUIT - Close every connection and stop the server.");
            }
            ConsoleCommand::Broadcast => {
                prompt("What would you like to broadcast?\n>> ");
                if let Ok(Some(text)) = self.input.next_line().await {
                    self.broadcaster
                        .broadcast(&text, protocol::SERVER_PREFIX)
                        .await;
                }
            }
            ConsoleCommand::ClearScreen => {
                clear_screen();
                println!("{}", BANNER);
            }
            ConsoleCommand::List => {
                for line in format_roster(&self.registry.snapshot().await) {
                    println!("{}", line);
                }
            }
            ConsoleCommand::Kick => self.kick().await,
            ConsoleCommand::Quit => self.quit().await,
            ConsoleCommand::Empty => {}
            ConsoleCommand::Unknown(cmd) => {
                println!("'{}' is not a valid server command", cmd);
            }
        }
    }

    async fn kick(&mut self) {
        let snapshot = self.registry.snapshot().await;

        println!("Who would you like to kick from the chat?\n");
        for line in format_kick_menu(&snapshot) {
            println!("{}", line);
        }

        prompt("\n>> ");
        let selection = match self.input.next_line().await {
            Ok(Some(selection)) => selection,
            _ => return,
        };

        match kick_by_index(&self.registry, &self.broadcaster, &snapshot, &selection).await {
            Ok(name) => info!("Client '{}' has been kicked", name),
            Err(e) => println!("{}", e),
        }
    }

    /// Closes every registered connection, named or pending, then stops the
    /// server process.
    async fn quit(&mut self) {
        for peer in self.registry.drain().await {
            match peer.display_name() {
                Some(name) => info!("Closing client '{}' ~ {}", name, peer.remote_addr()),
                None => info!("Closing connection {}", peer.remote_addr()),
            }
            peer.shutdown_handle().notify_one();
        }

        info!("Server shutting down");
        std::process::exit(0);
    }
}

/// Roster lines for `ls`: named connections show name, host, and port;
/// pending connections show host and port only. Order follows the snapshot.
pub fn format_roster(snapshot: &[PeerInfo]) -> Vec<String> {
    snapshot
        .iter()
        .map(|info| match &info.display_name {
            Some(name) => format!(
                "Client: '{}' ~ {}:{}",
                name,
                info.addr.ip(),
                info.addr.port()
            ),
            None => format!("Connection: {}:{}", info.addr.ip(), info.addr.port()),
        })
        .collect()
}

/// Kick menu lines: only named connections, numbered from 1 in snapshot
/// order.
pub fn format_kick_menu(snapshot: &[PeerInfo]) -> Vec<String> {
    snapshot
        .iter()
        .filter(|info| info.is_named())
        .enumerate()
        .map(|(i, info)| {
            format!(
                "[{}] {}",
                i + 1,
                info.display_name.as_deref().unwrap_or("")
            )
        })
        .collect()
}

/// Resolves a 1-based selection against the named entries of `snapshot`,
/// sends the kick notice to that peer, announces the removal to the room,
/// and unregisters the connection, waking its session task. Invalid input
/// (non-numeric, zero, or past the end of the list) reports an error and
/// performs no mutation.
pub async fn kick_by_index<W: AsyncWrite + Unpin>(
    registry: &Registry<W>,
    broadcaster: &Broadcaster<W>,
    snapshot: &[PeerInfo],
    selection: &str,
) -> Result<String, ConsoleError> {
    let named: Vec<&PeerInfo> = snapshot.iter().filter(|info| info.is_named()).collect();

    let index: usize = selection
        .trim()
        .parse()
        .map_err(|_| ConsoleError::InvalidSelection(selection.trim().to_string()))?;
    if index == 0 || index > named.len() {
        return Err(ConsoleError::SelectionOutOfRange(index));
    }

    let target = named[index - 1];
    let name = target.display_name.clone().unwrap_or_default();

    if let Err(e) = registry.send_to(&target.addr, protocol::KICK_NOTICE).await {
        warn!("Failed to send kick notice to {}: {}", target.addr, e);
    }
    broadcaster
        .broadcast(&protocol::kick_broadcast(&name), "")
        .await;

    if let Some(peer) = registry.unregister(&target.addr).await {
        peer.shutdown_handle().notify_one();
    }

    Ok(name)
}

fn prompt(text: &str) {
    print!("{}", text);
    let _ = io::stdout().flush();
}

fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
    let _ = io::stdout().flush();
}
