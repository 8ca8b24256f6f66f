//! Error types
//!
//! Domain-specific error types for each module of the chat service. A read
//! or write failure on an individual peer is never fatal to the server;
//! these types exist so each failure is reported where it happened.

use std::fmt;
use std::io;
use std::net::SocketAddr;

/// Connection registry errors
#[derive(Debug)]
pub enum RegistryError {
    /// An operation referenced an address that was never registered.
    /// Indicates a logic error or a lost race with a concurrent removal.
    UnknownConnection(SocketAddr),
    /// A targeted send to one peer failed at the socket layer.
    Delivery(SocketAddr, io::Error),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnknownConnection(addr) => {
                write!(f, "Unknown connection: {}", addr)
            }
            RegistryError::Delivery(addr, e) => {
                write!(f, "Failed to deliver to {}: {}", addr, e)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Client connector errors
#[derive(Debug)]
pub enum ConnectError {
    /// The server stayed unreachable through the initial attempt and every
    /// configured retry.
    RetriesExhausted { attempts: usize, source: io::Error },
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectError::RetriesExhausted { attempts, source } => {
                write!(
                    f,
                    "Could not contact the chat server after {} attempts: {}",
                    attempts, source
                )
            }
        }
    }
}

impl std::error::Error for ConnectError {}

/// Operator console errors
#[derive(Debug)]
pub enum ConsoleError {
    /// Kick selection was not a number.
    InvalidSelection(String),
    /// Kick selection was 0 or past the end of the active list.
    SelectionOutOfRange(usize),
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::InvalidSelection(input) => {
                write!(f, "Invalid selection: '{}'", input)
            }
            ConsoleError::SelectionOutOfRange(index) => {
                write!(f, "No connection at index {}", index)
            }
        }
    }
}

impl std::error::Error for ConsoleError {}
