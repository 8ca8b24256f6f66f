//! Ember Chat - a minimal TCP chat room.
//!
//! A central server accepts connections, attaches an optional display name
//! to each, and relays every message to all connected peers. The companion
//! client forwards operator-typed lines and prints inbound broadcasts.
//!
//! The server core is the registry/broadcast/session subsystem: the
//! [`registry`] tracks live connections, the [`broadcast`] engine fans
//! messages out to them, and the [`session`] handler walks each connection
//! through its lifecycle. The [`console`] serializes operator commands
//! against the same shared state.

pub mod broadcast;
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;

pub use config::ChatConfig;
pub use server::{ChatRegistry, ChatServer};
