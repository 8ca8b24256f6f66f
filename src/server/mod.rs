//! Server composition
//!
//! Binds the listening socket and spawns one session task per accepted
//! connection.

pub mod core;

pub use core::{ChatRegistry, ChatServer};
