//! Operator console
//!
//! Line-oriented administrative commands read from the server terminal and
//! dispatched against the shared registry and broadcast engine.

pub mod commands;
pub mod handler;

pub use commands::{ConsoleCommand, parse_command};
pub use handler::{BANNER, Console, format_kick_menu, format_roster, kick_by_index};
