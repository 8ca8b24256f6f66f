//! Wire protocol strings and message composition.
//!
//! The wire format is plain text over TCP with no framing: each socket read
//! is handed to the rest of the system as one opaque message, so a payload
//! split across TCP segments arrives as two messages. Multi-segment payloads
//! are therefore not reliable; callers depend on the one-read-one-message
//! behavior and it must not be "fixed" with length prefixes or newline
//! framing.
//!
//! Two further documented limitations: the display name is whatever bytes
//! arrive first on a new connection, with no validation, length limit, or
//! uniqueness check; and the quit sentinel is a plain string that ordinary
//! chat content can collide with.

/// Reserved token that ends a session. Never delivered as chat.
pub const QUIT_SENTINEL: &str = "<quit>";

/// Prefix for operator broadcasts.
pub const SERVER_PREFIX: &str = "\nSERVER: ";

/// Sent once per connection, before the first payload is read.
pub const GREETING: &str =
    "Greetings! Welcome to the chat room!\nPlease enter your name to get started.";

/// Notice sent to a peer the operator is about to disconnect.
pub const KICK_NOTICE: &str = "\nSorry, you have been kicked from the server.";

/// Welcome line sent to a peer right after its name is accepted.
pub fn welcome(name: &str) -> String {
    format!(
        "\nWelcome {}!\nIf you ever want to exit, type {} in the chat.",
        name, QUIT_SENTINEL
    )
}

/// Room-wide notice that a peer has joined.
pub fn join_notice(name: &str) -> String {
    format!("\n{} has joined the chat room!", name)
}

/// Room-wide notice that a peer has left.
pub fn departure_notice(name: &str) -> String {
    format!("\n{} has left the chat room.", name)
}

/// Room-wide notice that a peer was removed by the operator.
pub fn kick_broadcast(name: &str) -> String {
    format!("\n{} has been kicked from the server!", name)
}

/// Prefix attached to a peer's chat lines.
pub fn chat_prefix(name: &str) -> String {
    format!("\n{}: ", name)
}
