//! Companion chat client
//!
//! Connects to the server with a bounded retry loop, then runs two loops:
//! one printing inbound broadcasts, one forwarding typed lines.

pub mod connect;
pub mod session;

pub use connect::connect_with_retry;
pub use session::run_client;
