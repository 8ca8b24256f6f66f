//! Session state machine
//!
//! Whether a connection "is in the chat" is carried here explicitly rather
//! than being inferred from registry membership, so transitions can be
//! exercised without any socket.

use std::net::SocketAddr;

/// Lifecycle states of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Socket accepted, not yet in the registry.
    Connecting,
    /// Registered; waiting for the first payload to become the display name.
    Pending,
    /// Named and chatting.
    Active,
    /// On the way out: quit, kick, or disconnect. Terminal.
    Terminating,
}

/// Per-connection lifecycle, independent of any socket.
#[derive(Debug)]
pub struct Session {
    remote_addr: SocketAddr,
    state: SessionState,
    display_name: Option<String>,
}

impl Session {
    pub fn new(remote_addr: SocketAddr) -> Self {
        Self {
            remote_addr,
            state: SessionState::Connecting,
            display_name: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn remote_addr(&self) -> &SocketAddr {
        &self.remote_addr
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.state == SessionState::Pending
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Connecting -> Pending, once the registry entry exists.
    pub fn register(&mut self) {
        if self.state == SessionState::Connecting {
            self.state = SessionState::Pending;
        }
    }

    /// Pending -> Active. The display name is set exactly once; a second
    /// activation keeps the first name.
    pub fn activate(&mut self, name: String) {
        if self.state != SessionState::Pending {
            return;
        }
        if self.display_name.is_none() {
            self.display_name = Some(name);
        }
        self.state = SessionState::Active;
    }

    /// Any state -> Terminating.
    pub fn terminate(&mut self) {
        self.state = SessionState::Terminating;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("127.0.0.1:40000".parse().unwrap())
    }

    #[test]
    fn test_full_lifecycle() {
        let mut session = session();
        assert_eq!(session.state(), SessionState::Connecting);

        session.register();
        assert_eq!(session.state(), SessionState::Pending);
        assert!(session.is_pending());
        assert!(session.display_name().is_none());

        session.activate("Alice".to_string());
        assert_eq!(session.state(), SessionState::Active);
        assert!(session.is_active());
        assert_eq!(session.display_name(), Some("Alice"));

        session.terminate();
        assert_eq!(session.state(), SessionState::Terminating);
        assert_eq!(session.display_name(), Some("Alice"));
    }

    #[test]
    fn test_activate_requires_pending() {
        let mut session = session();
        session.activate("Early".to_string());
        assert_eq!(session.state(), SessionState::Connecting);
        assert!(session.display_name().is_none());
    }

    #[test]
    fn test_display_name_set_exactly_once() {
        let mut session = session();
        session.register();
        session.activate("First".to_string());

        // A second activation must not rename the session.
        session.activate("Second".to_string());
        assert_eq!(session.display_name(), Some("First"));
    }

    #[test]
    fn test_terminate_from_pending() {
        let mut session = session();
        session.register();
        session.terminate();
        assert_eq!(session.state(), SessionState::Terminating);
        assert!(session.display_name().is_none());
    }
}
