//! Session types: the record of one client's connection to a server.

use std::fmt;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The current state of the session's connection lifecycle.
///
/// This is an explicit state machine — one enum instead of a pair of
/// `connected`/`logged_in` booleans, so impossible combinations (logged
/// in but not connected) cannot be represented at all.
///
/// ```text
///                    ┌──(open)──→ Connected ──(login)──→ Authenticating
///                    │                ↑                        │
/// Disconnected ──(connect)──→ Connecting                (auth ok)│(auth failed
///       ↑            │                └────────────────────────┘   → Connected)
///       │         (failed)                                     ↓
///       └────────────┴──────(close/error/disconnect)──── Authenticated
/// ```
///
/// Any channel loss or explicit `disconnect` from a non-`Disconnected`
/// state lands back in `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No connection. The initial and terminal state.
    #[default]
    Disconnected,

    /// An outbound connection attempt is in flight.
    Connecting,

    /// The channel is open; no identity has been established.
    Connected,

    /// Credentials have been sent; waiting for the server's verdict.
    Authenticating,

    /// The server confirmed the login. `Session::username` is set.
    Authenticated,
}

impl SessionState {
    /// Whether the underlying channel is open in this state.
    pub fn is_connected(self) -> bool {
        matches!(
            self,
            Self::Connected | Self::Authenticating | Self::Authenticated
        )
    }

    /// Whether fire-and-forget send operations are permitted.
    ///
    /// Sends are allowed in `Connected` and `Authenticated` only; a
    /// session mid-login holds its outbound traffic.
    pub fn can_send(self) -> bool {
        matches!(self, Self::Connected | Self::Authenticated)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The record of one session.
///
/// Populated while a connection lives; reset to defaults by `disconnect`
/// or a channel loss, except `last_error`, which survives so the caller
/// can read why the previous session ended.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Current lifecycle state.
    pub state: SessionState,

    /// The endpoint of the current connection attempt, if any.
    pub endpoint_url: Option<String>,

    /// The authenticated username. `Some` only in `Authenticated`.
    pub username: Option<String>,

    /// Why the last session ended, if it ended in failure.
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_disconnected() {
        assert_eq!(SessionState::default(), SessionState::Disconnected);
    }

    #[test]
    fn test_is_connected_per_state() {
        assert!(!SessionState::Disconnected.is_connected());
        assert!(!SessionState::Connecting.is_connected());
        assert!(SessionState::Connected.is_connected());
        assert!(SessionState::Authenticating.is_connected());
        assert!(SessionState::Authenticated.is_connected());
    }

    #[test]
    fn test_can_send_only_connected_and_authenticated() {
        assert!(!SessionState::Disconnected.can_send());
        assert!(!SessionState::Connecting.can_send());
        assert!(SessionState::Connected.can_send());
        assert!(!SessionState::Authenticating.can_send());
        assert!(SessionState::Authenticated.can_send());
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(SessionState::Authenticating.to_string(), "authenticating");
    }
}
