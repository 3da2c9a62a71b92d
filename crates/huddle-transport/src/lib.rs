//! Transport abstraction layer for Huddle.
//!
//! Provides the [`Dialer`] and [`Connection`] traits that abstract over the
//! outbound connection to a multiplayer server. A dialer opens exactly one
//! connection per call; the session layer above decides when to dial and
//! when to give up.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketDialer};

use std::fmt;

/// Opaque identifier for one connection attempt.
///
/// The session layer stamps every attempt with a fresh id and ignores
/// events from attempts it has abandoned, so the id must stay attached to
/// the connection for its whole life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Opens outbound connections to a server endpoint.
pub trait Dialer: Send + Sync + 'static {
    /// The connection type produced by this dialer.
    type Connection: Connection;
    /// The error type for dial operations.
    type Error: std::error::Error + Send + Sync;

    /// Connects to the given endpoint URL.
    ///
    /// The caller supplies the `id` so that log lines and channel events
    /// can be correlated with the session's connection attempt.
    async fn dial(
        &self,
        url: &str,
        id: ConnectionId,
    ) -> Result<Self::Connection, Self::Error>;
}

/// A single open connection that exchanges text messages with the server.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one text message to the server.
    async fn send(&self, text: &str) -> Result<(), Self::Error>;

    /// Receives the next message from the server.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv(&self) -> Result<Option<String>, Self::Error>;

    /// Closes the connection. Safe to call more than once.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the identifier of the attempt that produced this connection.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        let id = ConnectionId::new(7);
        assert_eq!(id.to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_equality() {
        let a = ConnectionId::new(1);
        let b = ConnectionId::new(1);
        let c = ConnectionId::new(2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_connection_id_distinguishes_stale_attempts() {
        // The session layer compares ids to fence off events from an
        // abandoned dial, so consecutive attempts must never compare equal.
        let attempts: Vec<ConnectionId> =
            (1..=3).map(ConnectionId::new).collect();
        assert_ne!(attempts[0], attempts[1]);
        assert_ne!(attempts[1], attempts[2]);
    }
}
