//! Error types for the session layer.

use crate::SessionState;

/// Errors that can occur during session operations.
///
/// These are the synchronous, precondition-style failures — the caller
/// did something the current state forbids. Network and protocol failures
/// never appear here; they arrive asynchronously as
/// [`SessionEvent`](crate::SessionEvent)s.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The endpoint URL is empty or not a recognized scheme
    /// (`ws://` or `wss://`).
    #[error("invalid endpoint: {0:?}")]
    InvalidEndpoint(String),

    /// `connect` was called while a session is already live.
    /// Callers must `disconnect` first.
    #[error("already connected (session is {0})")]
    AlreadyConnected(SessionState),

    /// `login` was called while a login attempt is still outstanding.
    #[error("a login attempt is already in progress")]
    AlreadyAuthenticating,
}
