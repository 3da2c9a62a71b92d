//! Unified error type for the Huddle client.

use huddle_protocol::ProtocolError;
use huddle_session::SessionError;
use huddle_transport::TransportError;

/// Top-level error that wraps all layer-specific errors.
///
/// Only structural, synchronously detectable failures surface here (bad
/// endpoint, re-entrant connect, a login already in flight). Network and
/// protocol failures are reported asynchronously through
/// [`SessionEvent`](crate::SessionEvent)s, never as errors.
#[derive(Debug, thiserror::Error)]
pub enum HuddleError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, malformed frame).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (precondition violated).
    #[error(transparent)]
    Session(#[from] SessionError),
}
