//! Typed events the session delivers to its host caller.

/// An event raised by the session in response to channel activity.
///
/// Events are the only way the session reports asynchronous outcomes —
/// operations themselves return immediately. For a single connection,
/// events are delivered strictly in the order the channel raised them,
/// and each input causes at most one event.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The channel opened; the session is now `Connected`.
    Connected,

    /// The session ended — explicit `disconnect` or channel loss from a
    /// live state. Fired exactly once per session.
    Disconnected,

    /// A connection attempt failed before the channel opened.
    ConnectionFailed {
        /// The transport's description of the failure.
        reason: String,
    },

    /// The server accepted the login; the session is `Authenticated`.
    Authenticated {
        /// The confirmed username.
        username: String,
    },

    /// The server rejected the login; the session is back to `Connected`.
    AuthenticationFailed,

    /// A broadcast from a peer arrived.
    MessageReceived {
        /// The broadcast text.
        message: String,
    },

    /// An application-defined message arrived.
    CustomMessageReceived {
        /// The message name.
        name: String,
        /// The opaque payload.
        payload: serde_json::Value,
    },
}
