//! Error types for the protocol layer.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a frame into wire text).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Inbound text is not a recognized, well-formed envelope: unknown
    /// `type` tag, missing required field, field of the wrong kind, or a
    /// value that violates a frame invariant (empty name, non-finite
    /// number). Non-fatal — callers drop the frame and keep the session.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// A locally built frame violates an invariant and must not be sent.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}
