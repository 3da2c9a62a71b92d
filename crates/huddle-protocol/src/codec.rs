//! Codec trait and implementations for serializing/deserializing frames.
//!
//! The protocol layer doesn't care HOW messages are serialized — it just
//! needs something that implements the [`Codec`] trait. [`JsonCodec`] is
//! the wire format the multiplayer protocol specifies (one JSON object per
//! message); the trait seam keeps a future binary codec from touching any
//! other code.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that converts between Rust types and wire text.
///
/// `Send + Sync + 'static` because the codec is shared with the background
/// connection task and must not borrow temporary data.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into wire text.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<String, ProtocolError>;

    /// Deserializes wire text back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::MalformedFrame`] if the text is not a
    /// well-formed representation of `T`.
    fn decode<T: DeserializeOwned>(
        &self,
        text: &str,
    ) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON (via `serde_json`).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        text: &str,
    ) -> Result<T, ProtocolError> {
        serde_json::from_str(text)
            .map_err(|e| ProtocolError::MalformedFrame(e.to_string()))
    }
}
