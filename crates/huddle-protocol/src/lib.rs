//! Wire protocol for Huddle.
//!
//! This crate defines the "language" that the client and the multiplayer
//! server speak:
//!
//! - **Types** ([`Frame`]) — the tagged envelopes that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how frames are converted
//!   to/from text.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding,
//!   decoding, or validating a frame.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw messages) and session
//! (connection state). It doesn't know about connections or state — it
//! only knows how to serialize, deserialize, and validate frames.
//!
//! ```text
//! Transport (text) → Protocol (Frame) → Session (state machine)
//! ```
//!
//! Decoding is defensive: any inbound text that is not a recognized,
//! well-formed envelope yields [`ProtocolError::MalformedFrame`], which
//! callers log and discard. A single bad frame must never tear down a
//! live session.

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::Frame;
