//! # Huddle
//!
//! Client-side session manager for a multiplayer server: one WebSocket
//! connection, an explicit connection/login state machine, a mirror of
//! server-authoritative shared variables, and a roster of connected peers.
//!
//! The intended host is a fire-and-forget caller (a block-based visual
//! runtime): every command returns immediately, and all asynchronous
//! outcomes — connected, disconnected, authenticated, inbound messages —
//! arrive on a single event stream.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use huddle::{ClientConfig, HuddleClient, SessionEvent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), huddle::HuddleError> {
//!     let (client, mut events) = HuddleClient::new(ClientConfig::default());
//!
//!     client.connect("ws://example.com")?;
//!
//!     while let Some(event) = events.recv().await {
//!         match event {
//!             SessionEvent::Connected => {
//!                 client.login("alice", "secret")?;
//!             }
//!             SessionEvent::Authenticated { username } => {
//!                 println!("logged in as {username}");
//!                 client.broadcast("hello, everyone");
//!             }
//!             SessionEvent::Disconnected => break,
//!             _ => {}
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod driver;
mod error;

pub use client::{ClientConfig, HuddleClient};
pub use error::HuddleError;

pub use huddle_protocol::{Frame, ProtocolError};
pub use huddle_session::{
    RosterEntry, SessionError, SessionEvent, SessionState,
};
pub use huddle_transport::TransportError;
