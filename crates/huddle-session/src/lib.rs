//! Session state management for Huddle.
//!
//! This crate is the synchronous core of the client: a connection
//! lifecycle state machine plus the replicated state it guards. It
//! performs no I/O — the async driver in the `huddle` crate feeds it
//! channel events one at a time, in arrival order, and forwards whatever
//! it emits.
//!
//! 1. **State machine** — connection/authentication lifecycle
//!    ([`SessionMachine`], [`SessionState`])
//! 2. **Shared variables** — client mirror of server-authoritative
//!    numbers ([`VariableStore`])
//! 3. **Roster** — the client's view of connected peers ([`Roster`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Client handle (above)  ← calls operations, consumes SessionEvents
//!     ↕
//! Session layer (this crate)  ← owns all mutable session state
//!     ↕
//! Protocol layer (below)  ← provides the Frame types
//! ```

mod error;
mod event;
mod machine;
mod roster;
mod session;
mod variables;

pub use error::SessionError;
pub use event::SessionEvent;
pub use machine::SessionMachine;
pub use roster::{Roster, RosterEntry};
pub use session::{Session, SessionState};
pub use variables::VariableStore;
