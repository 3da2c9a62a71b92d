//! The session state machine: the single place session state mutates.
//!
//! `SessionMachine` is NOT thread-safe by itself — it is a plain struct
//! with no interior locking. The async driver above serializes every
//! input (caller operations and channel events) and applies them here one
//! at a time, in arrival order.
//!
//! Each input causes at most one state transition and emits at most one
//! [`SessionEvent`].

use huddle_protocol::Frame;
use huddle_transport::ConnectionId;

use crate::{
    Roster, Session, SessionError, SessionEvent, SessionState,
    VariableStore,
};

/// The connection lifecycle state machine plus the state it guards.
///
/// ## Lifecycle
///
/// ```text
/// begin_connect() ──→ channel_opened() ──→ begin_login() ──→ frame_received(AuthResult)
///       │                    │                  │                      │
///       ▼                    ▼                  ▼                      ▼
/// [Connecting]          [Connected]      [Authenticating]       [Authenticated]
///       │                    │                  │                      │
///       └────────────────────┴──── channel_closed / channel_failed ────┘
///                                  └──→ [Disconnected] (state cleared)
/// ```
///
/// Every connection attempt is stamped with a fresh [`ConnectionId`];
/// channel inputs carrying any other id belong to an abandoned attempt
/// and are ignored outright, so a slow dial can never corrupt a newer
/// session.
pub struct SessionMachine {
    session: Session,
    variables: VariableStore,
    roster: Roster,
    /// The stamped id of the live connection attempt, if any.
    current: Option<ConnectionId>,
    /// Monotonic source for attempt ids.
    next_attempt: u64,
    /// Username offered in the outstanding login, used when the server's
    /// success response omits one.
    pending_username: Option<String>,
}

impl SessionMachine {
    /// Creates a machine in the `Disconnected` state.
    pub fn new() -> Self {
        Self {
            session: Session::default(),
            variables: VariableStore::new(),
            roster: Roster::new(),
            current: None,
            next_attempt: 1,
            pending_username: None,
        }
    }

    // -----------------------------------------------------------------
    // Caller operations
    // -----------------------------------------------------------------

    /// Starts a connection attempt: `Disconnected → Connecting`.
    ///
    /// Returns the stamped [`ConnectionId`] the caller must attach to
    /// every channel input for this attempt.
    ///
    /// # Errors
    /// - [`SessionError::InvalidEndpoint`] — empty URL or a scheme other
    ///   than `ws`/`wss`.
    /// - [`SessionError::AlreadyConnected`] — any non-`Disconnected`
    ///   state; callers must `disconnect` first.
    pub fn begin_connect(
        &mut self,
        url: &str,
    ) -> Result<ConnectionId, SessionError> {
        if self.session.state != SessionState::Disconnected {
            return Err(SessionError::AlreadyConnected(self.session.state));
        }
        if url.is_empty()
            || !(url.starts_with("ws://") || url.starts_with("wss://"))
        {
            return Err(SessionError::InvalidEndpoint(url.to_owned()));
        }

        let id = ConnectionId::new(self.next_attempt);
        self.next_attempt += 1;
        self.current = Some(id);
        self.session.state = SessionState::Connecting;
        self.session.endpoint_url = Some(url.to_owned());
        self.session.last_error = None;

        tracing::info!(%id, url, "connection attempt started");
        Ok(id)
    }

    /// Starts a login: `Connected → Authenticating`.
    ///
    /// Returns the `auth` frame to send. In any state other than
    /// `Connected` or `Authenticating` this is a silent no-op returning
    /// `Ok(None)` — the fire-and-forget contract of the host caller.
    ///
    /// # Errors
    /// [`SessionError::AlreadyAuthenticating`] if a login is already
    /// outstanding.
    pub fn begin_login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<Option<Frame>, SessionError> {
        match self.session.state {
            SessionState::Authenticating => {
                Err(SessionError::AlreadyAuthenticating)
            }
            SessionState::Connected => {
                self.session.state = SessionState::Authenticating;
                self.pending_username = Some(username.to_owned());
                tracing::info!(username, "login attempt started");
                Ok(Some(Frame::Auth {
                    username: username.to_owned(),
                    password: password.to_owned(),
                }))
            }
            state => {
                tracing::debug!(%state, "login ignored in this state");
                Ok(None)
            }
        }
    }

    /// Ends the session from any state: `* → Disconnected`.
    ///
    /// Emits `Disconnected` when a session was actually live; calling
    /// this while already `Disconnected` is a no-op.
    pub fn disconnect(&mut self) -> Option<SessionEvent> {
        if self.session.state == SessionState::Disconnected {
            return None;
        }
        tracing::info!(state = %self.session.state, "disconnecting");
        self.reset();
        Some(SessionEvent::Disconnected)
    }

    /// Whether fire-and-forget sends are currently permitted.
    ///
    /// Callers drop the send silently when this is `false` — a
    /// disconnected session never raises an error for a command it
    /// cannot deliver.
    pub fn can_send(&self) -> bool {
        self.session.state.can_send()
    }

    // -----------------------------------------------------------------
    // Channel inputs (delivered by the driver, in arrival order)
    // -----------------------------------------------------------------

    /// The channel for attempt `id` opened.
    pub fn channel_opened(
        &mut self,
        id: ConnectionId,
    ) -> Option<SessionEvent> {
        if self.is_stale(id) {
            return None;
        }
        match self.session.state {
            SessionState::Connecting => {
                self.session.state = SessionState::Connected;
                tracing::info!(%id, "channel open");
                Some(SessionEvent::Connected)
            }
            state => {
                tracing::debug!(%id, %state, "ignoring open in this state");
                None
            }
        }
    }

    /// The channel for attempt `id` closed, with an optional close code.
    pub fn channel_closed(
        &mut self,
        id: ConnectionId,
        code: Option<u16>,
    ) -> Option<SessionEvent> {
        let reason = match code {
            Some(code) => format!("channel closed (code {code})"),
            None => "channel closed".to_owned(),
        };
        self.channel_lost(id, reason)
    }

    /// The channel for attempt `id` failed with an error.
    pub fn channel_failed(
        &mut self,
        id: ConnectionId,
        reason: &str,
    ) -> Option<SessionEvent> {
        self.channel_lost(id, reason.to_owned())
    }

    /// A decoded frame arrived on the channel for attempt `id`.
    ///
    /// Malformed text never reaches this method — the driver drops it at
    /// the codec. Frames that make no sense in the current state are
    /// logged and ignored without touching session state.
    pub fn frame_received(
        &mut self,
        id: ConnectionId,
        frame: Frame,
    ) -> Option<SessionEvent> {
        if self.is_stale(id) {
            return None;
        }
        match frame {
            Frame::Broadcast { message } => {
                Some(SessionEvent::MessageReceived { message })
            }
            Frame::SetVariable { name, value } => {
                tracing::debug!(name, value, "variable set");
                self.variables.apply_set(&name, value);
                None
            }
            Frame::ChangeVariable { name, delta } => {
                tracing::debug!(name, delta, "variable changed");
                self.variables.apply_change(&name, delta);
                None
            }
            Frame::Roster { entries } => {
                tracing::debug!(peers = entries.len(), "roster replaced");
                self.roster.replace(entries);
                None
            }
            Frame::AuthResult { success, username } => {
                self.auth_result(success, username)
            }
            Frame::Custom { name, payload } => {
                Some(SessionEvent::CustomMessageReceived { name, payload })
            }
            Frame::Auth { .. } => {
                tracing::warn!("server sent a client-bound auth frame");
                None
            }
        }
    }

    // -----------------------------------------------------------------
    // Read accessors
    // -----------------------------------------------------------------

    /// The full session record (state, endpoint, username, last error).
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.session.state
    }

    /// Whether the channel is open.
    pub fn is_connected(&self) -> bool {
        self.session.state.is_connected()
    }

    /// Whether the server has confirmed a login.
    pub fn is_authenticated(&self) -> bool {
        self.session.state == SessionState::Authenticated
    }

    /// The authenticated username, if any.
    pub fn username(&self) -> Option<&str> {
        self.session.username.as_deref()
    }

    /// The endpoint of the live connection attempt, if any.
    pub fn endpoint_url(&self) -> Option<&str> {
        self.session.endpoint_url.as_deref()
    }

    /// Why the last session ended, if it ended in failure.
    pub fn last_error(&self) -> Option<&str> {
        self.session.last_error.as_deref()
    }

    /// Read access to the shared variable mirror.
    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    /// Read access to the peer roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    /// Handles the server's verdict on an outstanding login.
    fn auth_result(
        &mut self,
        success: bool,
        username: Option<String>,
    ) -> Option<SessionEvent> {
        if self.session.state != SessionState::Authenticating {
            tracing::debug!(
                state = %self.session.state,
                "ignoring authResult with no login outstanding"
            );
            return None;
        }

        let pending = self.pending_username.take();
        if success {
            // Prefer the server's canonical spelling of the username,
            // falling back to what the login offered.
            let username =
                username.or(pending).unwrap_or_default();
            self.session.state = SessionState::Authenticated;
            self.session.username = Some(username.clone());
            tracing::info!(username, "authenticated");
            Some(SessionEvent::Authenticated { username })
        } else {
            self.session.state = SessionState::Connected;
            tracing::info!("authentication rejected");
            Some(SessionEvent::AuthenticationFailed)
        }
    }

    /// A channel input reported loss of the connection.
    fn channel_lost(
        &mut self,
        id: ConnectionId,
        reason: String,
    ) -> Option<SessionEvent> {
        if self.is_stale(id) {
            return None;
        }
        match self.session.state {
            SessionState::Disconnected => None,
            SessionState::Connecting => {
                tracing::info!(%id, reason, "connection attempt failed");
                self.reset();
                self.session.last_error = Some(reason.clone());
                Some(SessionEvent::ConnectionFailed { reason })
            }
            _ => {
                tracing::info!(%id, reason, "channel lost");
                self.reset();
                self.session.last_error = Some(reason);
                Some(SessionEvent::Disconnected)
            }
        }
    }

    /// Whether a channel input belongs to an abandoned attempt.
    fn is_stale(&self, id: ConnectionId) -> bool {
        if self.current == Some(id) {
            return false;
        }
        tracing::debug!(%id, "ignoring event from stale connection attempt");
        true
    }

    /// Clears everything a session owns. `last_error` is left for the
    /// caller to overwrite or read.
    fn reset(&mut self) {
        self.session.state = SessionState::Disconnected;
        self.session.endpoint_url = None;
        self.session.username = None;
        self.current = None;
        self.pending_username = None;
        self.variables.clear();
        self.roster.clear();
    }
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
