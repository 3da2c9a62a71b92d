//! `HuddleClient`: the handle the host caller drives.
//!
//! Every operation returns immediately. Asynchronous outcomes arrive on
//! the event stream returned by [`HuddleClient::new`]; reporter-style
//! queries (`is_connected`, `player_count`, ...) read shared state
//! directly and never block on the network.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use huddle_protocol::{Frame, JsonCodec};
use huddle_session::{SessionEvent, SessionMachine, SessionState};
use huddle_transport::TransportError;

use crate::driver::{run_connection, Command};
use crate::HuddleError;

/// Default capacity of the bounded event channel.
const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Configuration for a [`HuddleClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Capacity of the bounded event channel.
    ///
    /// When the consumer cannot keep up, further events are dropped with
    /// a warning rather than blocking the connection. Values below 1 are
    /// clamped to 1.
    pub event_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ClientConfig {
    /// Sets the capacity of the bounded event channel.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

/// State shared between the client handle and its driver tasks.
pub(crate) struct Shared {
    /// The session core. Plain mutex, never held across an await — every
    /// critical section is a short synchronous transition.
    machine: Mutex<SessionMachine>,
    events: mpsc::Sender<SessionEvent>,
    codec: JsonCodec,
}

impl Shared {
    /// Locks the session machine, recovering from a poisoned lock (a
    /// panicked test thread must not wedge the whole client).
    pub(crate) fn machine(&self) -> MutexGuard<'_, SessionMachine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    /// Applies one input to the machine and forwards its event before the
    /// lock is released, so events reach the caller in transition order
    /// even when the handle and the driver race.
    pub(crate) fn apply(
        &self,
        input: impl FnOnce(&mut SessionMachine) -> Option<SessionEvent>,
    ) {
        let mut machine = self.machine();
        let event = input(&mut machine);
        self.emit(event);
    }

    /// Forwards an emitted event to the caller's receiver, dropping it
    /// with a warning when the consumer lags.
    pub(crate) fn emit(&self, event: Option<SessionEvent>) {
        let Some(event) = event else { return };
        match self.events.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                tracing::warn!(?dropped, "event channel full, dropping");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!("event receiver dropped");
            }
        }
    }
}

/// Client handle for one multiplayer session.
///
/// Created via [`HuddleClient::new`]; all methods are callable from
/// non-async code as long as a Tokio runtime is running (the handle
/// spawns one background driver task per connection attempt).
///
/// Send-style commands (`broadcast`, the variable operations,
/// `send_custom`, `send_message`) are fire-and-forget: while the session
/// is not in a sendable state they do nothing, silently — the host
/// caller has no channel to observe an error from a dropped command.
pub struct HuddleClient {
    shared: Arc<Shared>,
    /// Command queue of the live connection attempt, if any.
    conn: Mutex<Option<mpsc::UnboundedSender<Command>>>,
}

impl HuddleClient {
    /// Creates a client and the event stream it reports on.
    #[must_use = "the event receiver must be used to observe the session"]
    pub fn new(
        config: ClientConfig,
    ) -> (Self, mpsc::Receiver<SessionEvent>) {
        let capacity = config.event_capacity.max(1);
        let (event_tx, event_rx) = mpsc::channel(capacity);

        let client = Self {
            shared: Arc::new(Shared {
                machine: Mutex::new(SessionMachine::new()),
                events: event_tx,
                codec: JsonCodec,
            }),
            conn: Mutex::new(None),
        };
        (client, event_rx)
    }

    // -----------------------------------------------------------------
    // Lifecycle commands
    // -----------------------------------------------------------------

    /// Starts connecting to the given `ws://` or `wss://` endpoint.
    ///
    /// Returns once the attempt is underway; the outcome arrives as a
    /// [`SessionEvent::Connected`] or [`SessionEvent::ConnectionFailed`].
    ///
    /// # Errors
    /// - [`SessionError::InvalidEndpoint`](huddle_session::SessionError)
    ///   for an empty or non-WebSocket URL.
    /// - [`SessionError::AlreadyConnected`](huddle_session::SessionError)
    ///   while a session is live; call [`disconnect`](Self::disconnect)
    ///   first.
    pub fn connect(&self, url: &str) -> Result<(), HuddleError> {
        let id = self.shared.machine().begin_connect(url)?;

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_connection(
            url.to_owned(),
            id,
            Arc::clone(&self.shared),
            cmd_rx,
        ));
        *self.conn_slot() = Some(cmd_tx);
        Ok(())
    }

    /// Ends the session from any state. Idempotent.
    ///
    /// Emits [`SessionEvent::Disconnected`] if a session was live, then
    /// closes the connection in the background.
    pub fn disconnect(&self) {
        self.shared.apply(|machine| machine.disconnect());

        if let Some(cmd_tx) = self.conn_slot().take() {
            let _ = cmd_tx.send(Command::Close);
        }
    }

    /// Starts a login with the given credentials.
    ///
    /// Permitted while `Connected`; the verdict arrives as
    /// [`SessionEvent::Authenticated`] or
    /// [`SessionEvent::AuthenticationFailed`]. In states with no live
    /// channel this is a silent no-op, like every other command.
    ///
    /// # Errors
    /// [`SessionError::AlreadyAuthenticating`](huddle_session::SessionError)
    /// if a login attempt is already outstanding.
    pub fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(), HuddleError> {
        let frame =
            self.shared.machine().begin_login(username, password)?;
        if let Some(frame) = frame {
            let text = frame.encode(self.shared.codec())?;
            self.queue(text);
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Fire-and-forget sends
    // -----------------------------------------------------------------

    /// Broadcasts a text message to every connected peer.
    pub fn broadcast(&self, message: &str) {
        self.send_frame(Frame::Broadcast {
            message: message.to_owned(),
        });
    }

    /// Asks the server to set a shared variable for every peer.
    ///
    /// The local mirror is NOT updated here — only the server's echo
    /// mutates it, so all peers converge on the same value.
    pub fn set_variable_for_all(&self, name: &str, value: f64) {
        self.send_frame(Frame::SetVariable {
            name: name.to_owned(),
            value,
        });
    }

    /// Asks the server to add a delta to a shared variable for every
    /// peer. Applied locally only upon the server's echo.
    pub fn change_variable_for_all(&self, name: &str, delta: f64) {
        self.send_frame(Frame::ChangeVariable {
            name: name.to_owned(),
            delta,
        });
    }

    /// Sends an application-defined message with an opaque payload.
    pub fn send_custom(&self, name: &str, payload: serde_json::Value) {
        self.send_frame(Frame::Custom {
            name: name.to_owned(),
            payload,
        });
    }

    /// Sends raw text over the connection, bypassing the frame envelope.
    ///
    /// For servers with side channels that are not part of the framed
    /// protocol. Subject to the same sendable-state gate as every other
    /// command.
    pub fn send_message(&self, text: &str) {
        if !self.shared.machine().can_send() {
            tracing::trace!("dropping raw send while not connected");
            return;
        }
        self.queue(text.to_owned());
    }

    // -----------------------------------------------------------------
    // Reporter-style queries
    // -----------------------------------------------------------------

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.shared.machine().state()
    }

    /// Whether the channel is open.
    pub fn is_connected(&self) -> bool {
        self.shared.machine().is_connected()
    }

    /// Whether the server has confirmed a login.
    pub fn is_authenticated(&self) -> bool {
        self.shared.machine().is_authenticated()
    }

    /// The authenticated username, if any.
    pub fn username(&self) -> Option<String> {
        self.shared.machine().username().map(str::to_owned)
    }

    /// The local wall-clock time.
    ///
    /// The protocol carries no clock synchronization, so this is the
    /// client's own clock, not the server's.
    pub fn server_time(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Number of peers in the current roster.
    pub fn player_count(&self) -> usize {
        self.shared.machine().roster().count()
    }

    /// Username of the peer at the given roster ordinal, if any.
    pub fn player_username(&self, index: usize) -> Option<String> {
        self.shared
            .machine()
            .roster()
            .by_index(index)
            .map(|entry| entry.username.clone())
    }

    /// All peer usernames in roster order.
    pub fn players(&self) -> Vec<String> {
        self.shared
            .machine()
            .roster()
            .usernames()
            .map(str::to_owned)
            .collect()
    }

    /// Reads a shared variable from the local mirror. `None` when unset.
    pub fn variable(&self, name: &str) -> Option<f64> {
        self.shared.machine().variables().read(name)
    }

    /// Why the last session ended, if it ended in failure.
    pub fn last_error(&self) -> Option<String> {
        self.shared.machine().last_error().map(str::to_owned)
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    fn conn_slot(
        &self,
    ) -> MutexGuard<'_, Option<mpsc::UnboundedSender<Command>>> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encodes and queues a frame, silently dropping it when the session
    /// is not in a sendable state.
    fn send_frame(&self, frame: Frame) {
        if !self.shared.machine().can_send() {
            tracing::trace!("dropping send while not connected");
            return;
        }
        match frame.encode(self.shared.codec()) {
            Ok(text) => self.queue(text),
            Err(e) => {
                tracing::warn!(error = %e, "refusing to send invalid frame");
            }
        }
    }

    /// Hands text to the live driver task, if one exists.
    fn queue(&self, text: String) {
        let sent = match self.conn_slot().as_ref() {
            Some(cmd_tx) => cmd_tx.send(Command::Send(text)).is_ok(),
            None => false,
        };
        if !sent {
            tracing::debug!(
                error = %TransportError::NotConnected,
                "dropping send, connection driver is gone"
            );
        }
    }
}

impl fmt::Debug for HuddleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuddleClient")
            .field("state", &self.state())
            .finish()
    }
}
