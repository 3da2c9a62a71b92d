//! Per-connection driver task: dial, then pump outbound commands and
//! inbound frames until the connection ends.
//!
//! One driver task exists per connection attempt. It is the only producer
//! of channel inputs for its attempt, so the session machine sees events
//! strictly in arrival order. The flow is:
//!   1. Dial the endpoint → report `channel_opened`/`channel_failed`
//!   2. Loop: send queued commands, decode inbound text into frames
//!   3. Report `channel_closed`/`channel_failed` and exit

use std::sync::Arc;

use tokio::sync::mpsc;

use huddle_protocol::Frame;
use huddle_transport::{
    Connection, ConnectionId, Dialer, WebSocketDialer,
};

use crate::client::Shared;

/// Commands queued from the client handle to the driver.
pub(crate) enum Command {
    /// Send one text message over the connection.
    Send(String),
    /// Close the connection and exit the driver.
    Close,
}

/// Runs one connection from dial to close.
pub(crate) async fn run_connection(
    url: String,
    id: ConnectionId,
    shared: Arc<Shared>,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
) {
    tracing::debug!(%id, url, "connection driver started");

    let conn = match WebSocketDialer.dial(&url, id).await {
        Ok(conn) => conn,
        Err(e) => {
            shared.apply(|m| m.channel_failed(id, &e.to_string()));
            return;
        }
    };

    let accepted = {
        let mut machine = shared.machine();
        match machine.channel_opened(id) {
            Some(event) => {
                shared.emit(Some(event));
                true
            }
            None => false,
        }
    };
    if !accepted {
        // The session moved on while the dial was in flight; this
        // connection belongs to nobody.
        let _ = conn.close().await;
        return;
    }

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(Command::Send(text)) => {
                    if let Err(e) = conn.send(&text).await {
                        tracing::debug!(%id, error = %e, "send failed");
                        shared.apply(|m| {
                            m.channel_failed(id, &e.to_string())
                        });
                        break;
                    }
                }
                Some(Command::Close) | None => {
                    // Explicit disconnect, or the handle was dropped.
                    let _ = conn.close().await;
                    shared.apply(|m| m.disconnect());
                    break;
                }
            },

            incoming = conn.recv() => match incoming {
                Ok(Some(text)) => {
                    match Frame::decode(shared.codec(), &text) {
                        Ok(frame) => {
                            shared.apply(|m| m.frame_received(id, frame));
                        }
                        Err(e) => {
                            // A single bad frame must not tear down a
                            // live session.
                            tracing::warn!(
                                %id,
                                error = %e,
                                "dropping malformed frame"
                            );
                        }
                    }
                }
                Ok(None) => {
                    shared.apply(|m| m.channel_closed(id, None));
                    break;
                }
                Err(e) => {
                    shared.apply(|m| {
                        m.channel_failed(id, &e.to_string())
                    });
                    break;
                }
            },
        }
    }

    tracing::debug!(%id, "connection driver exited");
}
