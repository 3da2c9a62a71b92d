//! Minimal Huddle client: join a server, log in, and bump a shared
//! counter every time a peer broadcasts.
//!
//! ```text
//! cargo run -p cloud-counter -- ws://localhost:8080 alice secret
//! ```

use huddle::{ClientConfig, HuddleClient, SessionEvent};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let url = args.next().unwrap_or_else(|| "ws://127.0.0.1:8080".into());
    let username = args.next().unwrap_or_else(|| "guest".into());
    let password = args.next().unwrap_or_default();

    let (client, mut events) = HuddleClient::new(ClientConfig::default());
    client.connect(&url)?;

    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Connected => {
                tracing::info!(url, "connected, logging in");
                client.login(&username, &password)?;
            }
            SessionEvent::Authenticated { username } => {
                tracing::info!(username, "authenticated");
                client.broadcast("hello from cloud-counter");
            }
            SessionEvent::AuthenticationFailed => {
                tracing::warn!("login rejected, staying anonymous");
            }
            SessionEvent::MessageReceived { message } => {
                tracing::info!(message, "peer broadcast");
                client.change_variable_for_all("broadcasts-seen", 1.0);
                let seen = client.variable("broadcasts-seen");
                tracing::info!(?seen, players = client.player_count(), "counter state");
            }
            SessionEvent::CustomMessageReceived { name, payload } => {
                tracing::info!(name, %payload, "custom message");
            }
            SessionEvent::ConnectionFailed { reason } => {
                tracing::error!(reason, "could not connect");
                break;
            }
            SessionEvent::Disconnected => {
                tracing::info!("session ended");
                break;
            }
        }
    }
    Ok(())
}
