//! Connection manager for the realtime channel.
//!
//! [`RealtimeChannel`] owns the current [`Connection`]. Consumers read it
//! through [`RealtimeChannel::current`] on every use instead of holding on
//! to it, because [`reconnect`](RealtimeChannel::reconnect) replaces the
//! instance whenever the credential changes.

pub mod connection;
mod supervisor;

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::{Mutex, broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use haven_core::config::RealtimeConfig;
use haven_core::error::AppError;
use haven_core::result::AppResult;
use haven_core::traits::{CookieSource, Navigator};
use haven_session::{CredentialStore, SessionStore};

use crate::event::{DomainEvent, Outbound};
use crate::transport::Transport;

pub use connection::Connection;

use self::supervisor::{ChannelContext, Supervisor};

/// Query flag appended to the sign-in path after a forced logout.
pub const FORCED_LOGOUT_QUERY: &str = "error=forced_logout";

/// The single shared realtime connection.
#[derive(Debug)]
pub struct RealtimeChannel {
    ctx: Arc<ChannelContext>,
    current: RwLock<Option<Arc<Connection>>>,
    switching: Mutex<()>,
}

impl RealtimeChannel {
    /// Create a channel. Nothing is opened until [`reconnect`](Self::reconnect).
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<CredentialStore>,
        store: Arc<SessionStore>,
        cookies: Arc<dyn CookieSource>,
        navigator: Arc<dyn Navigator>,
        config: RealtimeConfig,
        sign_in_path: &str,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        Self {
            ctx: Arc::new(ChannelContext {
                transport,
                credentials,
                store,
                cookies,
                navigator,
                config,
                forced_logout_url: format!("{sign_in_path}?{FORCED_LOGOUT_QUERY}"),
                events,
            }),
            current: RwLock::new(None),
            switching: Mutex::new(()),
        }
    }

    /// The live connection, if any.
    pub fn current(&self) -> Option<Arc<Connection>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Domain events from every connection this channel opens.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.ctx.events.subscribe()
    }

    /// Queue a frame on the current connection.
    pub fn emit(&self, frame: &Outbound) -> AppResult<()> {
        self.current()
            .ok_or_else(|| AppError::realtime("Realtime channel is not connected"))?
            .emit(frame)
    }

    /// Replace the connection with one opened with the current credential.
    ///
    /// The previous connection is fully closed before the new one is
    /// opened. The first open attempt happens before this returns; if it
    /// fails, the new connection keeps retrying in the background.
    pub async fn reconnect(&self) -> Arc<Connection> {
        let _switching = self.switching.lock().await;

        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            previous.close().await;
        }

        let token = self.ctx.credentials.access_token();
        let first = match self.ctx.transport.open(token.as_deref()).await {
            Ok(link) => Some(link),
            Err(e) => {
                warn!(error = %e, "Realtime connect failed; retrying in background");
                None
            }
        };

        let (queue_tx, queue_rx) = mpsc::channel(self.ctx.config.event_buffer.max(1));
        let (connected_tx, connected_rx) = watch::channel(false);
        let cancel = CancellationToken::new();
        let connection = Arc::new(Connection::new(queue_tx, connected_rx, cancel.clone()));

        let supervisor = Supervisor {
            ctx: Arc::clone(&self.ctx),
            connection: connection.id(),
            token,
            queue: queue_rx,
            connected: connected_tx,
            cancel,
        };
        connection.attach(tokio::spawn(supervisor.run(first)));
        info!(connection = %connection.id(), "Realtime channel rebuilt");

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&connection));
        connection
    }

    /// Close the connection, if any.
    pub async fn disconnect(&self) {
        let _switching = self.switching.lock().await;
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            previous.close().await;
        }
    }

    /// Reconnect after every credential change until cancelled.
    pub fn follow_credentials(
        self: Arc<Self>,
        mut revisions: watch::Receiver<u64>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    changed = revisions.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let revision = *revisions.borrow_and_update();
                        debug!(revision, "Credential changed; rebuilding realtime channel");
                        self.reconnect().await;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests;
