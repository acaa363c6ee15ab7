//! Per-connection task: transport reconnects, room membership, frame pumping.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{Instant, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use haven_core::config::RealtimeConfig;
use haven_core::traits::{CookieSource, Navigator};
use haven_core::types::{SessionId, UserId};
use haven_session::{CredentialStore, SessionStore};

use crate::event::{ChannelEvent, DomainEvent, Inbound, Outbound};
use crate::token::user_id_from_token;
use crate::transport::{Link, Transport};

/// Everything a supervisor needs, shared by all connections of a channel.
#[derive(Debug)]
pub(crate) struct ChannelContext {
    pub transport: Arc<dyn Transport>,
    pub credentials: Arc<CredentialStore>,
    pub store: Arc<SessionStore>,
    pub cookies: Arc<dyn CookieSource>,
    pub navigator: Arc<dyn Navigator>,
    pub config: RealtimeConfig,
    pub forced_logout_url: String,
    pub events: broadcast::Sender<DomainEvent>,
}

impl ChannelContext {
    /// User room to join: from the token, else from the user cookie.
    fn user_room(&self, token: Option<&str>) -> Option<UserId> {
        token
            .and_then(user_id_from_token)
            .or_else(|| self.cookies.get(&self.config.user_cookie).map(UserId::from))
    }

    fn session_room(&self) -> Option<SessionId> {
        self.cookies
            .get(&self.config.session_cookie)
            .filter(|s| !s.is_empty())
            .map(SessionId::from)
    }

    /// Act on a server-initiated logout: drop the credential, the identity
    /// and its snapshot, then leave the application.
    fn force_logout(&self, event: &ChannelEvent) {
        if let ChannelEvent::ForceLogoutSession { session_id, .. } = event {
            if self.session_room().as_ref() != Some(session_id) {
                debug!(%session_id, "Forced logout for another session ignored");
                return;
            }
        }
        warn!(reason = event.reason().unwrap_or("unspecified"), "Forced logout");
        if let Err(e) = self.credentials.clear() {
            warn!(error = %e, "Failed to clear credential on forced logout");
        }
        if !self.store.evict() {
            debug!("No identity to remove on forced logout");
        }
        self.store.purge_snapshot();
        self.navigator.hard_navigate(&self.forced_logout_url);
    }
}

enum Exit {
    Cancelled,
    Lost,
}

pub(crate) struct Supervisor {
    pub ctx: Arc<ChannelContext>,
    pub connection: Uuid,
    /// Token the connection was opened with. Transport-level reconnects
    /// present it again; a credential change gets a new connection instead.
    pub token: Option<String>,
    pub queue: mpsc::Receiver<String>,
    pub connected: watch::Sender<bool>,
    pub cancel: CancellationToken,
}

impl Supervisor {
    /// Run until cancelled, re-opening the transport with backoff.
    pub async fn run(mut self, mut link: Option<Link>) {
        let mut attempt = 0u32;
        let mut backlog = VecDeque::new();

        loop {
            let mut current = match link.take() {
                Some(link) => link,
                None => {
                    attempt += 1;
                    let delay = self.ctx.config.reconnect_delay(attempt);
                    debug!(connection = %self.connection, attempt, ?delay, "Realtime reconnect scheduled");
                    tokio::select! {
                        _ = self.cancel.cancelled() => break,
                        _ = tokio::time::sleep(delay) => {}
                    }
                    match self.ctx.transport.open(self.token.as_deref()).await {
                        Ok(link) => link,
                        Err(e) => {
                            warn!(connection = %self.connection, attempt, error = %e, "Realtime reconnect failed");
                            continue;
                        }
                    }
                }
            };
            if self.cancel.is_cancelled() {
                current.close().await;
                break;
            }

            attempt = 0;
            self.connected.send_replace(true);
            info!(connection = %self.connection, "Realtime connected");

            let exit = self.serve(&mut current, &mut backlog).await;
            self.connected.send_replace(false);
            current.close().await;
            match exit {
                Exit::Cancelled => break,
                Exit::Lost => warn!(connection = %self.connection, "Realtime connection lost"),
            }
        }
        debug!(connection = %self.connection, "Realtime supervisor stopped");
    }

    async fn serve(&mut self, link: &mut Link, backlog: &mut VecDeque<String>) -> Exit {
        if !self.join_rooms(link).await {
            return Exit::Lost;
        }
        while let Some(frame) = backlog.pop_front() {
            if let Err(unsent) = link.outbound.send(frame).await {
                backlog.push_front(unsent.0);
                return Exit::Lost;
            }
        }

        let period = self.ctx.config.room_rejoin_interval();
        let mut rejoin = interval_at(Instant::now() + period, period);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return Exit::Cancelled,
                _ = rejoin.tick() => {
                    if let Some(session_id) = self.ctx.session_room() {
                        if !self.send(link, &Outbound::RegisterSession { session_id }).await {
                            return Exit::Lost;
                        }
                    }
                }
                frame = self.queue.recv() => {
                    let Some(frame) = frame else {
                        return Exit::Cancelled;
                    };
                    if let Err(unsent) = link.outbound.send(frame).await {
                        backlog.push_back(unsent.0);
                        return Exit::Lost;
                    }
                }
                inbound = link.inbound.recv() => {
                    let Some(text) = inbound else {
                        return Exit::Lost;
                    };
                    self.deliver(&text);
                }
            }
        }
    }

    async fn join_rooms(&self, link: &Link) -> bool {
        if let Some(user_id) = self.ctx.user_room(self.token.as_deref()) {
            if !self.send(link, &Outbound::RegisterUser { user_id }).await {
                return false;
            }
        }
        if let Some(session_id) = self.ctx.session_room() {
            if !self.send(link, &Outbound::RegisterSession { session_id }).await {
                return false;
            }
        }
        true
    }

    async fn send(&self, link: &Link, frame: &Outbound) -> bool {
        let text = match frame.encode() {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to encode outbound frame");
                return true;
            }
        };
        debug!(connection = %self.connection, frame = %text, "Realtime send");
        link.outbound.send(text).await.is_ok()
    }

    fn deliver(&self, text: &str) {
        match Inbound::decode(text) {
            Ok(Inbound::Channel(event)) => self.ctx.force_logout(&event),
            Ok(Inbound::Domain(event)) => {
                let name = event.name();
                match self.ctx.events.send(event) {
                    Ok(receivers) => debug!(connection = %self.connection, event = name, receivers, "Realtime event"),
                    Err(_) => debug!(connection = %self.connection, event = name, "Realtime event has no subscribers"),
                }
            }
            Err(e) => warn!(connection = %self.connection, error = %e, "Dropped realtime frame"),
        }
    }
}
