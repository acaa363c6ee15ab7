//! Handle to one logical connection.

use std::sync::Mutex;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use haven_core::error::AppError;
use haven_core::result::AppResult;

use crate::event::Outbound;

/// One connection bound to the credential it was opened with.
///
/// The underlying transport may drop and be re-established by the
/// supervisor, but a `Connection` never outlives a credential change: the
/// channel replaces it with a new instance instead.
#[derive(Debug)]
pub struct Connection {
    id: Uuid,
    queue: mpsc::Sender<String>,
    connected: watch::Receiver<bool>,
    cancel: CancellationToken,
    supervisor: Mutex<Option<JoinHandle<()>>>,
}

impl Connection {
    pub(crate) fn new(
        queue: mpsc::Sender<String>,
        connected: watch::Receiver<bool>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            queue,
            connected,
            cancel,
            supervisor: Mutex::new(None),
        }
    }

    pub(crate) fn attach(&self, handle: JoinHandle<()>) {
        if let Ok(mut slot) = self.supervisor.lock() {
            *slot = Some(handle);
        }
    }

    /// Unique id of this instance.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether the transport is currently up.
    pub fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    /// Resolve once the transport is up. Fails if the connection closes.
    pub async fn wait_connected(&self) -> AppResult<()> {
        let mut connected = self.connected.clone();
        connected
            .wait_for(|up| *up)
            .await
            .map(|_| ())
            .map_err(|_| AppError::realtime("Connection closed before connecting"))
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Queue a frame. Frames queued while the transport is down are sent
    /// after the next successful connect.
    pub fn emit(&self, frame: &Outbound) -> AppResult<()> {
        if self.is_closed() {
            return Err(AppError::realtime("Connection is closed"));
        }
        let text = frame.encode()?;
        self.queue.try_send(text).map_err(|e| {
            warn!(connection = %self.id, "Outbound frame dropped: {e}");
            AppError::realtime("Outbound queue is full")
        })
    }

    /// Stop the supervisor and wait until the transport is released.
    pub async fn close(&self) {
        self.cancel.cancel();
        let handle = self.supervisor.lock().ok().and_then(|mut slot| slot.take());
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(connection = %self.id, error = %e, "Realtime supervisor ended abnormally");
            }
        }
        debug!(connection = %self.id, "Realtime connection closed");
    }
}
