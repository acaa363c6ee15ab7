//! Full-duplex text transports.

pub mod ws;

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use haven_core::result::AppResult;

pub use ws::WsTransport;

/// Upper bound on waiting for the writer to finish the close handshake.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// An open connection as a pair of text frame queues.
///
/// The connection is gone once `inbound` yields `None`. [`Link::close`]
/// releases it from this side.
#[derive(Debug)]
pub struct Link {
    /// Frames to send.
    pub outbound: mpsc::Sender<String>,
    /// Frames received.
    pub inbound: mpsc::Receiver<String>,
    writer: Option<JoinHandle<()>>,
    reader: Option<JoinHandle<()>>,
}

impl Link {
    /// A link with no I/O tasks behind it.
    pub fn new(outbound: mpsc::Sender<String>, inbound: mpsc::Receiver<String>) -> Self {
        Self {
            outbound,
            inbound,
            writer: None,
            reader: None,
        }
    }

    /// A link driven by a writer task, which closes the connection once
    /// `outbound` is dropped, and a reader task.
    pub fn with_tasks(
        outbound: mpsc::Sender<String>,
        inbound: mpsc::Receiver<String>,
        writer: JoinHandle<()>,
        reader: JoinHandle<()>,
    ) -> Self {
        Self {
            outbound,
            inbound,
            writer: Some(writer),
            reader: Some(reader),
        }
    }

    /// Close the connection and wait until its I/O tasks are gone.
    pub async fn close(self) {
        let Self {
            outbound,
            inbound,
            writer,
            reader,
        } = self;
        drop(outbound);
        drop(inbound);

        if let Some(reader) = reader {
            reader.abort();
            if let Err(e) = reader.await {
                if !e.is_cancelled() {
                    warn!(error = %e, "Transport reader ended abnormally");
                }
            }
        }
        if let Some(mut writer) = writer {
            match tokio::time::timeout(CLOSE_TIMEOUT, &mut writer).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Transport writer ended abnormally"),
                Err(_) => {
                    debug!("Transport close timed out; aborting writer");
                    writer.abort();
                }
            }
        }
    }
}

/// Opens authenticated connections to the realtime endpoint.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug + 'static {
    /// Open a connection, presenting `token` when there is one.
    async fn open(&self, token: Option<&str>) -> AppResult<Link>;
}
