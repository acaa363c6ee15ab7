//! WebSocket transport over tokio-tungstenite.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tracing::{debug, warn};

use haven_core::error::{AppError, ErrorKind};
use haven_core::result::AppResult;

use super::{Link, Transport};

/// Per-direction frame buffer.
const FRAME_BUFFER: usize = 64;

/// Connects to a WebSocket URL, sending the token as a bearer header on
/// the upgrade request.
#[derive(Debug, Clone)]
pub struct WsTransport {
    url: String,
}

impl WsTransport {
    /// Transport for the given `ws://` or `wss://` URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn open(&self, token: Option<&str>) -> AppResult<Link> {
        let mut request = self.url.as_str().into_client_request().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, format!("Invalid realtime URL '{}'", self.url), e)
        })?;
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| AppError::authentication("Access token is not a valid header value"))?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        let (stream, _) = connect_async(request).await.map_err(|e| {
            AppError::with_source(ErrorKind::Realtime, "WebSocket connect failed", e)
        })?;
        debug!(url = %self.url, "WebSocket connected");

        let (mut sink, mut source) = stream.split();
        let (outbound, mut to_send) = mpsc::channel::<String>(FRAME_BUFFER);
        let (received, inbound) = mpsc::channel::<String>(FRAME_BUFFER);

        let writer = tokio::spawn(async move {
            while let Some(text) = to_send.recv().await {
                if let Err(e) = sink.send(Message::Text(text.into())).await {
                    warn!(error = %e, "WebSocket send failed");
                    return;
                }
            }
            match sink.close().await {
                Ok(()) => debug!("WebSocket closed"),
                Err(e) => debug!(error = %e, "WebSocket close did not complete cleanly"),
            }
        });

        let reader = tokio::spawn(async move {
            while let Some(message) = source.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        if received.send(text.as_str().to_string()).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(frame)) => {
                        debug!(?frame, "WebSocket closed by server");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "WebSocket receive failed");
                        break;
                    }
                }
            }
        });

        Ok(Link::with_tasks(outbound, inbound, writer, reader))
    }
}
