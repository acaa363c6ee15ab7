//! In-process transport for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{Notify, mpsc};

use haven_core::error::AppError;
use haven_core::result::AppResult;

use crate::transport::{Link, Transport};

/// Server side of a connection opened through [`MockTransport`].
#[derive(Debug)]
pub struct MockPeer {
    /// Token presented when the connection was opened.
    pub token: Option<String>,
    /// Push frames to the client.
    pub to_client: mpsc::Sender<String>,
    /// Frames sent by the client.
    pub from_client: mpsc::Receiver<String>,
}

impl MockPeer {
    /// Next frame from the client, parsed as JSON.
    pub async fn next_frame(&mut self) -> Option<serde_json::Value> {
        let text = self.from_client.recv().await?;
        serde_json::from_str(&text).ok()
    }
}

/// Transport whose connections are in-memory queue pairs.
#[derive(Debug, Default)]
pub struct MockTransport {
    opened: Mutex<Vec<Option<String>>>,
    peers: Mutex<VecDeque<MockPeer>>,
    failures: Mutex<usize>,
    arrived: Notify,
}

impl MockTransport {
    /// Tokens of every open attempt, in order.
    pub fn opened(&self) -> Vec<Option<String>> {
        self.opened.lock().unwrap().clone()
    }

    /// Make the next `count` open attempts fail.
    pub fn fail_next(&self, count: usize) {
        *self.failures.lock().unwrap() = count;
    }

    /// Wait for the next successfully opened connection.
    pub async fn accept(&self) -> MockPeer {
        loop {
            let notified = self.arrived.notified();
            if let Some(peer) = self.peers.lock().unwrap().pop_front() {
                return peer;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn open(&self, token: Option<&str>) -> AppResult<Link> {
        self.opened.lock().unwrap().push(token.map(str::to_string));
        {
            let mut failures = self.failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(AppError::realtime("connection refused"));
            }
        }

        let (outbound, from_client) = mpsc::channel(64);
        let (to_client, inbound) = mpsc::channel(64);
        self.peers.lock().unwrap().push_back(MockPeer {
            token: token.map(str::to_string),
            to_client,
            from_client,
        });
        self.arrived.notify_waiters();
        Ok(Link::new(outbound, inbound))
    }
}
