//! Session driver.
//!
//! Runs one [`StreamingSession`] on its own task and feeds it from a bounded
//! queue, which gives the single-writer, arrival-order processing the
//! assembler relies on. The transport's event handlers push raw events
//! through a cloneable [`SessionHandle`].

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use vqa_core::channel::EventDecoder;
use vqa_core::error::{ChatError, Result};

use crate::streaming::StreamingSession;

/// Items queued for the driver task.
#[derive(Debug)]
pub enum InboundEvent {
    /// A raw push-channel event.
    Wire { name: String, payload: Value },
    /// The transport re-established its connection.
    Reconnected,
    /// Resolves once everything queued before it has been applied.
    Barrier(oneshot::Sender<()>),
}

/// Cloneable sender side of a running driver.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<InboundEvent>,
}

impl SessionHandle {
    /// Queues a raw event as received from the transport.
    pub async fn deliver(&self, name: impl Into<String>, payload: Value) -> Result<()> {
        self.send(InboundEvent::Wire {
            name: name.into(),
            payload,
        })
        .await
    }

    /// Tells the session that the transport reconnected.
    pub async fn reconnected(&self) -> Result<()> {
        self.send(InboundEvent::Reconnected).await
    }

    /// Waits until every event queued so far has been applied to the store.
    pub async fn settle(&self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.send(InboundEvent::Barrier(done_tx)).await?;
        done_rx
            .await
            .map_err(|_| ChatError::internal("session driver stopped before settling"))
    }

    async fn send(&self, event: InboundEvent) -> Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| ChatError::internal("session driver is not running"))
    }
}

pub struct SessionDriver {
    session: StreamingSession,
    decoder: EventDecoder,
    rx: mpsc::Receiver<InboundEvent>,
}

impl SessionDriver {
    /// Spawns the driver task.
    ///
    /// The task ends when every [`SessionHandle`] has been dropped and the
    /// queue is drained; its join handle yields the session back.
    pub fn spawn(
        session: StreamingSession,
        decoder: EventDecoder,
        buffer: usize,
    ) -> (SessionHandle, JoinHandle<StreamingSession>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let driver = Self {
            session,
            decoder,
            rx,
        };
        (SessionHandle { tx }, tokio::spawn(driver.run()))
    }

    async fn run(mut self) -> StreamingSession {
        tracing::debug!("[SessionDriver] Started");
        while let Some(item) = self.rx.recv().await {
            match item {
                InboundEvent::Wire { name, payload } => self.dispatch(&name, payload).await,
                InboundEvent::Reconnected => self.session.reconnected().await,
                InboundEvent::Barrier(done) => {
                    let _ = done.send(());
                }
            }
        }
        tracing::debug!("[SessionDriver] All handles dropped; stopping");
        self.session
    }

    async fn dispatch(&mut self, name: &str, payload: Value) {
        match self.decoder.decode(name, payload) {
            Ok(Some(event)) => self.session.handle(event).await,
            Ok(None) => tracing::debug!("[SessionDriver] Ignoring event '{}'", name),
            Err(e) => tracing::warn!("[SessionDriver] Dropping event: {}", e),
        }
    }
}
