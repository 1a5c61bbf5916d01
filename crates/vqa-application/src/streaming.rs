//! Streaming session state machine.
//!
//! Consumes decoded push-channel events for one session, in arrival order,
//! and drives the transcript store:
//!
//! ```text
//!            thinking / chunk
//!   Idle ─────────────────────▶ Receiving
//!     ▲                            │
//!     └──── end / failed / reconnect
//! ```
//!
//! Status events may arrive in either state and never change it. When the
//! store activates a different conversation, the episode in progress is
//! dropped: the next event starts from `Idle` with no turn open.
//!
//! The session takes `&mut self` for every event, so it is the single writer
//! of assistant content; one driver task owns it (see [`crate::driver`]).

use serde::Serialize;
use std::sync::Arc;

use vqa_core::channel::StreamEvent;
use vqa_core::chat::{ChunkPayload, MessageRole, parse};

use crate::events::ChatEvent;
use crate::store::TranscriptStore;

/// Lifecycle of one assistant response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamState {
    /// No response in progress.
    #[default]
    Idle,
    /// A response has been announced or has started streaming.
    Receiving,
}

pub struct StreamingSession {
    store: Arc<TranscriptStore>,
    state: StreamState,
    /// Whether this episode already opened its assistant turn.
    turn_opened: bool,
    /// Store activation this episode belongs to.
    activation: u64,
}

impl StreamingSession {
    pub fn new(store: Arc<TranscriptStore>) -> Self {
        Self {
            store,
            state: StreamState::Idle,
            turn_opened: false,
            activation: 0,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn store(&self) -> &Arc<TranscriptStore> {
        &self.store
    }

    /// Applies one event.
    pub async fn handle(&mut self, event: StreamEvent) {
        tracing::trace!("[StreamingSession] {} in {:?}", event.name(), self.state);
        self.sync_activation().await;
        match event {
            StreamEvent::Status { session_id } => self.on_status(&session_id).await,
            StreamEvent::Thinking { status } => self.on_thinking(status).await,
            StreamEvent::Chunk { msg_type, chunk } => self.on_chunk(&msg_type, chunk).await,
            StreamEvent::End => self.on_end().await,
            StreamEvent::Failed { message } => self.on_failed(message).await,
        }
    }

    /// The transport re-established its connection.
    ///
    /// No resume token exists, so a response that was streaming is sealed as
    /// it stands: the partial turn is kept, and any later content opens a
    /// fresh turn instead of being glued onto it.
    pub async fn reconnected(&mut self) {
        self.sync_activation().await;
        if self.state == StreamState::Receiving {
            tracing::warn!("[StreamingSession] Connection restored mid-stream; sealing partial response");
        } else {
            tracing::debug!("[StreamingSession] Connection restored while idle");
        }
        self.finish_episode().await;
    }

    async fn on_status(&mut self, session_id: &str) {
        match self.store.assign_session_id(session_id).await {
            Ok(true) => tracing::info!("[StreamingSession] Session assigned: {}", session_id),
            Ok(false) => tracing::debug!(
                "[StreamingSession] Ignoring status for {}; session id already set",
                session_id
            ),
            Err(e) => tracing::warn!(
                "[StreamingSession] Session {} assigned but not persisted: {}",
                session_id,
                e
            ),
        }
        self.store.events().emit_lossy(ChatEvent::HistoryInvalidated);
    }

    async fn on_thinking(&mut self, status: String) {
        self.store.set_thinking(Some(status)).await;
        self.enter(StreamState::Receiving).await;
    }

    async fn on_chunk(&mut self, msg_type: &str, chunk: ChunkPayload) {
        self.store.set_thinking(None).await;
        self.enter(StreamState::Receiving).await;

        let Some(block) = parse(msg_type, chunk) else {
            tracing::debug!("[StreamingSession] Skipping chunk of unknown kind '{}'", msg_type);
            return;
        };

        let written = self
            .store
            .append_streamed(self.activation, block.clone(), !self.turn_opened)
            .await;
        if written.is_none() {
            // Activated between the sync above and this write.
            self.sync_activation().await;
            self.enter(StreamState::Receiving).await;
            self.store
                .append_streamed(self.activation, block, true)
                .await;
        }
        self.turn_opened = true;
    }

    async fn on_end(&mut self) {
        if self.state == StreamState::Idle {
            tracing::debug!("[StreamingSession] End received while idle");
        }
        self.finish_episode().await;
        self.store.events().emit_lossy(ChatEvent::StreamEnded);
    }

    async fn on_failed(&mut self, message: String) {
        tracing::warn!("[StreamingSession] Server aborted response: {}", message);
        self.finish_episode().await;
        self.store.set_last_error(Some(message.clone())).await;
        self.store
            .events()
            .emit_lossy(ChatEvent::StreamFailed { message });
    }

    async fn finish_episode(&mut self) {
        self.store.set_thinking(None).await;
        self.turn_opened = false;
        self.enter(StreamState::Idle).await;
    }

    /// Drops the episode in progress if another conversation was activated.
    async fn sync_activation(&mut self) {
        let current = self.store.activation().await;
        if current == self.activation {
            return;
        }
        if self.state == StreamState::Receiving || self.turn_opened {
            tracing::info!("[StreamingSession] Conversation changed mid-stream; dropping episode");
        }
        self.activation = current;
        self.turn_opened = false;
        // activate_session already reset the store's copy.
        self.state = StreamState::Idle;
    }

    async fn enter(&mut self, next: StreamState) {
        if self.state == next {
            return;
        }
        tracing::info!("[StreamingSession] {:?} -> {:?}", self.state, next);
        self.state = next;
        self.store.set_stream_state(next).await;
    }
}
