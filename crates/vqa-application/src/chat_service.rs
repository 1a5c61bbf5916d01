//! User-facing chat operations.
//!
//! Everything a client does outside the inbound stream: sending prompts,
//! starting or switching conversations, and keeping the conversation list
//! fresh.

use std::sync::{Arc, Weak};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use vqa_core::channel::{OutboundMessage, PushChannel};
use vqa_core::chat::{Block, MessageRole, Transcript};
use vqa_core::error::Result;
use vqa_core::history::HistoryRepository;

use crate::events::ChatEvent;
use crate::store::TranscriptStore;

pub struct ChatService {
    store: Arc<TranscriptStore>,
    history: Arc<dyn HistoryRepository>,
    channel: Arc<dyn PushChannel>,
    outbound_event: String,
    user_id: Option<String>,
}

impl ChatService {
    pub fn new(
        store: Arc<TranscriptStore>,
        history: Arc<dyn HistoryRepository>,
        channel: Arc<dyn PushChannel>,
        outbound_event: impl Into<String>,
        user_id: Option<String>,
    ) -> Self {
        Self {
            store,
            history,
            channel,
            outbound_event: outbound_event.into(),
            user_id,
        }
    }

    pub fn store(&self) -> &Arc<TranscriptStore> {
        &self.store
    }

    /// Sends a user prompt.
    ///
    /// The prompt is trimmed and recorded as a new user turn before it is
    /// handed to the push channel, so it shows up immediately.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: The prompt was recorded and sent
    /// - `Ok(false)`: The prompt was blank; nothing happened
    /// - `Err(_)`: The channel refused the message (the user turn stays)
    pub async fn submit_prompt(&self, text: &str) -> Result<bool> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }

        self.store
            .open_turn(MessageRole::User, Block::text(text))
            .await;
        self.store.set_last_error(None).await;

        let session = self.store.session().await;
        let message = OutboundMessage {
            user_id: self.user_id.clone(),
            session_id: session.session_id,
            text: text.to_string(),
            group_id: session.current_group_id,
        };

        tracing::debug!(
            "[ChatService] Sending prompt (session: {:?})",
            message.session_id
        );
        if let Err(e) = self.channel.emit(&self.outbound_event, &message).await {
            tracing::warn!("[ChatService] Failed to send prompt: {}", e);
            self.store.set_last_error(Some(e.to_string())).await;
            return Err(e);
        }
        Ok(true)
    }

    /// Starts a new chat: no session id, empty transcript.
    pub async fn new_chat(&self) -> Result<()> {
        tracing::info!("[ChatService] Starting new chat");
        self.store.activate_session(None, Transcript::new()).await
    }

    /// Makes a stored conversation active, hydrating its transcript.
    pub async fn switch_session(&self, session_id: &str) -> Result<()> {
        let turns = self.history.find_turns(session_id).await?;
        tracing::info!(
            "[ChatService] Switching to session {} ({} turns)",
            session_id,
            turns.len()
        );
        self.store
            .activate_session(Some(session_id.to_string()), Transcript::from_turns(turns))
            .await
    }

    /// Restores the identity saved by a previous run.
    ///
    /// A saved session that the history store no longer knows falls back to
    /// a new chat. Other history failures are returned.
    pub async fn restore(&self) -> Result<()> {
        let persisted = self.store.restore_identity().await?;
        let Some(session_id) = persisted.session_id else {
            return self.new_chat().await;
        };

        match self.switch_session(&session_id).await {
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    "[ChatService] Saved session {} no longer exists; starting new chat",
                    session_id
                );
                self.new_chat().await
            }
            other => other,
        }
    }

    /// Sets the group scoping sent with later prompts.
    pub async fn set_current_group(&self, group_id: Option<String>) -> Result<()> {
        self.store.set_current_group(group_id).await
    }

    /// Reloads the conversation list. Returns the number of conversations.
    pub async fn refresh_conversations(&self) -> Result<usize> {
        refresh(&self.store, self.history.as_ref()).await
    }

    /// Spawns a task that reloads the conversation list whenever it is
    /// invalidated.
    ///
    /// A lagged subscriber may have missed an invalidation, so lag also
    /// triggers a reload. The task only holds the store weakly and ends once
    /// the store is dropped.
    pub fn spawn_history_refresher(&self) -> JoinHandle<()> {
        let store = Arc::downgrade(&self.store);
        let history = Arc::clone(&self.history);
        let mut rx = self.store.subscribe();

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ChatEvent::HistoryInvalidated) => {}
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!("[ChatService] Refresher lagged by {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
                let Some(store) = Weak::upgrade(&store) else {
                    break;
                };
                if let Err(e) = refresh(&store, history.as_ref()).await {
                    tracing::warn!("[ChatService] Failed to refresh conversations: {}", e);
                }
            }
            tracing::debug!("[ChatService] History refresher stopped");
        })
    }
}

async fn refresh(store: &TranscriptStore, history: &dyn HistoryRepository) -> Result<usize> {
    let conversations = history.list_conversations().await?;
    let count = conversations.len();
    store.set_conversations(conversations).await;
    Ok(count)
}
