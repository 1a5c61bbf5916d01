//! Transcript store.
//!
//! Holds the latest transcript together with the session identity and is the
//! only shared-mutable state of a chat. Every write runs under one write lock,
//! so readers see either the previous or the next value, never a half-applied
//! update. Session identity changes are persisted through a
//! [`ChatStateRepository`] after the lock is released.

use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use vqa_core::chat::{AppendOutcome, Block, MessageRole, Transcript};
use vqa_core::error::Result;
use vqa_core::history::ConversationSummary;
use vqa_core::session::{ChatSession, ChatStateRepository, PersistedChatState};

use crate::events::{ChatEvent, EventBus};
use crate::streaming::StreamState;

/// Everything an observer may render, captured at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatSnapshot {
    pub session: ChatSession,
    pub stream_state: StreamState,
    pub transcript: Transcript,
    pub conversations: Vec<ConversationSummary>,
    /// Message of the last failed stream or send, cleared when a new prompt is sent.
    pub last_error: Option<String>,
    /// Bumped each time a different conversation becomes active.
    pub activation: u64,
}

pub struct TranscriptStore {
    state: RwLock<ChatSnapshot>,
    events: EventBus,
    repository: Arc<dyn ChatStateRepository>,
}

impl TranscriptStore {
    pub fn new(repository: Arc<dyn ChatStateRepository>, events: EventBus) -> Self {
        Self {
            state: RwLock::new(ChatSnapshot::default()),
            events,
            repository,
        }
    }

    // ============================================================================
    // Reads
    // ============================================================================

    /// Clones the whole state. Turns are shared, so this is cheap, but while
    /// the snapshot is alive the next streamed write copies the tail turn.
    pub async fn snapshot(&self) -> ChatSnapshot {
        self.state.read().await.clone()
    }

    pub async fn transcript(&self) -> Transcript {
        self.state.read().await.transcript.clone()
    }

    pub async fn session(&self) -> ChatSession {
        self.state.read().await.session.clone()
    }

    pub async fn session_id(&self) -> Option<String> {
        self.state.read().await.session.session_id.clone()
    }

    pub async fn thinking_status(&self) -> Option<String> {
        self.state.read().await.session.thinking_status.clone()
    }

    pub async fn activation(&self) -> u64 {
        self.state.read().await.activation
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ============================================================================
    // Transcript writes
    // ============================================================================

    /// Opens a new turn for `role`, never merging into the previous turn.
    pub async fn open_turn(&self, role: MessageRole, block: Block) {
        let counts = {
            let mut state = self.state.write().await;
            state.transcript.open_turn(role, block);
            transcript_counts(&state.transcript)
        };
        self.publish_transcript(counts);
    }

    /// Writes a streamed assistant block, opening a new turn when `open_turn`
    /// is set and merging into the tail otherwise.
    ///
    /// Returns `None` without writing when another conversation was activated
    /// since `activation` was read.
    pub async fn append_streamed(
        &self,
        activation: u64,
        block: Block,
        open_turn: bool,
    ) -> Option<AppendOutcome> {
        let (outcome, counts) = {
            let mut state = self.state.write().await;
            if state.activation != activation {
                return None;
            }
            let outcome = if open_turn {
                state.transcript.open_turn(MessageRole::Assistant, block)
            } else {
                state.transcript.append(MessageRole::Assistant, Some(block))
            };
            (outcome, transcript_counts(&state.transcript))
        };
        if outcome != AppendOutcome::Unchanged {
            self.publish_transcript(counts);
        }
        Some(outcome)
    }

    // ============================================================================
    // Session writes
    // ============================================================================

    /// Sets or clears the thinking notice. Returns `true` if it changed.
    pub async fn set_thinking(&self, status: Option<String>) -> bool {
        {
            let mut state = self.state.write().await;
            if state.session.thinking_status == status {
                return false;
            }
            state.session.thinking_status = status.clone();
        }
        self.events.emit_lossy(ChatEvent::ThinkingChanged { status });
        true
    }

    pub async fn set_stream_state(&self, stream_state: StreamState) {
        self.state.write().await.stream_state = stream_state;
    }

    pub async fn set_last_error(&self, message: Option<String>) {
        self.state.write().await.last_error = message;
    }

    /// Assigns the server-provided id if the session has none yet.
    ///
    /// Returns `Ok(true)` when assigned. An id that is already set is never
    /// replaced, so a late status event cannot move the active conversation.
    pub async fn assign_session_id(&self, session_id: &str) -> Result<bool> {
        let persisted = {
            let mut state = self.state.write().await;
            if !state.session.assign_if_unset(session_id) {
                return Ok(false);
            }
            state.session.persisted()
        };
        self.events.emit_lossy(ChatEvent::SessionAssigned {
            session_id: session_id.to_string(),
        });
        self.repository.save(&persisted).await?;
        Ok(true)
    }

    /// Makes `session_id` the active conversation with `transcript` as its
    /// content, in one atomic step. `None` starts a new chat.
    pub async fn activate_session(
        &self,
        session_id: Option<String>,
        transcript: Transcript,
    ) -> Result<()> {
        let (persisted, counts) = {
            let mut state = self.state.write().await;
            state.session.reset();
            state.session.session_id = session_id.clone();
            state.stream_state = StreamState::Idle;
            state.last_error = None;
            state.transcript = transcript;
            state.activation = state.activation.wrapping_add(1);
            (state.session.persisted(), transcript_counts(&state.transcript))
        };
        self.events.emit_lossy(ChatEvent::SessionChanged { session_id });
        self.publish_transcript(counts);
        self.repository.save(&persisted).await
    }

    pub async fn set_current_group(&self, group_id: Option<String>) -> Result<()> {
        let persisted = {
            let mut state = self.state.write().await;
            state.session.current_group_id = group_id;
            state.session.persisted()
        };
        self.repository.save(&persisted).await
    }

    pub async fn set_conversations(&self, conversations: Vec<ConversationSummary>) {
        let count = conversations.len();
        self.state.write().await.conversations = conversations;
        self.events
            .emit_lossy(ChatEvent::ConversationsRefreshed { count });
    }

    /// Loads the persisted identity into the store, leaving the transcript
    /// empty. Returns what was loaded.
    pub async fn restore_identity(&self) -> Result<PersistedChatState> {
        let persisted = self.repository.load().await?;
        let mut state = self.state.write().await;
        state.session = ChatSession::from_persisted(persisted.clone());
        Ok(persisted)
    }

    fn publish_transcript(&self, (turns, blocks): (usize, usize)) {
        self.events
            .emit_lossy(ChatEvent::TranscriptUpdated { turns, blocks });
    }
}

fn transcript_counts(transcript: &Transcript) -> (usize, usize) {
    (transcript.len(), transcript.block_count())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use vqa_core::chat::Turn;

    /// In-memory identity repository that records every save.
    #[derive(Default)]
    pub(crate) struct MockStateRepository {
        pub(crate) stored: Mutex<PersistedChatState>,
        pub(crate) saves: Mutex<usize>,
    }

    #[async_trait]
    impl ChatStateRepository for MockStateRepository {
        async fn load(&self) -> Result<PersistedChatState> {
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn save(&self, state: &PersistedChatState) -> Result<()> {
            *self.stored.lock().unwrap() = state.clone();
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }
    }

    pub(crate) fn store_with(repository: Arc<MockStateRepository>) -> TranscriptStore {
        TranscriptStore::new(repository, EventBus::new(64))
    }

    #[tokio::test]
    async fn test_streamed_writes_publish_counts() {
        let store = store_with(Arc::new(MockStateRepository::default()));
        let mut rx = store.subscribe();

        store.append_streamed(0, Block::text("Hi"), true).await;
        store.append_streamed(0, Block::image(["a.png"]), false).await;

        assert_eq!(
            rx.recv().await.unwrap(),
            ChatEvent::TranscriptUpdated { turns: 1, blocks: 1 }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            ChatEvent::TranscriptUpdated { turns: 1, blocks: 2 }
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_snapshot_is_isolated_from_later_writes() {
        let store = store_with(Arc::new(MockStateRepository::default()));
        store.append_streamed(0, Block::text("Hel"), true).await;
        let before = store.snapshot().await;

        store.append_streamed(0, Block::text("lo"), false).await;

        assert_eq!(before.transcript.turns()[0].blocks(), &[Block::text("Hel")]);
        assert_eq!(
            store.transcript().await.turns()[0].blocks(),
            &[Block::text("Hello")]
        );
    }

    #[tokio::test]
    async fn test_assign_session_id_first_wins_and_persists() {
        let repository = Arc::new(MockStateRepository::default());
        let store = store_with(repository.clone());

        assert!(store.assign_session_id("S1").await.unwrap());
        assert!(!store.assign_session_id("S2").await.unwrap());

        assert_eq!(store.session_id().await.as_deref(), Some("S1"));
        assert_eq!(
            repository.stored.lock().unwrap().session_id.as_deref(),
            Some("S1")
        );
        assert_eq!(*repository.saves.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_activate_session_replaces_transcript_and_identity() {
        let repository = Arc::new(MockStateRepository::default());
        let store = store_with(repository.clone());
        store.set_current_group(Some("g1".to_string())).await.unwrap();
        store.open_turn(MessageRole::User, Block::text("old")).await;
        store.set_thinking(Some("thinking".to_string())).await;

        store.activate_session(None, Transcript::new()).await.unwrap();

        let snapshot = store.snapshot().await;
        assert!(snapshot.transcript.is_empty());
        assert_eq!(snapshot.session.session_id, None);
        assert_eq!(snapshot.session.thinking_status, None);
        assert_eq!(snapshot.session.current_group_id.as_deref(), Some("g1"));
        assert_eq!(snapshot.activation, 1);
        assert_eq!(
            *repository.stored.lock().unwrap(),
            PersistedChatState {
                session_id: None,
                current_group_id: Some("g1".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_append_streamed_refuses_stale_activation() {
        let store = store_with(Arc::new(MockStateRepository::default()));
        let before = store.activation().await;
        assert_eq!(
            store.append_streamed(before, Block::text("Hel"), true).await,
            Some(AppendOutcome::TurnOpened)
        );
        assert_eq!(
            store.append_streamed(before, Block::text("lo"), false).await,
            Some(AppendOutcome::Merged)
        );

        store
            .activate_session(
                Some("S2".to_string()),
                Transcript::from_turns([Turn::new(MessageRole::Assistant, Block::text("stored"))]),
            )
            .await
            .unwrap();

        assert_eq!(
            store.append_streamed(before, Block::text(" late"), false).await,
            None
        );
        assert_eq!(
            store.transcript().await.turns()[0].blocks(),
            &[Block::text("stored")]
        );
    }

    #[tokio::test]
    async fn test_set_thinking_reports_change() {
        let store = store_with(Arc::new(MockStateRepository::default()));
        assert!(store.set_thinking(Some("a".to_string())).await);
        assert!(!store.set_thinking(Some("a".to_string())).await);
        assert!(store.set_thinking(None).await);
        assert!(!store.set_thinking(None).await);
    }

    #[tokio::test]
    async fn test_restore_identity() {
        let repository = Arc::new(MockStateRepository::default());
        *repository.stored.lock().unwrap() = PersistedChatState {
            session_id: Some("S9".to_string()),
            current_group_id: Some("g2".to_string()),
        };
        let store = store_with(repository);

        let loaded = store.restore_identity().await.unwrap();
        assert_eq!(loaded.session_id.as_deref(), Some("S9"));
        assert_eq!(store.session().await.current_group_id.as_deref(), Some("g2"));
    }
}
