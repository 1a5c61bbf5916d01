//! Wiring for one chat client.
//!
//! Owns the shared store and the injected collaborators, and hands out the
//! service objects that operate on them. Nothing here is global; a process
//! may run several independent contexts.

use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;

use vqa_core::channel::{EventDecoder, PushChannel};
use vqa_core::config::RootConfig;
use vqa_core::history::HistoryRepository;
use vqa_core::session::ChatStateRepository;

use crate::chat_service::ChatService;
use crate::driver::{SessionDriver, SessionHandle};
use crate::events::EventBus;
use crate::store::TranscriptStore;
use crate::streaming::StreamingSession;

/// Default capacity of the change-notification bus.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

pub struct ChatContext {
    config: RootConfig,
    store: Arc<TranscriptStore>,
    history: Arc<dyn HistoryRepository>,
    channel: Arc<dyn PushChannel>,
    user_id: Option<String>,
    refresher: OnceLock<JoinHandle<()>>,
}

impl ChatContext {
    pub fn new(
        config: RootConfig,
        state_repository: Arc<dyn ChatStateRepository>,
        history: Arc<dyn HistoryRepository>,
        channel: Arc<dyn PushChannel>,
    ) -> Self {
        let store = Arc::new(TranscriptStore::new(
            state_repository,
            EventBus::new(DEFAULT_EVENT_CAPACITY),
        ));
        Self {
            config,
            store,
            history,
            channel,
            user_id: None,
            refresher: OnceLock::new(),
        }
    }

    /// Sets the signed-in user attached to outbound prompts.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn config(&self) -> &RootConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<TranscriptStore> {
        &self.store
    }

    pub fn chat_service(&self) -> ChatService {
        ChatService::new(
            self.store.clone(),
            self.history.clone(),
            self.channel.clone(),
            self.config.channel.outbound_event.clone(),
            self.user_id.clone(),
        )
    }

    /// Starts the driver task that consumes inbound push-channel events.
    ///
    /// The transport forwards every event it receives to the returned
    /// handle, in the order received. The first call also starts the history
    /// refresher, so status events keep the conversation list current.
    pub fn start_session(&self) -> (SessionHandle, JoinHandle<StreamingSession>) {
        self.refresher
            .get_or_init(|| self.chat_service().spawn_history_refresher());

        let channel = &self.config.channel;
        SessionDriver::spawn(
            StreamingSession::new(self.store.clone()),
            EventDecoder::new(channel.clone()),
            channel.event_buffer,
        )
    }
}
