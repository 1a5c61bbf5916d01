//! Non-persistent session identity repository.

use async_trait::async_trait;
use tokio::sync::RwLock;

use vqa_core::error::Result;
use vqa_core::session::{ChatStateRepository, PersistedChatState};

/// Keeps the identity for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct InMemoryChatStateRepository {
    state: RwLock<PersistedChatState>,
}

impl InMemoryChatStateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatStateRepository for InMemoryChatStateRepository {
    async fn load(&self) -> Result<PersistedChatState> {
        Ok(self.state.read().await.clone())
    }

    async fn save(&self, state: &PersistedChatState) -> Result<()> {
        *self.state.write().await = state.clone();
        Ok(())
    }
}
