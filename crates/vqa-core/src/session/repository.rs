//! Session identity repository trait.

use super::model::PersistedChatState;
use crate::error::Result;
use async_trait::async_trait;

/// Persists the session identity across restarts.
///
/// Only the conversation id and group scoping are stored; transcripts are
/// rehydrated from the history store.
#[async_trait]
pub trait ChatStateRepository: Send + Sync {
    /// Loads the stored identity, or the default when nothing is stored yet.
    async fn load(&self) -> Result<PersistedChatState>;

    /// Replaces the stored identity.
    async fn save(&self, state: &PersistedChatState) -> Result<()>;
}
