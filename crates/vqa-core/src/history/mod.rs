//! Durable chat history contracts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chat::Turn;
use crate::error::Result;

/// Sidebar entry for one stored conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Last update (ISO 8601 format), when the server reports it.
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Request/response access to stored conversations.
///
/// Used to hydrate a transcript when a session becomes active and to list
/// conversations. It is not a live sync mechanism.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Returns the ordered turns of a stored conversation.
    ///
    /// # Returns
    ///
    /// - `Ok(turns)`: The stored turns (possibly empty)
    /// - `Err(ChatError::NotFound)`: No conversation with that id
    /// - `Err(_)`: Retrieval failed
    async fn find_turns(&self, session_id: &str) -> Result<Vec<Turn>>;

    /// Lists stored conversations for the current user.
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>>;
}
