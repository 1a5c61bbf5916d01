//! In-memory history store.
//!
//! Backs offline runs (event-log replay) and tests. Conversations are kept
//! in insertion order.

use async_trait::async_trait;
use tokio::sync::RwLock;

use vqa_core::chat::Turn;
use vqa_core::error::{ChatError, Result};
use vqa_core::history::{ConversationSummary, HistoryRepository};

#[derive(Default)]
pub struct InMemoryHistoryRepository {
    conversations: RwLock<Vec<(ConversationSummary, Vec<Turn>)>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a conversation.
    pub async fn insert(&self, summary: ConversationSummary, turns: Vec<Turn>) {
        let mut conversations = self.conversations.write().await;
        match conversations.iter_mut().find(|(s, _)| s.id == summary.id) {
            Some(entry) => *entry = (summary, turns),
            None => conversations.push((summary, turns)),
        }
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn find_turns(&self, session_id: &str) -> Result<Vec<Turn>> {
        self.conversations
            .read()
            .await
            .iter()
            .find(|(summary, _)| summary.id == session_id)
            .map(|(_, turns)| turns.clone())
            .ok_or_else(|| ChatError::not_found("Conversation", session_id))
    }

    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>> {
        Ok(self
            .conversations
            .read()
            .await
            .iter()
            .map(|(summary, _)| summary.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vqa_core::chat::{Block, MessageRole};

    fn summary(id: &str) -> ConversationSummary {
        ConversationSummary {
            id: id.to_string(),
            title: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_find_and_list() {
        let repo = InMemoryHistoryRepository::new();
        repo.insert(
            summary("S1"),
            vec![Turn::new(MessageRole::User, Block::text("hi"))],
        )
        .await;
        repo.insert(summary("S2"), Vec::new()).await;
        repo.insert(
            summary("S1"),
            vec![
                Turn::new(MessageRole::User, Block::text("hi")),
                Turn::new(MessageRole::Assistant, Block::text("hello")),
            ],
        )
        .await;

        assert_eq!(repo.find_turns("S1").await.unwrap().len(), 2);
        let ids: Vec<_> = repo
            .list_conversations()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["S1", "S2"]);
        assert!(repo.find_turns("S3").await.unwrap_err().is_not_found());
    }
}
