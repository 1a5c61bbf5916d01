//! Conversation turns.

use super::block::Block;
use crate::error::ChatError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents the speaker of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Turn from the user.
    User,
    /// Turn from the AI assistant.
    Assistant,
    /// System-generated turn.
    System,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = ChatError;

    /// Parses a role case-insensitively (the history API stores `USER`, the
    /// socket uses `user`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            "system" => Ok(MessageRole::System),
            other => Err(ChatError::Serialization {
                format: "role".to_string(),
                message: format!("unknown message role '{}'", other),
            }),
        }
    }
}

/// One speaker's contribution to a transcript.
///
/// A turn always holds at least one block; the constructors enforce it and
/// blocks can only be added, never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    role: MessageRole,
    /// Timestamp when the turn was opened (ISO 8601 format).
    timestamp: String,
    blocks: Vec<Block>,
}

impl Turn {
    /// Opens a turn with its first block, stamped with the current time.
    pub fn new(role: MessageRole, first: Block) -> Self {
        Self::with_timestamp(role, chrono::Utc::now().to_rfc3339(), first)
    }

    pub fn with_timestamp(role: MessageRole, timestamp: impl Into<String>, first: Block) -> Self {
        Self {
            role,
            timestamp: timestamp.into(),
            blocks: vec![first],
        }
    }

    /// Builds a turn from already-assembled blocks, e.g. durable history.
    ///
    /// Returns `None` when `blocks` is empty.
    pub fn from_blocks(
        role: MessageRole,
        timestamp: impl Into<String>,
        blocks: Vec<Block>,
    ) -> Option<Self> {
        if blocks.is_empty() {
            return None;
        }
        Some(Self {
            role,
            timestamp: timestamp.into(),
            blocks,
        })
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn last_block(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Exclusive access to the tail block, the only block a merge may touch.
    pub(crate) fn last_block_mut(&mut self) -> Option<&mut Block> {
        self.blocks.last_mut()
    }

    pub(crate) fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("USER".parse::<MessageRole>().unwrap(), MessageRole::User);
        assert_eq!(
            "Assistant".parse::<MessageRole>().unwrap(),
            MessageRole::Assistant
        );
        assert_eq!("system".parse::<MessageRole>().unwrap(), MessageRole::System);
        assert!("tool".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_from_blocks_rejects_empty() {
        assert!(Turn::from_blocks(MessageRole::User, "t", Vec::new()).is_none());
        let turn = Turn::from_blocks(MessageRole::User, "t", vec![Block::text("x")]).unwrap();
        assert_eq!(turn.blocks().len(), 1);
    }

    #[test]
    fn test_new_turn_has_one_block() {
        let turn = Turn::new(MessageRole::Assistant, Block::text("hi"));
        assert_eq!(turn.role(), MessageRole::Assistant);
        assert_eq!(turn.blocks(), &[Block::text("hi")]);
        assert!(!turn.timestamp().is_empty());
    }
}
