//! Transcript value type.
//!
//! Turns are held behind `Arc` so that successive transcript values share
//! every turn except the one being appended to. Writers obtain the tail turn
//! through [`Arc::make_mut`]: when a reader still holds an older snapshot the
//! tail is copied first, so a snapshot never changes underneath its holder.
//!
//! The copy covers the whole tail turn. An observer that keeps a snapshot
//! alive across every chunk therefore pays for a full copy of the growing
//! answer per chunk, quadratic in its length. Observers should drop
//! snapshots once rendered; an unshared tail is extended in place.

use super::turn::{MessageRole, Turn};
use serde::Serialize;
use std::sync::Arc;

/// Ordered history of turns for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Arc<Turn>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a transcript from hydrated history turns.
    pub fn from_turns(turns: impl IntoIterator<Item = Turn>) -> Self {
        Self {
            turns: turns.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn turns(&self) -> &[Arc<Turn>] {
        &self.turns
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last().map(|turn| turn.as_ref())
    }

    pub fn last_role(&self) -> Option<MessageRole> {
        self.last_turn().map(Turn::role)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Total number of blocks across all turns.
    pub fn block_count(&self) -> usize {
        self.turns.iter().map(|turn| turn.blocks().len()).sum()
    }

    pub(crate) fn push_turn(&mut self, turn: Turn) {
        self.turns.push(Arc::new(turn));
    }

    /// Exclusive access to the last turn, copying it first if shared.
    pub(crate) fn last_turn_mut(&mut self) -> Option<&mut Turn> {
        self.turns.last_mut().map(Arc::make_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::block::Block;

    #[test]
    fn test_last_turn_mut_copies_shared_tail() {
        let mut transcript = Transcript::new();
        transcript.push_turn(Turn::new(MessageRole::Assistant, Block::text("a")));
        let snapshot = transcript.clone();

        transcript
            .last_turn_mut()
            .unwrap()
            .push_block(Block::image(["x.png"]));

        assert_eq!(snapshot.block_count(), 1);
        assert_eq!(transcript.block_count(), 2);
        assert!(!Arc::ptr_eq(&snapshot.turns()[0], &transcript.turns()[0]));
    }

    #[test]
    fn test_last_turn_mut_extends_unshared_tail_in_place() {
        let mut transcript = Transcript::new();
        transcript.push_turn(Turn::new(MessageRole::Assistant, Block::text("a")));
        let snapshot = transcript.clone();
        let before = Arc::as_ptr(&transcript.turns()[0]);
        drop(snapshot);

        transcript
            .last_turn_mut()
            .unwrap()
            .push_block(Block::image(["x.png"]));

        assert_eq!(Arc::as_ptr(&transcript.turns()[0]), before);
        assert_eq!(transcript.block_count(), 2);
    }

    #[test]
    fn test_serializes_as_turn_list() {
        let transcript = Transcript::from_turns([Turn::with_timestamp(
            MessageRole::User,
            "2025-01-01T00:00:00Z",
            Block::text("hi"),
        )]);
        let json = serde_json::to_value(&transcript).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "role": "user",
                "timestamp": "2025-01-01T00:00:00Z",
                "blocks": [{"block_type": "text", "text_content": "hi"}]
            }])
        );
    }
}
