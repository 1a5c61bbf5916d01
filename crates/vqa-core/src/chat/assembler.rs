//! Transcript assembly.
//!
//! [`append_block`] is the value-level operation: it leaves its input intact
//! and returns the next transcript, sharing every turn but the tail. The
//! `Transcript::append` method is the same algorithm applied in place, which
//! the store uses so that an unshared tail is extended without copying.

use super::block::Block;
use super::merger::{MergeOutcome, try_merge};
use super::transcript::Transcript;
use super::turn::{MessageRole, Turn};

/// What an append did to the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Nothing to append.
    Unchanged,
    /// Folded into the tail block of the last turn.
    Merged,
    /// Added as a new block at the end of the last turn.
    BlockAdded,
    /// Opened a new turn.
    TurnOpened,
}

/// Returns `transcript` with `block` appended on behalf of `role`.
pub fn append_block(transcript: &Transcript, role: MessageRole, block: Option<Block>) -> Transcript {
    let mut next = transcript.clone();
    next.append(role, block);
    next
}

/// Returns `transcript` with a new turn for `role` holding `block`, even when
/// the last turn already belongs to `role`.
pub fn open_turn(transcript: &Transcript, role: MessageRole, block: Block) -> Transcript {
    let mut next = transcript.clone();
    next.open_turn(role, block);
    next
}

impl Transcript {
    /// Appends `block` for `role`, merging into the tail when possible.
    ///
    /// - `None` leaves the transcript untouched.
    /// - If the last turn belongs to `role`, the block is merged into its
    ///   tail block or pushed after it.
    /// - Otherwise a new turn is opened with `block` as its only block.
    pub fn append(&mut self, role: MessageRole, block: Option<Block>) -> AppendOutcome {
        let Some(block) = block else {
            return AppendOutcome::Unchanged;
        };

        if self.last_role() != Some(role) {
            self.push_turn(Turn::new(role, block));
            return AppendOutcome::TurnOpened;
        }

        let Some(last) = self.last_turn_mut() else {
            // last_role() returned Some, so a last turn exists
            return AppendOutcome::Unchanged;
        };
        match try_merge(last.last_block_mut(), block) {
            MergeOutcome::Merged => AppendOutcome::Merged,
            MergeOutcome::Rejected(block) => {
                last.push_block(block);
                AppendOutcome::BlockAdded
            }
        }
    }

    /// Opens a new turn for `role` with `block`, never merging.
    pub fn open_turn(&mut self, role: MessageRole, block: Block) -> AppendOutcome {
        self.push_turn(Turn::new(role, block));
        AppendOutcome::TurnOpened
    }
}
