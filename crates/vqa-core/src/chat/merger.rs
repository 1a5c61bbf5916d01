//! Same-kind block merging.
//!
//! Streams arrive as bursts of same-kind chunks (token-by-token text, batched
//! media URLs). Folding each burst into one block keeps the transcript sized by
//! semantic blocks rather than wire events.

use super::block::Block;

/// Result of offering a block to the tail of a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The block was folded into the existing tail block.
    Merged,
    /// The block could not be merged and must be appended as a new block.
    Rejected(Block),
}

impl MergeOutcome {
    pub fn is_merged(&self) -> bool {
        matches!(self, MergeOutcome::Merged)
    }
}

/// Folds `new` into `last` in place when both have the same kind.
///
/// Text is concatenated; image and video URL lists are appended in order.
/// A missing tail or a kind change rejects the block and hands it back.
pub fn try_merge(last: Option<&mut Block>, new: Block) -> MergeOutcome {
    let Some(last) = last else {
        return MergeOutcome::Rejected(new);
    };

    match (last, new) {
        (
            Block::Text { text_content },
            Block::Text {
                text_content: fragment,
            },
        ) => {
            text_content.push_str(&fragment);
            MergeOutcome::Merged
        }
        (Block::Image { urls }, Block::Image { urls: more })
        | (Block::Video { urls }, Block::Video { urls: more }) => {
            urls.extend(more);
            MergeOutcome::Merged
        }
        (_, new) => MergeOutcome::Rejected(new),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_concatenates() {
        let mut last = Block::text("Hel");
        assert!(try_merge(Some(&mut last), Block::text("lo")).is_merged());
        assert_eq!(last, Block::text("Hello"));
    }

    #[test]
    fn test_empty_text_fragment_merges() {
        let mut last = Block::text("a");
        assert!(try_merge(Some(&mut last), Block::text("")).is_merged());
        assert_eq!(last, Block::text("a"));
    }

    #[test]
    fn test_media_appends_in_order() {
        let mut images = Block::image(["a.png"]);
        assert!(try_merge(Some(&mut images), Block::image(["b.png", "c.png"])).is_merged());
        assert_eq!(images, Block::image(["a.png", "b.png", "c.png"]));

        let mut videos = Block::video(["1.mp4"]);
        assert!(try_merge(Some(&mut videos), Block::video(["2.mp4"])).is_merged());
        assert_eq!(videos, Block::video(["1.mp4", "2.mp4"]));
    }

    #[test]
    fn test_kind_change_rejects() {
        let mut last = Block::text("look:");
        let outcome = try_merge(Some(&mut last), Block::image(["a.png"]));
        assert_eq!(outcome, MergeOutcome::Rejected(Block::image(["a.png"])));
        assert_eq!(last, Block::text("look:"));

        // image and video both carry urls but never fuse
        let mut images = Block::image(["a.png"]);
        assert!(!try_merge(Some(&mut images), Block::video(["v.mp4"])).is_merged());
        assert_eq!(images, Block::image(["a.png"]));
    }

    #[test]
    fn test_missing_tail_rejects() {
        let outcome = try_merge(None, Block::text("x"));
        assert_eq!(outcome, MergeOutcome::Rejected(Block::text("x")));
    }
}
