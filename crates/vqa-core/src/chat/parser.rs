//! Chunk-to-block conversion.

use super::block::{Block, BlockKind};
use serde::{Deserialize, Serialize};

/// Raw `chunk` payload of a stream chunk event.
///
/// Text chunks carry a string fragment, media chunks carry a list of URLs.
/// Anything else is kept verbatim so that unknown chunk kinds can still be
/// carried through and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChunkPayload {
    Text(String),
    Urls(Vec<String>),
    Other(serde_json::Value),
}

impl ChunkPayload {
    /// Whether this payload has the shape required by `kind`.
    pub fn fits(&self, kind: BlockKind) -> bool {
        matches!(
            (kind, self),
            (BlockKind::Text, ChunkPayload::Text(_))
                | (BlockKind::Image, ChunkPayload::Urls(_))
                | (BlockKind::Video, ChunkPayload::Urls(_))
        )
    }

    /// Short description of the payload shape for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            ChunkPayload::Text(_) => "string",
            ChunkPayload::Urls(_) => "string array",
            ChunkPayload::Other(_) => "other json",
        }
    }
}

/// Converts a `(msg_type, chunk)` pair into a block.
///
/// Returns `None` for unrecognized kinds, and for a payload whose shape does
/// not fit its kind. Neither case is an error for the stream: the chunk is
/// simply not assembled.
pub fn parse(msg_type: &str, chunk: ChunkPayload) -> Option<Block> {
    let kind = BlockKind::from_msg_type(msg_type)?;
    match (kind, chunk) {
        (BlockKind::Text, ChunkPayload::Text(text_content)) => Some(Block::Text { text_content }),
        (BlockKind::Image, ChunkPayload::Urls(urls)) => Some(Block::Image { urls }),
        (BlockKind::Video, ChunkPayload::Urls(urls)) => Some(Block::Video { urls }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> ChunkPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(parse("text", payload(json!("Hel"))), Some(Block::text("Hel")));
        assert_eq!(parse("text", payload(json!(""))), Some(Block::text("")));
        assert_eq!(
            parse("image", payload(json!(["a.png", "b.png"]))),
            Some(Block::image(["a.png", "b.png"]))
        );
        assert_eq!(
            parse("video", payload(json!(["v.mp4"]))),
            Some(Block::video(["v.mp4"]))
        );
    }

    #[test]
    fn test_unknown_kind_is_none_for_any_payload() {
        for value in [json!("x"), json!(["a"]), json!({"k": 1}), json!(null), json!(3)] {
            assert_eq!(parse("audio", payload(value)), None);
        }
        assert_eq!(parse("", payload(json!("x"))), None);
    }

    #[test]
    fn test_mismatched_shape_is_none() {
        assert_eq!(parse("text", payload(json!(["a.png"]))), None);
        assert_eq!(parse("image", payload(json!("a.png"))), None);
    }

    #[test]
    fn test_payload_shapes() {
        assert_eq!(payload(json!("a")), ChunkPayload::Text("a".into()));
        assert_eq!(payload(json!([])), ChunkPayload::Urls(Vec::new()));
        assert!(matches!(payload(json!([1, 2])), ChunkPayload::Other(_)));
        assert!(payload(json!(["a"])).fits(BlockKind::Video));
        assert!(!payload(json!("a")).fits(BlockKind::Image));
    }
}
