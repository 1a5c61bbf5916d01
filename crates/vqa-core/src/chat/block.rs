//! Content blocks.
//!
//! A block is the smallest typed unit of a turn. Its payload shape is fixed by
//! its kind: text blocks carry a string, image and video blocks carry an
//! ordered list of URLs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of a [`Block`], used for merge decisions and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Text,
    Image,
    Video,
}

impl BlockKind {
    /// Wire name of the kind (`"text"`, `"image"`, `"video"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Video => "video",
        }
    }

    /// Resolves a wire `msg_type`. Unrecognized kinds yield `None`.
    pub fn from_msg_type(msg_type: &str) -> Option<Self> {
        match msg_type {
            "text" => Some(BlockKind::Text),
            "image" => Some(BlockKind::Image),
            "video" => Some(BlockKind::Video),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single piece of content within a turn.
///
/// Serialized with the same shape the history API uses
/// (`block_type` tag plus `text_content` / `image_urls` / `video_urls`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "block_type", rename_all = "snake_case")]
pub enum Block {
    /// A fragment (or accumulation) of assistant or user text.
    Text { text_content: String },
    /// An ordered batch of image URLs.
    Image {
        #[serde(rename = "image_urls")]
        urls: Vec<String>,
    },
    /// An ordered batch of video URLs.
    Video {
        #[serde(rename = "video_urls")]
        urls: Vec<String>,
    },
}

impl Block {
    pub fn text(content: impl Into<String>) -> Self {
        Block::Text {
            text_content: content.into(),
        }
    }

    pub fn image<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Block::Image {
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }

    pub fn video<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Block::Video {
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Text { .. } => BlockKind::Text,
            Block::Image { .. } => BlockKind::Image,
            Block::Video { .. } => BlockKind::Video,
        }
    }

    /// Text content, if this is a text block.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Block::Text { text_content } => Some(text_content),
            _ => None,
        }
    }

    /// URL list, if this is a media block.
    pub fn urls(&self) -> Option<&[String]> {
        match self {
            Block::Image { urls } | Block::Video { urls } => Some(urls),
            Block::Text { .. } => None,
        }
    }

    /// Plain-text rendering: text as-is, media URLs one per line.
    pub fn as_plain_text(&self) -> String {
        match self {
            Block::Text { text_content } => text_content.clone(),
            Block::Image { urls } | Block::Video { urls } => urls.join("\n"),
        }
    }
}
