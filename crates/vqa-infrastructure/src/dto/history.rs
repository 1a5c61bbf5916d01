//! Wire DTOs for the chat history API.
//!
//! The server stores one message document per turn:
//!
//! ```json
//! {"chat": [{"role": "USER", "timestamp": "...", "blocks": [
//!     {"block_type": "text", "text_content": "..."},
//!     {"block_type": "image", "image_urls": ["..."]}
//! ]}]}
//! ```
//!
//! Conversion into domain turns is lenient: unknown block types and roles
//! are skipped, and a turn left without blocks is dropped.

use serde::Deserialize;

use vqa_core::chat::{Block, MessageRole, Turn};
use vqa_core::history::ConversationSummary;

/// Response of `GET /api/user/chat-history/{session_id}`.
#[derive(Debug, Deserialize)]
pub struct ChatDetailResponse {
    #[serde(default)]
    pub chat: Vec<TurnDto>,
}

impl ChatDetailResponse {
    pub fn into_turns(self) -> Vec<Turn> {
        self.chat.into_iter().filter_map(TurnDto::into_turn).collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct TurnDto {
    pub role: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub blocks: Vec<BlockDto>,
}

impl TurnDto {
    pub fn into_turn(self) -> Option<Turn> {
        let role: MessageRole = match self.role.parse() {
            Ok(role) => role,
            Err(e) => {
                tracing::warn!("[HistoryDto] Skipping stored turn: {}", e);
                return None;
            }
        };

        let blocks: Vec<Block> = self.blocks.into_iter().filter_map(BlockDto::into_block).collect();
        let turn = Turn::from_blocks(role, self.timestamp, blocks);
        if turn.is_none() {
            tracing::debug!("[HistoryDto] Skipping stored {} turn without blocks", role);
        }
        turn
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "block_type", rename_all = "snake_case")]
pub enum BlockDto {
    Text {
        text_content: String,
    },
    Image {
        image_urls: Vec<String>,
    },
    Video {
        video_urls: Vec<String>,
    },
    #[serde(other)]
    Unknown,
}

impl BlockDto {
    pub fn into_block(self) -> Option<Block> {
        match self {
            BlockDto::Text { text_content } => Some(Block::text(text_content)),
            BlockDto::Image { image_urls } => Some(Block::image(image_urls)),
            BlockDto::Video { video_urls } => Some(Block::video(video_urls)),
            BlockDto::Unknown => None,
        }
    }
}

/// Response of `GET /api/user/chat-history`.
#[derive(Debug, Deserialize)]
pub struct ConversationListResponse {
    #[serde(default)]
    pub chats: Vec<ConversationDto>,
}

impl ConversationListResponse {
    pub fn into_summaries(self) -> Vec<ConversationSummary> {
        self.chats.into_iter().map(ConversationSummary::from).collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ConversationDto {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "last_updated")]
    pub updated_at: Option<String>,
}

impl From<ConversationDto> for ConversationSummary {
    fn from(dto: ConversationDto) -> Self {
        ConversationSummary {
            id: dto.id,
            title: dto.title,
            updated_at: dto.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_into_turns() {
        let response: ChatDetailResponse = serde_json::from_value(json!({
            "chat": [
                {
                    "_id": "m1",
                    "session_id": "S1",
                    "role": "USER",
                    "timestamp": "2025-03-01T10:00:00",
                    "additional_kwargs": {},
                    "blocks": [{"block_type": "text", "text_content": "what is this?"}]
                },
                {
                    "role": "assistant",
                    "timestamp": "2025-03-01T10:00:04",
                    "blocks": [
                        {"block_type": "text", "text_content": "A cat."},
                        {"block_type": "image", "image_urls": ["a.png", "b.png"]},
                        {"block_type": "video", "video_urls": ["clip.mp4"]}
                    ]
                }
            ]
        }))
        .unwrap();

        let turns = response.into_turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role(), MessageRole::User);
        assert_eq!(turns[0].timestamp(), "2025-03-01T10:00:00");
        assert_eq!(
            turns[1].blocks(),
            &[
                Block::text("A cat."),
                Block::image(["a.png", "b.png"]),
                Block::video(["clip.mp4"]),
            ]
        );
    }

    #[test]
    fn test_unknown_blocks_and_empty_turns_are_skipped() {
        let response: ChatDetailResponse = serde_json::from_value(json!({
            "chat": [
                {"role": "assistant", "blocks": [{"block_type": "chart", "bars": [1]}]},
                {"role": "narrator", "blocks": [{"block_type": "text", "text_content": "x"}]},
                {"role": "system", "blocks": [
                    {"block_type": "chart"},
                    {"block_type": "text", "text_content": "indexed 3 videos"}
                ]}
            ]
        }))
        .unwrap();

        let turns = response.into_turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role(), MessageRole::System);
        assert_eq!(turns[0].blocks(), &[Block::text("indexed 3 videos")]);
    }

    #[test]
    fn test_conversation_list_accepts_mongo_ids() {
        let response: ConversationListResponse = serde_json::from_value(json!({
            "chats": [
                {"_id": "65f0", "user_id": "u1", "created_at": "2025-03-01T09:00:00",
                 "last_updated": "2025-03-01T10:00:04"},
                {"id": "65f1", "title": "Dogs"}
            ]
        }))
        .unwrap();

        let summaries = response.into_summaries();
        assert_eq!(summaries[0].id, "65f0");
        assert_eq!(summaries[0].updated_at.as_deref(), Some("2025-03-01T10:00:04"));
        assert_eq!(summaries[1].title.as_deref(), Some("Dogs"));
    }
}
