use serde::{Deserialize, Serialize};

use crate::chat::ChunkPayload;

/// Inbound events delivered by the push channel for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Server acknowledged the prompt and names the conversation it belongs to.
    Status { session_id: String },
    /// Transient progress notice shown until content starts.
    Thinking { status: String },
    /// One content chunk of the assistant response.
    Chunk { msg_type: String, chunk: ChunkPayload },
    /// The assistant response is complete.
    End,
    /// The server aborted generation.
    Failed { message: String },
}

impl StreamEvent {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            StreamEvent::Status { .. } => "status",
            StreamEvent::Thinking { .. } => "thinking",
            StreamEvent::Chunk { .. } => "chunk",
            StreamEvent::End => "end",
            StreamEvent::Failed { .. } => "failed",
        }
    }
}

/// Outbound user prompt, serialized as the server expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    /// Signed-in user, `None` for guests.
    pub user_id: Option<String>,
    /// Conversation id, `None` for a new chat.
    pub session_id: Option<String>,
    pub text: String,
    /// Library/group scoping, passed through uninterpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}
