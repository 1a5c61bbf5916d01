//! Session identity model.

use serde::{Deserialize, Serialize};

/// Client-side identity binding a transcript to a server conversation.
///
/// `session_id` is `None` for a new chat until the server assigns one.
/// `thinking_status` is transient UI state and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSession {
    pub session_id: Option<String>,
    pub current_group_id: Option<String>,
    pub thinking_status: Option<String>,
}

impl ChatSession {
    /// Restores identity from persisted state, with no thinking status.
    pub fn from_persisted(state: PersistedChatState) -> Self {
        Self {
            session_id: state.session_id,
            current_group_id: state.current_group_id,
            thinking_status: None,
        }
    }

    /// Assigns `session_id` only if none is set yet.
    ///
    /// The first id wins: a late status event can never move an active
    /// conversation to another id. Returns `true` if the id was assigned.
    pub fn assign_if_unset(&mut self, session_id: &str) -> bool {
        if self.session_id.is_some() {
            return false;
        }
        self.session_id = Some(session_id.to_string());
        true
    }

    /// Forgets the conversation id (new chat). Group scoping is kept.
    pub fn reset(&mut self) {
        self.session_id = None;
        self.thinking_status = None;
    }

    /// The part of the session that survives a reload.
    pub fn persisted(&self) -> PersistedChatState {
        PersistedChatState {
            session_id: self.session_id.clone(),
            current_group_id: self.current_group_id.clone(),
        }
    }
}

/// Session identity as stored between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedChatState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_group_id: Option<String>,
}
