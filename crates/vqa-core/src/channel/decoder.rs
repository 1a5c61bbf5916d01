//! Wire decoding of push-channel events.
//!
//! Maps configured event names and their JSON payloads onto [`StreamEvent`].
//! A payload with missing fields or the wrong shape is reported as
//! [`ChatError::MalformedEvent`] so the caller can drop that one event and
//! keep consuming the stream.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::event::StreamEvent;
use crate::chat::{BlockKind, ChunkPayload};
use crate::config::ChannelConfig;
use crate::error::{ChatError, Result};

#[derive(Deserialize)]
struct StatusPayload {
    session_id: String,
}

#[derive(Deserialize)]
struct ThinkingPayload {
    status: String,
}

#[derive(Deserialize)]
struct ChunkWire {
    msg_type: String,
    chunk: ChunkPayload,
}

#[derive(Deserialize)]
struct ErrorPayload {
    message: String,
}

/// Decodes raw `(event_name, payload)` pairs using the configured names.
#[derive(Debug, Clone)]
pub struct EventDecoder {
    names: ChannelConfig,
}

impl EventDecoder {
    pub fn new(names: ChannelConfig) -> Self {
        Self { names }
    }

    /// Decodes one inbound event.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(event))`: a recognized event
    /// - `Ok(None)`: an event name this client does not consume
    /// - `Err(ChatError::MalformedEvent)`: a recognized event with a bad payload
    pub fn decode(&self, name: &str, payload: Value) -> Result<Option<StreamEvent>> {
        let names = &self.names;

        let event = if name == names.status_event {
            let p: StatusPayload = from_payload(name, payload)?;
            StreamEvent::Status {
                session_id: p.session_id,
            }
        } else if name == names.thinking_event {
            let p: ThinkingPayload = from_payload(name, payload)?;
            StreamEvent::Thinking { status: p.status }
        } else if name == names.chunk_event {
            let p: ChunkWire = from_payload(name, payload)?;
            if let Some(kind) = BlockKind::from_msg_type(&p.msg_type)
                && !p.chunk.fits(kind)
            {
                return Err(ChatError::malformed(
                    name,
                    format!("'{}' chunk carried a {}", kind, p.chunk.shape()),
                ));
            }
            StreamEvent::Chunk {
                msg_type: p.msg_type,
                chunk: p.chunk,
            }
        } else if name == names.end_event {
            StreamEvent::End
        } else if name == names.error_event {
            let p: ErrorPayload = from_payload(name, payload)?;
            StreamEvent::Failed { message: p.message }
        } else {
            return Ok(None);
        };

        Ok(Some(event))
    }
}

impl Default for EventDecoder {
    fn default() -> Self {
        Self::new(ChannelConfig::default())
    }
}

fn from_payload<T: DeserializeOwned>(name: &str, payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| ChatError::malformed(name, e.to_string()))
}
