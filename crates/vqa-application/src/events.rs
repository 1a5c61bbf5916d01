//! Store change notifications.
//!
//! Renderers and background workers subscribe to a broadcast bus instead of
//! polling the store. Events carry only what changed; observers read the
//! data itself from a store snapshot.

use serde::Serialize;
use tokio::sync::broadcast;

/// Notifications published by the transcript store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// The transcript value changed.
    TranscriptUpdated { turns: usize, blocks: usize },
    /// The server assigned an id to the current new chat.
    SessionAssigned { session_id: String },
    /// A different conversation became active (switch or new chat).
    SessionChanged { session_id: Option<String> },
    /// The thinking notice was set or cleared.
    ThinkingChanged { status: Option<String> },
    /// The stored conversation list is out of date.
    HistoryInvalidated,
    /// The assistant finished its response.
    StreamEnded,
    /// The server aborted the response.
    StreamFailed { message: String },
    /// The conversation list was reloaded.
    ConversationsRefreshed { count: usize },
}

/// Broadcast bus for [`ChatEvent`]s.
///
/// Subscribers only receive events emitted after they subscribe. Slow
/// subscribers lag and skip the oldest events rather than blocking writers.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ChatEvent>,
}

impl EventBus {
    /// Creates a new EventBus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.tx.subscribe()
    }

    /// Emits an event to all current subscribers. Having none is not an
    /// error.
    pub fn emit_lossy(&self, event: ChatEvent) {
        if let Err(broadcast::error::SendError(event)) = self.tx.send(event) {
            tracing::trace!("[EventBus] No subscribers for {:?}", event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_reaches_subscribers() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.emit_lossy(ChatEvent::StreamEnded);
        assert_eq!(rx.recv().await.unwrap(), ChatEvent::StreamEnded);
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_events() {
        let bus = EventBus::new(8);
        // no subscribers yet; dropped silently
        bus.emit_lossy(ChatEvent::HistoryInvalidated);

        let mut rx = bus.subscribe();
        bus.emit_lossy(ChatEvent::StreamEnded);
        assert_eq!(rx.recv().await.unwrap(), ChatEvent::StreamEnded);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_value(ChatEvent::ThinkingChanged {
            status: Some("AI is thinking...".to_string()),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "thinking_changed", "status": "AI is thinking..."})
        );
    }
}
