//! Push channel contracts.
//!
//! The transport itself (socket connection, reconnection, backoff) lives
//! outside this crate. It delivers inbound `(event_name, payload)` pairs in
//! send order and accepts outbound prompts through [`PushChannel`].

mod decoder;
mod event;

use async_trait::async_trait;

use crate::error::Result;

pub use decoder::EventDecoder;
pub use event::{OutboundMessage, StreamEvent};

/// Outbound half of the push channel.
#[async_trait]
pub trait PushChannel: Send + Sync {
    /// Sends `message` under the given wire event name.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The message was handed to the transport
    /// - `Err(_)`: The transport refused the message (e.g. disconnected)
    async fn emit(&self, event_name: &str, message: &OutboundMessage) -> Result<()>;
}
