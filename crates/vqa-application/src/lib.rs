//! Application layer of the VQA chat client.
//!
//! Turns decoded push-channel events into transcript updates and exposes the
//! result to observers through [`TranscriptStore`].

pub mod chat_service;
pub mod context;
pub mod driver;
pub mod events;
pub mod store;
pub mod streaming;

pub use chat_service::ChatService;
pub use context::ChatContext;
pub use driver::{InboundEvent, SessionDriver, SessionHandle};
pub use events::{ChatEvent, EventBus};
pub use store::{ChatSnapshot, TranscriptStore};
pub use streaming::{StreamState, StreamingSession};
