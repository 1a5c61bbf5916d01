pub mod channel;
pub mod chat;
pub mod config;
pub mod error;
pub mod history;
pub mod session;

// Re-export common error type
pub use error::ChatError;
