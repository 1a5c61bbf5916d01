//! Session domain module.
//!
//! - `model`: Session identity (`ChatSession`, `PersistedChatState`)
//! - `repository`: Persistence trait for the identity (`ChatStateRepository`)

mod model;
mod repository;

pub use model::{ChatSession, PersistedChatState};
pub use repository::ChatStateRepository;
