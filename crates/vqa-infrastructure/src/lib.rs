pub mod config_service;
pub mod dto;
pub mod http_history_repository;
pub mod in_memory_history_repository;
pub mod in_memory_state_repository;
pub mod paths;
pub mod state_repository;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::http_history_repository::HttpHistoryRepository;
pub use crate::in_memory_history_repository::InMemoryHistoryRepository;
pub use crate::in_memory_state_repository::InMemoryChatStateRepository;
pub use crate::paths::VqaPaths;
pub use crate::state_repository::TomlChatStateRepository;
