//! TOML-backed session identity repository.
//!
//! Stores [`PersistedChatState`] in `chat_state.toml` so the active
//! conversation and group scoping survive a restart.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use vqa_core::error::{ChatError, Result};
use vqa_core::session::{ChatStateRepository, PersistedChatState};

use crate::paths::VqaPaths;
use crate::storage::AtomicTomlFile;

#[derive(Debug, Clone)]
pub struct TomlChatStateRepository {
    file: Arc<AtomicTomlFile<PersistedChatState>>,
}

impl TomlChatStateRepository {
    /// Uses `chat_state.toml` under the given paths.
    pub fn new(paths: &VqaPaths) -> Self {
        Self::with_path(paths.state_file())
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }
}

#[async_trait]
impl ChatStateRepository for TomlChatStateRepository {
    async fn load(&self) -> Result<PersistedChatState> {
        let file = self.file.clone();
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| ChatError::internal(format!("Failed to join task: {}", e)))??;
        Ok(loaded.unwrap_or_default())
    }

    async fn save(&self, state: &PersistedChatState) -> Result<()> {
        let file = self.file.clone();
        let state = state.clone();
        tokio::task::spawn_blocking(move || file.update(|stored| *stored = state))
            .await
            .map_err(|e| ChatError::internal(format!("Failed to join task: {}", e)))??;
        tracing::debug!(
            "[TomlChatStateRepository] Saved chat state to {}",
            self.file.path().display()
        );
        Ok(())
    }
}
