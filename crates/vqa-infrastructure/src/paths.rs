//! Path management for vqa configuration and state files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/vqa/               # Config directory (platform default)
//! ├── config.toml              # Application configuration
//! └── chat_state.toml          # Persisted session identity
//! ```

use std::path::{Path, PathBuf};

/// Errors that can occur during path resolution.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// The platform config directory could not be determined.
    #[error("Cannot find config directory")]
    ConfigDirNotFound,
}

impl From<PathError> for vqa_core::ChatError {
    fn from(err: PathError) -> Self {
        vqa_core::ChatError::config(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct VqaPaths {
    root: PathBuf,
}

impl VqaPaths {
    pub const APP_DIR: &'static str = "vqa";
    pub const CONFIG_FILE: &'static str = "config.toml";
    pub const STATE_FILE: &'static str = "chat_state.toml";

    /// Resolves the vqa directory.
    ///
    /// With `base = None` the platform config directory is used
    /// (`~/.config/vqa` on Linux). Tests pass a temporary directory.
    pub fn new(base: Option<&Path>) -> Result<Self, PathError> {
        let root = match base {
            Some(base) => base.to_path_buf(),
            None => dirs::config_dir()
                .ok_or(PathError::ConfigDirNotFound)?
                .join(Self::APP_DIR),
        };
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(Self::CONFIG_FILE)
    }

    pub fn state_file(&self) -> PathBuf {
        self.root.join(Self::STATE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_override() {
        let paths = VqaPaths::new(Some(Path::new("/tmp/vqa-test"))).unwrap();
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/vqa-test/config.toml"));
        assert_eq!(paths.state_file(), PathBuf::from("/tmp/vqa-test/chat_state.toml"));
    }

    #[test]
    fn test_default_ends_with_app_dir() {
        if let Ok(paths) = VqaPaths::new(None) {
            assert!(paths.root().ends_with(VqaPaths::APP_DIR));
        }
    }
}
