//! Configuration service.
//!
//! Loads [`RootConfig`] from `config.toml`, writing a default file on first
//! run, and caches it.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use vqa_core::config::RootConfig;
use vqa_core::error::Result;

use crate::paths::VqaPaths;
use crate::storage::AtomicTomlFile;

#[derive(Debug, Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<RootConfig>>,
    /// Cached configuration, filled on first access.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &VqaPaths) -> Self {
        Self::with_path(paths.config_file())
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, loading it on first access.
    ///
    /// A missing file is created with defaults. A file that fails to parse
    /// or validate is an error and is left untouched.
    pub fn load(&self) -> Result<RootConfig> {
        if let Some(cached) = self
            .config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
        {
            return Ok(cached.clone());
        }

        let loaded = match self.file.load()? {
            Some(config) => config,
            None => {
                let config = RootConfig::default();
                self.file.save(&config)?;
                tracing::info!(
                    "[ConfigService] Wrote default config to {}",
                    self.file.path().display()
                );
                config
            }
        };
        loaded.validate()?;

        *self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(loaded.clone());
        Ok(loaded)
    }

    /// Like [`load`](Self::load), but falls back to defaults on error.
    pub fn get_config(&self) -> RootConfig {
        self.load().unwrap_or_else(|e| {
            tracing::warn!("[ConfigService] Using default config: {}", e);
            RootConfig::default()
        })
    }

    /// Forces a reload on next access.
    pub fn invalidate_cache(&self) {
        *self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}
