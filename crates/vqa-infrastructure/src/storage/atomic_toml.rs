//! Atomic TOML file operations.
//!
//! Writes go to a temporary sibling file that is fsynced and renamed over the
//! target, so a crash leaves either the old or the new content. Read-modify-
//! write cycles take an exclusive lock file.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use vqa_core::ChatError;

#[derive(Debug, thiserror::Error)]
pub enum AtomicTomlError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Lock error on {}: {message}", path.display())]
    Lock { path: PathBuf, message: String },
}

impl From<AtomicTomlError> for ChatError {
    fn from(err: AtomicTomlError) -> Self {
        match err {
            AtomicTomlError::Io { .. } | AtomicTomlError::Lock { .. } => {
                ChatError::io(err.to_string())
            }
            AtomicTomlError::Parse { source, .. } => source.into(),
            AtomicTomlError::Serialize(source) => source.into(),
        }
    }
}

/// A TOML document of type `T` stored at one path.
#[derive(Debug, Clone)]
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded
    /// - `Ok(None)`: File doesn't exist or is blank
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.io(e))?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| AtomicTomlError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Writes the document atomically, creating parent directories.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| self.io(e))?;
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path();
        let mut tmp_file = File::create(&tmp_path).map_err(|e| self.io(e))?;
        tmp_file
            .write_all(toml_string.as_bytes())
            .and_then(|_| tmp_file.sync_all())
            .map_err(|e| self.io(e))?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).map_err(|e| self.io(e))
    }

    /// Loads, applies `f`, and saves under an exclusive lock.
    ///
    /// A missing file starts from `T::default()`. Returns the saved value.
    pub fn update<F>(&self, f: F) -> Result<T, AtomicTomlError>
    where
        T: Default,
        F: FnOnce(&mut T),
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or_default();
        f(&mut data);
        self.save(&data)?;
        Ok(data)
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }

    fn io(&self, source: std::io::Error) -> AtomicTomlError {
        AtomicTomlError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Exclusive lock released on drop.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        let lock_path = path.with_extension("lock");
        let io = |source: std::io::Error| AtomicTomlError::Io {
            path: lock_path.clone(),
            source,
        };

        if let Some(parent) = lock_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(io)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(io)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive().map_err(|e| AtomicTomlError::Lock {
                path: lock_path.clone(),
                message: e.to_string(),
            })?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        #[serde(default)]
        label: Option<String>,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("nested/counter.toml"));

        let counter = Counter {
            label: Some("prompts".to_string()),
            count: 3,
        };
        file.save(&counter).unwrap();

        assert_eq!(file.load().unwrap(), Some(counter));
        assert!(!temp_dir.path().join("nested/.counter.toml.tmp").exists());
    }

    #[test]
    fn test_missing_and_blank_files_load_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.toml");
        let file = AtomicTomlFile::<Counter>::new(path.clone());
        assert_eq!(file.load().unwrap(), None);

        fs::write(&path, "   \n").unwrap();
        assert_eq!(file.load().unwrap(), None);
    }

    #[test]
    fn test_update_starts_from_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.toml");
        let file = AtomicTomlFile::<Counter>::new(path.clone());

        file.update(|c| c.count += 10).unwrap();
        let saved = file.update(|c| c.count += 5).unwrap();

        assert_eq!(saved.count, 15);
        assert_eq!(file.load().unwrap().unwrap().count, 15);
        assert!(!path.with_extension("lock").exists());
    }

    #[test]
    fn test_parse_error_maps_to_serialization() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.toml");
        fs::write(&path, "count = \"not a number\"").unwrap();

        let err = AtomicTomlFile::<Counter>::new(path).load().unwrap_err();
        assert!(matches!(err, AtomicTomlError::Parse { .. }));
        assert!(ChatError::from(err).is_serialization());
    }
}
