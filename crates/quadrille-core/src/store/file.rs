//! File-backed store for native sessions.

use std::fs;
use std::path::{Path, PathBuf};

use super::{SessionStore, StoreError, StoreResult};

/// Stores the serialized scene as a single JSON file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store writing to the given file path.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn new(path: PathBuf) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Io(format!("failed to create store directory: {e}"))
                })?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn save(&self, scene: &str) -> StoreResult<()> {
        fs::write(&self.path, scene)
            .map_err(|e| StoreError::Io(format!("failed to write {}: {e}", self.path.display())))
    }

    fn load(&self) -> StoreResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&self.path)
            .map(Some)
            .map_err(|e| StoreError::Io(format!("failed to read {}: {e}", self.path.display())))
    }

    fn clear(&self) -> StoreResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                StoreError::Io(format!("failed to delete {}: {e}", self.path.display()))
            })?;
        }
        Ok(())
    }
}
