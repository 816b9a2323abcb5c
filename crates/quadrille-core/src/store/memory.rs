//! In-memory store for tests and ephemeral sessions.

use std::sync::RwLock;

use super::{SessionStore, StoreError, StoreResult};

/// Keeps the serialized scene in memory only.
#[derive(Default)]
pub struct MemoryStore {
    scene: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn save(&self, scene: &str) -> StoreResult<()> {
        let mut slot = self
            .scene
            .write()
            .map_err(|e| StoreError::Other(format!("lock error: {e}")))?;
        *slot = Some(scene.to_string());
        Ok(())
    }

    fn load(&self) -> StoreResult<Option<String>> {
        let slot = self
            .scene
            .read()
            .map_err(|e| StoreError::Other(format!("lock error: {e}")))?;
        Ok(slot.clone())
    }

    fn clear(&self) -> StoreResult<()> {
        let mut slot = self
            .scene
            .write()
            .map_err(|e| StoreError::Other(format!("lock error: {e}")))?;
        *slot = None;
        Ok(())
    }
}
