//! Session persistence bridge.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::Camera;
use crate::stroke::{Stroke, StrokeId};

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid scene snapshot: {0}")]
    InvalidScene(String),
    #[error("store error: {0}")]
    Other(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Raw scene store the session saves through.
///
/// Writes are synchronous and best-effort: the session logs a failed save
/// and keeps going, and never retries.
pub trait SessionStore {
    /// Persist a serialized scene, replacing any previous one.
    fn save(&self, scene: &str) -> StoreResult<()>;

    /// Fetch the last saved scene, or `None` if nothing was saved.
    fn load(&self) -> StoreResult<Option<String>>;

    /// Forget the saved scene.
    fn clear(&self) -> StoreResult<()>;
}

/// Committed-history portion of a snapshot. The redo cache is transient and
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub entries: Vec<StrokeId>,
    pub cursor: usize,
}

/// The full serialized scene graph: strokes, history, and camera.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub strokes: Vec<Stroke>,
    pub history: HistorySnapshot,
    pub camera: Camera,
}

impl SceneSnapshot {
    pub fn to_json(&self) -> StoreResult<String> {
        serde_json::to_string(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> StoreResult<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| StoreError::InvalidScene(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check internal consistency: the cursor must fit the entry list and
    /// every history entry must reference a stroke in the scene.
    pub fn validate(&self) -> StoreResult<()> {
        if self.history.cursor > self.history.entries.len() {
            return Err(StoreError::InvalidScene(format!(
                "history cursor {} exceeds {} entries",
                self.history.cursor,
                self.history.entries.len()
            )));
        }
        for entry in &self.history.entries {
            if !self.strokes.iter().any(|s| s.id() == *entry) {
                return Err(StoreError::InvalidScene(format!(
                    "history references unknown stroke {entry}"
                )));
            }
        }
        Ok(())
    }
}

/// Outcome of restoring a session from its store.
#[derive(Debug, Clone)]
pub enum RestoredScene {
    /// Nothing was saved; start from an empty surface.
    Fresh,
    /// A validated snapshot to replay onto the surface.
    Restored(SceneSnapshot),
}

/// Load and validate whatever the store holds.
///
/// A missing scene is `Fresh`; a present but malformed one is an explicit
/// error, never a silent fallback to empty.
pub fn restore_from(store: &dyn SessionStore) -> StoreResult<RestoredScene> {
    match store.load()? {
        None => Ok(RestoredScene::Fresh),
        Some(json) => Ok(RestoredScene::Restored(SceneSnapshot::from_json(&json)?)),
    }
}
