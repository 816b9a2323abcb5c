//! Bounded linear stroke history with a redo cache.

use log::{debug, error};
use thiserror::Error;

use crate::stroke::StrokeId;

/// Maximum number of strokes tracked by the history.
pub const MAX_HISTORY_SIZE: usize = 50;

/// History errors.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The cursor no longer agrees with the entry list. This indicates a
    /// state-machine bug, not a recoverable condition.
    #[error("invalid history state: cursor {cursor} with {entries} entries")]
    InvalidState { cursor: usize, entries: usize },
}

/// Result of a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// The history was full; the stroke was not recorded.
    DroppedAtCapacity,
}

/// Ordered, bounded list of committed strokes with a cursor separating done
/// from undone work.
///
/// The cursor marks the boundary: entries below it are live, entries at or
/// above it are stale slots left behind by undo. Undo never removes entries;
/// it moves the cursor down and pushes the handle onto the redo cache. Redo
/// pops the cache and overwrites the stale slot in place. Only a commit
/// truncates the stale tail.
///
/// Every public operation validates `cursor <= entries.len()` up front and
/// fails with [`HistoryError::InvalidState`] instead of indexing out of
/// range.
#[derive(Debug, Clone)]
pub struct StrokeHistory {
    entries: Vec<StrokeId>,
    cursor: usize,
    redo_cache: Vec<StrokeId>,
    limit: usize,
}

impl Default for StrokeHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeHistory {
    /// Create an empty history bounded to [`MAX_HISTORY_SIZE`].
    pub fn new() -> Self {
        Self::with_limit(MAX_HISTORY_SIZE)
    }

    /// Create an empty history with a custom bound.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            redo_cache: Vec::new(),
            limit,
        }
    }

    /// Rebuild a history from persisted parts. The redo cache is transient
    /// and always starts empty.
    pub fn from_parts(entries: Vec<StrokeId>, cursor: usize) -> Result<Self, HistoryError> {
        if cursor > entries.len() {
            return Err(HistoryError::InvalidState {
                cursor,
                entries: entries.len(),
            });
        }
        Ok(Self {
            entries,
            cursor,
            redo_cache: Vec::new(),
            limit: MAX_HISTORY_SIZE,
        })
    }

    fn check(&self) -> Result<(), HistoryError> {
        if self.cursor > self.entries.len() {
            error!(
                "history cursor {} exceeds {} entries",
                self.cursor,
                self.entries.len()
            );
            return Err(HistoryError::InvalidState {
                cursor: self.cursor,
                entries: self.entries.len(),
            });
        }
        Ok(())
    }

    /// Record a finished stroke.
    ///
    /// Truncates the stale tail left by undos, appends the handle unless the
    /// bound is already reached (further commits are dropped, not evicted),
    /// and clears the redo cache unconditionally: new work invalidates redo
    /// even when the stroke itself was dropped.
    pub fn commit(&mut self, id: StrokeId) -> Result<CommitOutcome, HistoryError> {
        self.check()?;
        self.entries.truncate(self.cursor);
        self.redo_cache.clear();
        let outcome = if self.entries.len() >= self.limit {
            debug!("history at capacity ({}), dropping commit", self.limit);
            CommitOutcome::DroppedAtCapacity
        } else {
            self.entries.push(id);
            CommitOutcome::Committed
        };
        self.cursor = self.entries.len();
        Ok(outcome)
    }

    /// Step the cursor back one stroke.
    ///
    /// Returns the handle the caller should hide, or `None` when there is
    /// nothing to undo. The handle is pushed onto the redo cache (LIFO, so
    /// the most recently undone stroke is the first to redo).
    pub fn undo(&mut self) -> Result<Option<StrokeId>, HistoryError> {
        self.check()?;
        if self.cursor == 0 {
            debug!("undo with empty timeline, ignoring");
            return Ok(None);
        }
        self.cursor -= 1;
        let id = self.entries[self.cursor];
        self.redo_cache.push(id);
        Ok(Some(id))
    }

    /// Restore the most recently undone stroke.
    ///
    /// Returns the handle the caller should show, or `None` when the redo
    /// cache is empty. The handle reoccupies the stale slot at the cursor;
    /// that slot must still exist, since only a commit truncates it.
    pub fn redo(&mut self) -> Result<Option<StrokeId>, HistoryError> {
        self.check()?;
        match self.redo_cache.last().copied() {
            None => {
                debug!("redo with empty cache, ignoring");
                Ok(None)
            }
            Some(id) => {
                if self.cursor >= self.entries.len() {
                    error!(
                        "redo cache holds {} strokes but no stale slot remains",
                        self.redo_cache.len()
                    );
                    return Err(HistoryError::InvalidState {
                        cursor: self.cursor,
                        entries: self.entries.len(),
                    });
                }
                self.redo_cache.pop();
                self.entries[self.cursor] = id;
                self.cursor += 1;
                Ok(Some(id))
            }
        }
    }

    /// Discard everything.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.redo_cache.clear();
        self.cursor = 0;
    }

    /// Number of entries, stale tail included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_cache.is_empty()
    }

    /// Depth of the redo cache.
    pub fn redo_depth(&self) -> usize {
        self.redo_cache.len()
    }

    /// All entries in commit order, stale tail included.
    pub fn entries(&self) -> &[StrokeId] {
        &self.entries
    }
}
