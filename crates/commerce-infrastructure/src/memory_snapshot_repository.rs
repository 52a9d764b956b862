//! In-memory SnapshotRepository implementation.

use std::sync::{Mutex, PoisonError};

use commerce_core::{PersistedSnapshot, Result, SnapshotRepository};

/// Holds the snapshot as a serialized JSON string, like a browser key/value store.
///
/// Useful when persistence is disabled and in tests that need to inspect or
/// corrupt the stored text.
#[derive(Debug, Default)]
pub struct InMemorySnapshotRepository {
    value: Mutex<Option<String>>,
}

impl InMemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `raw` as the stored text, whether or not it parses.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(raw.into())),
        }
    }

    /// The stored text, if any.
    pub fn raw(&self) -> Option<String> {
        let value = self.value.lock().unwrap_or_else(PoisonError::into_inner);
        value.clone()
    }

    pub fn clear(&self) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl SnapshotRepository for InMemorySnapshotRepository {
    fn load(&self) -> Result<Option<PersistedSnapshot>> {
        match self.raw() {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &PersistedSnapshot) -> Result<()> {
        let raw = serde_json::to_string(snapshot)?;
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw);
        Ok(())
    }
}
