//! JSON file-backed SnapshotRepository implementation.

use std::path::{Path, PathBuf};

use commerce_core::{CommerceError, PersistedSnapshot, Result, SnapshotRepository};

use crate::paths::CommercePaths;
use crate::storage::AtomicFile;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "nextgen-commerce-state";

/// Keeps the persisted snapshot in `<storage dir>/<key>.json`.
///
/// One file per key mirrors a browser's single-key local storage entry.
///
/// Responsibilities:
/// - Map a storage key to a file path
/// - Convert between the snapshot and its JSON file
///
/// Does NOT:
/// - Decide what to do with unreadable content (the store starts empty)
/// - Handle atomic writes (delegated to AtomicFile)
#[derive(Debug)]
pub struct JsonSnapshotRepository {
    file: AtomicFile<PersistedSnapshot>,
}

impl JsonSnapshotRepository {
    /// Creates a repository for `key` inside the platform storage directory.
    pub fn new(paths: &CommercePaths, key: &str) -> Result<Self> {
        Self::in_dir(&paths.storage_dir()?, key)
    }

    /// Creates a repository for `key` inside `dir`.
    pub fn in_dir(dir: &Path, key: &str) -> Result<Self> {
        validate_key(key)?;
        Ok(Self::with_path(dir.join(format!("{}.json", key))))
    }

    /// Creates a repository with an explicit file path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::json(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

fn validate_key(key: &str) -> Result<()> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
    let valid = !key.is_empty() && !key.starts_with('.') && key.chars().all(allowed);
    if valid {
        Ok(())
    } else {
        let message = format!("Invalid storage key '{}'", key);
        Err(CommerceError::config(message))
    }
}

impl SnapshotRepository for JsonSnapshotRepository {
    fn load(&self) -> Result<Option<PersistedSnapshot>> {
        Ok(self.file.load()?)
    }

    fn save(&self, snapshot: &PersistedSnapshot) -> Result<()> {
        self.file.save(snapshot)?;
        tracing::trace!("[JsonSnapshotRepository] Saved {}", self.path().display());
        Ok(())
    }
}
