//! Snapshot repository trait.

use crate::error::Result;
use crate::snapshot::PersistedSnapshot;

/// Durable storage for the persisted snapshot.
///
/// Implementations live in the infrastructure layer (JSON file, in-memory).
pub trait SnapshotRepository: Send + Sync {
    /// Loads the last saved snapshot. `Ok(None)` means nothing was saved yet.
    fn load(&self) -> Result<Option<PersistedSnapshot>>;

    /// Replaces the stored snapshot.
    fn save(&self, snapshot: &PersistedSnapshot) -> Result<()>;
}
