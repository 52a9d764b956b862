//! TOML configuration for the store process.
//!
//! ```toml
//! [storage]
//! enabled = true
//! key = "nextgen-commerce-state"
//! # directory = "/custom/state/dir"
//!
//! [hydration]
//! mode = "cart_and_wishlist"   # or "full"
//!
//! [logging]
//! filter = "info"
//! ```

use std::path::{Path, PathBuf};

use commerce_core::{HydrationMode, Result};
use serde::{Deserialize, Serialize};

use crate::json_snapshot_repository::DEFAULT_STORAGE_KEY;
use crate::paths::CommercePaths;
use crate::storage::AtomicFile;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommerceConfig {
    pub storage: StorageConfig,
    pub hydration: HydrationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// When false the store runs purely in memory.
    pub enabled: bool,
    /// Storage key; becomes the file name of the snapshot.
    pub key: String,
    /// Overrides the platform storage directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key: DEFAULT_STORAGE_KEY.to_string(),
            directory: None,
        }
    }
}

impl StorageConfig {
    /// The configured directory, or the platform storage directory.
    pub fn resolve_dir(&self, paths: &CommercePaths) -> Result<PathBuf> {
        match &self.directory {
            Some(dir) => Ok(dir.clone()),
            None => paths.storage_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrationConfig {
    pub mode: HydrationMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Loads and saves [`CommerceConfig`] from a TOML file.
#[derive(Debug)]
pub struct ConfigService {
    file: AtomicFile<CommerceConfig>,
}

impl ConfigService {
    /// Uses the platform config file (`~/.config/nextgen-commerce/config.toml`).
    pub fn new(paths: &CommercePaths) -> Result<Self> {
        Ok(Self::with_path(paths.config_file()?))
    }

    /// Creates a service with a custom config path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::toml(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Loads the config; a missing or empty file yields the defaults.
    pub fn load(&self) -> Result<CommerceConfig> {
        match self.file.load()? {
            Some(config) => Ok(config),
            None => {
                tracing::debug!(
                    "[ConfigService] No config at {}, using defaults",
                    self.path().display()
                );
                Ok(CommerceConfig::default())
            }
        }
    }

    pub fn save(&self, config: &CommerceConfig) -> Result<()> {
        Ok(self.file.save(config)?)
    }

    /// Edits the config file under an exclusive lock and returns the result.
    ///
    /// A missing file starts from the defaults.
    pub fn update<F>(&self, edit: F) -> Result<CommerceConfig>
    where
        F: FnOnce(&mut CommerceConfig),
    {
        let mut updated = CommerceConfig::default();
        self.file.update(CommerceConfig::default(), |config| {
            edit(config);
            updated = config.clone();
            Ok(())
        })?;
        Ok(updated)
    }
}
