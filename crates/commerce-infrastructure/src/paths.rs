//! Unified path management for commerce configuration and state files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/nextgen-commerce/      # Config directory
//! └── config.toml                  # Application configuration
//!
//! ~/.local/share/nextgen-commerce/ # Data directory
//! └── state/                       # One JSON file per storage key
//!     └── nextgen-commerce-state.json
//! ```

use std::path::PathBuf;

use commerce_core::{CommerceError, Result};

const APP_DIR: &str = "nextgen-commerce";

/// Resolves platform paths, optionally rooted at a base directory.
#[derive(Debug, Clone, Default)]
pub struct CommercePaths {
    base: Option<PathBuf>,
}

impl CommercePaths {
    /// Creates a resolver. With `Some(base)`, config and data both live under
    /// `base` instead of the platform directories (used by tests).
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    /// Returns the configuration directory (e.g. `~/.config/nextgen-commerce/`).
    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| CommerceError::config("Cannot find config directory")),
        }
    }

    /// Returns the data directory (e.g. `~/.local/share/nextgen-commerce/`).
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| CommerceError::config("Cannot find data directory")),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Directory holding the key/value state files.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("state"))
    }
}
