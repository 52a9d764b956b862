//! Process startup: logging, configuration and the store.

use std::sync::Arc;

use anyhow::{Context, Result};
use commerce_core::{SnapshotRepository, Store};
use commerce_infrastructure::{
    CommerceConfig, CommercePaths, ConfigService, JsonSnapshotRepository, LoggingConfig,
};
use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `config.filter`; an unparsable filter
/// falls back to `info`. Does nothing if a subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("[Bootstrap] Tracing initialized ({})", config.filter);
    }
}

/// Builds the repository selected by `config`, or `None` when storage is disabled.
pub fn build_repository(
    config: &CommerceConfig,
    paths: &CommercePaths,
) -> Result<Option<Arc<dyn SnapshotRepository>>> {
    if !config.storage.enabled {
        return Ok(None);
    }

    let dir = config
        .storage
        .resolve_dir(paths)
        .context("Failed to resolve storage directory")?;
    let key = &config.storage.key;
    let repository = JsonSnapshotRepository::in_dir(&dir, key)
        .with_context(|| format!("Failed to open storage key '{}'", key))?;

    tracing::info!("[Bootstrap] Snapshot file: {}", repository.path().display());
    Ok(Some(Arc::new(repository)))
}

/// Creates the process-wide store, hydrated from storage when enabled.
pub fn bootstrap(config: &CommerceConfig, paths: &CommercePaths) -> Result<Arc<Store>> {
    let store = match build_repository(config, paths)? {
        Some(repository) => Store::open(repository, config.hydration.mode),
        None => {
            tracing::info!("[Bootstrap] Storage disabled, running in memory");
            Store::new()
        }
    };

    Ok(Arc::new(store))
}

/// Loads `config.toml` from `paths`, initializes tracing and opens the store.
pub fn bootstrap_from_paths(paths: &CommercePaths) -> Result<(CommerceConfig, Arc<Store>)> {
    let config = ConfigService::new(paths)
        .and_then(|service| service.load())
        .context("Failed to load configuration")?;

    init_tracing(&config.logging);
    let store = bootstrap(&config, paths)?;

    Ok((config, store))
}
