//! Infrastructure for the commerce store: durable snapshot storage,
//! platform paths and TOML configuration.

pub mod config;
pub mod json_snapshot_repository;
pub mod memory_snapshot_repository;
pub mod paths;
pub mod storage;

pub use crate::config::{
    CommerceConfig, ConfigService, HydrationConfig, LoggingConfig, StorageConfig,
};
pub use crate::json_snapshot_repository::{DEFAULT_STORAGE_KEY, JsonSnapshotRepository};
pub use crate::memory_snapshot_repository::InMemorySnapshotRepository;
pub use crate::paths::CommercePaths;
