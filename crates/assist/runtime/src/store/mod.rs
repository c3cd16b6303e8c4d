//! Persistence of per-item targeting configs.
//!
//! One [`TargetingConfig`] per item id, last write wins. The file store keeps
//! the host's historical JSON record shape.
mod file;
mod memory;

pub use file::FileConfigStore;
pub use memory::InMemoryConfigStore;

use thiserror::Error;

use assist_core::TargetingConfig;

use crate::records::ItemId;

/// Errors surfaced by config store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("config store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("item id {0:?} cannot be used as a storage key")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

pub trait ConfigStore: Send + Sync {
    fn save(&self, item: &ItemId, config: &TargetingConfig) -> Result<()>;

    fn load(&self, item: &ItemId) -> Result<Option<TargetingConfig>>;

    fn delete(&self, item: &ItemId) -> Result<()>;

    /// Ids of every item with a stored config, sorted.
    fn list(&self) -> Result<Vec<ItemId>>;
}
