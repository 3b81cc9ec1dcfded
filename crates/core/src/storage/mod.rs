//! Key/value persistence.
//!
//! [`KeyValueStore`] is the raw string capability (get/set/remove), the
//! [`StorageGateway`] layers JSON encoding and a key prefix on top of it.

mod gateway;
mod memory;
mod sqlite;

pub use gateway::{deserialize, serialize, StorageGateway, DEFAULT_STORAGE_PREFIX};
pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};

#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store rejected the operation (disabled, full, locked).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Synchronous string key/value store.
pub trait KeyValueStore: Send + Sync {
    /// Raw value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Open the store selected by `config`.
pub fn create_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage, watch list will not survive restarts");
            Ok(Arc::new(MemoryKeyValueStore::new()))
        }
        StorageBackend::Sqlite => {
            info!("Using SQLite storage at {}", config.path.display());
            Ok(Arc::new(SqliteKeyValueStore::new(&config.path)?))
        }
    }
}
