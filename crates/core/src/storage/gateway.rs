use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::{KeyValueStore, StorageError};
use crate::metrics::STORAGE_ERRORS;

/// Prefix applied to every key written through the gateway.
pub const DEFAULT_STORAGE_PREFIX: &str = "mla_";

/// Encode a value as JSON text.
pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Decode JSON text produced by [`serialize`].
pub fn deserialize<T: DeserializeOwned>(raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Typed, prefixed access to a [`KeyValueStore`].
#[derive(Clone)]
pub struct StorageGateway {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl StorageGateway {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            prefix: DEFAULT_STORAGE_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Serialize `value` and store it under `key`.
    pub fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serialize(value)?;
        self.store
            .set_item(&self.full_key(key), &raw)
            .inspect_err(|e| Self::record_error("put", key, e))
    }

    /// Read and deserialize the value under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent or holds an empty string.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let raw = self
            .store
            .get_item(&self.full_key(key))
            .inspect_err(|e| Self::record_error("get", key, e))?;

        match raw {
            Some(raw) if !raw.is_empty() => deserialize(&raw).map(Some),
            _ => Ok(None),
        }
    }

    /// Remove any value under `key`.
    pub fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.store
            .remove_item(&self.full_key(key))
            .inspect_err(|e| Self::record_error("delete", key, e))
    }

    fn record_error(op: &str, key: &str, error: &StorageError) {
        STORAGE_ERRORS.with_label_values(&[op]).inc();
        warn!("Storage {} failed for key '{}': {}", op, key, error);
    }
}
