//! Persistent key-value layer for the order-session engine.
//!
//! All customer state lives here: string keys mapped to JSON documents,
//! scoped under an application namespace prefix. The layout is:
//!
//! - `<ns>-customer` - the active [`crate::profile::CustomerProfile`]
//! - `<ns>-orders-<phone>` - that customer's order history (≤ 20 records)
//! - `<ns>-addresses-<phone>` - that customer's address book
//!
//! Operations are synchronous read/modify/write: nothing here blocks on
//! network I/O, and there is a single logical thread of control per device.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use mearim_core::Phone;

pub mod file;
pub mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Error that occurs during serialization.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Error that occurs in the storage backend.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Trait defining the low-level interface for storage backends.
///
/// Backends store raw bytes; typed access and the application key layout
/// live in [`Storage`]. Absence of a key is not an error.
pub trait StorageBackend: Send + Sync {
    /// Retrieves the raw bytes for the given key, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the backend fails.
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Stores raw bytes under the given key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the backend fails.
    fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Deletes the value associated with the given key (no-op if absent).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the backend fails.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed storage service over a raw backend.
///
/// Owns the application namespace prefix and implements the malformed-state
/// rule: a value that fails to deserialize is treated as absent, logged, and
/// discarded so the next read starts clean. Callers never see a parse error.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn StorageBackend>,
    namespace: String,
}

impl Storage {
    /// Creates a new storage service with the given backend and namespace.
    pub fn new(backend: Arc<dyn StorageBackend>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    fn key(&self, suffix: &str) -> String {
        format!("{}-{suffix}", self.namespace)
    }

    /// Key of the active customer profile.
    #[must_use]
    pub fn customer_key(&self) -> String {
        self.key("customer")
    }

    /// Key of the given customer's order history.
    #[must_use]
    pub fn orders_key(&self, phone: &Phone) -> String {
        self.key(&format!("orders-{phone}"))
    }

    /// Key of the given customer's address book.
    #[must_use]
    pub fn addresses_key(&self, phone: &Phone) -> String {
        self.key(&format!("addresses-{phone}"))
    }

    /// Loads and deserializes the value under `key`.
    ///
    /// Malformed persisted data is self-healed: the bad value is removed and
    /// `None` is returned, never a parse error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] only for backend failures.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(bytes) = self.backend.get_bytes(key)? else {
            return Ok(None);
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(key, %err, "discarding malformed persisted value");
                self.backend.remove(key)?;
                Ok(None)
            }
        }
    }

    /// Serializes and stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if the value cannot be
    /// serialized, or [`StorageError::Backend`] if the backend fails.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let bytes =
            serde_json::to_vec(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        debug!(key, len = bytes.len(), "storage write");
        self.backend.set_bytes(key, bytes)
    }

    /// Deletes the value under `key` (no-op if absent).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the backend fails.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        debug!(key, "storage remove");
        self.backend.remove(key)
    }
}
