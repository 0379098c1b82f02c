//! In-memory storage backend.
//!
//! Stores values in a `HashMap` behind a mutex. No persistence across
//! restarts; primarily for tests and for running the engine without a data
//! directory.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{StorageBackend, StorageError};

/// In-memory storage implementation.
#[derive(Default)]
pub struct MemoryBackend {
    store: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(store.get(key).cloned())
    }

    fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        store.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        store.remove(key);
        Ok(())
    }
}
