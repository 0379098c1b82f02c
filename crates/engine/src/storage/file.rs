//! File-based storage backend.
//!
//! One file per key under a data directory, so the store survives restarts
//! and a customer can inspect their own data with a text editor. Keys are
//! mapped to filenames by hex-escaping every byte outside `[A-Za-z0-9.-]`
//! as `_xx`. The escape is injective, so distinct keys never share a file:
//! phone-scoped keys differing only in punctuation stay separate stores.

use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{StorageBackend, StorageError};

/// File-per-key storage implementation.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Creates a file backend rooted at `dir`, creating the directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| StorageError::Backend(format!("create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 8);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-') {
                name.push(char::from(byte));
            } else {
                // `_` only ever introduces an escape (a literal `_` is
                // escaped too), so the mapping is injective.
                let _ = write!(name, "_{byte:02x}");
            }
        }
        self.dir.join(format!("{name}.json"))
    }

    /// The data directory this backend writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StorageBackend for FileBackend {
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Backend(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let path = self.path_for(key);
        fs::write(&path, value)
            .map_err(|e| StorageError::Backend(format!("write {}: {e}", path.display())))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Backend(format!(
                "remove {}: {e}",
                path.display()
            ))),
        }
    }
}
