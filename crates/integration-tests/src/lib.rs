//! Integration tests for the Mearim delivery engine.
//!
//! The engine is fully embeddable, so these tests drive real
//! [`OrderSession`]s over file-backed stores in temporary directories.
//! No external services are involved; the WhatsApp handoff is asserted
//! on the produced `wa.me` URI, never sent.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mearim-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `order_flow` - Checkout, handoff, history and reorder
//! - `profile_cascade` - Profile scoping, persistence and cascade deletes

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use mearim_engine::storage::FileBackend;
use mearim_engine::{EngineConfig, OrderSession};
use tempfile::TempDir;

/// A temporary on-disk store plus the configuration to open sessions
/// over it. Dropping the context deletes the store.
pub struct TestContext {
    dir: TempDir,
    config: EngineConfig,
}

impl TestContext {
    /// Creates a fresh store with a zero handoff delay so tests run at
    /// full speed.
    ///
    /// # Panics
    ///
    /// Panics when the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let config = EngineConfig {
            handoff_delay: Duration::ZERO,
            ..EngineConfig::default()
        };
        Self { dir, config }
    }

    /// Opens a session over the store, as a fresh process would.
    ///
    /// # Panics
    ///
    /// Panics when the store cannot be opened.
    #[must_use]
    pub fn open(&self) -> OrderSession {
        let backend =
            Arc::new(FileBackend::new(self.dir.path()).expect("open file backend"));
        OrderSession::new(backend, self.config.clone()).expect("open session")
    }

    /// The directory holding the store's JSON files.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
