//! CLI command implementations.

use std::path::Path;
use std::sync::Arc;

use mearim_engine::storage::file::FileBackend;
use mearim_engine::{EngineConfig, OrderSession};

pub mod address;
pub mod catalog;
pub mod history;
pub mod order;
pub mod profile;

/// Opens an order session over the file store at `data_dir`, restoring
/// the saved customer profile if one exists.
pub fn open_session(data_dir: &Path) -> Result<OrderSession, Box<dyn std::error::Error>> {
    let config = EngineConfig::from_env()?;
    let backend = Arc::new(FileBackend::new(data_dir)?);
    Ok(OrderSession::new(backend, config)?)
}
