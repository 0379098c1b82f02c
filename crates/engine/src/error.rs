//! Aggregate error type for the engine.

use mearim_core::ProductId;
use thiserror::Error;

use crate::addresses::AddressError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::profile::ProfileError;
use crate::storage::StorageError;

/// Any error an [`crate::OrderSession`] operation can produce.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The operation needs an identified customer and none is active.
    #[error("No customer profile is active")]
    NoActiveCustomer,

    /// A staged product id is missing from the catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),
}
