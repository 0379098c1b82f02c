//! Capped, most-recent-first order log, scoped to one customer phone.
//!
//! Append-only from the caller's perspective: new records are prepended and
//! the log is truncated to [`HISTORY_CAP`] on write. Records are never
//! updated or individually deleted; the whole log is erased only by the
//! profile-clear cascade.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use mearim_core::{DeliveryType, OrderId, OrderStatus, PaymentMethod, Phone, Price, ProductId};

use crate::storage::{Storage, StorageError};

/// Maximum number of records kept per customer.
pub const HISTORY_CAP: usize = 20;

/// One line of a completed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub price: Price,
    pub quantity: u32,
}

impl OrderItem {
    /// Line total: unit price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A completed order as persisted in the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: OrderId,
    pub date: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    pub total: Price,
    pub payment_method: PaymentMethod,
    pub delivery_type: DeliveryType,
    /// Present iff `delivery_type` is delivery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub status: OrderStatus,
}

/// One customer's order history.
pub struct OrderHistoryStore {
    storage: Storage,
    phone: Phone,
}

impl OrderHistoryStore {
    /// Creates the history store scoped to `phone`.
    #[must_use]
    pub const fn new(storage: Storage, phone: Phone) -> Self {
        Self { storage, phone }
    }

    fn key(&self) -> String {
        self.storage.orders_key(&self.phone)
    }

    /// All records, most-recent-first.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] only for backend failures.
    pub fn list(&self) -> Result<Vec<OrderRecord>, StorageError> {
        Ok(self.storage.get(&self.key())?.unwrap_or_default())
    }

    /// Prepends `record` and truncates the log to [`HISTORY_CAP`] entries.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] only for backend failures.
    pub fn append(&self, record: OrderRecord) -> Result<(), StorageError> {
        let mut records = self.list()?;
        records.insert(0, record);
        records.truncate(HISTORY_CAP);
        debug!(phone = %self.phone, len = records.len(), "order history updated");
        self.storage.set(&self.key(), &records)
    }
}
