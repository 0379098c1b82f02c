//! The single active customer record for this device.
//!
//! There is no authentication: identity is self-declared and keyed by the
//! phone string the customer types in. Exactly one profile is active at a
//! time; saving replaces it, and clearing it cascades deletion of every
//! sub-store keyed by that phone (address book, order history).

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use mearim_core::{Phone, PhoneError};

use crate::storage::{Storage, StorageError};

/// Errors from profile operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile name is empty.
    #[error("customer name cannot be empty")]
    MissingName,

    /// The profile phone is invalid.
    #[error(transparent)]
    Phone(#[from] PhoneError),

    /// The persistent layer failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The self-declared customer identity.
///
/// `address` is the legacy single-address field kept for migration into the
/// address book; new profiles may leave it empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub name: String,
    pub phone: Phone,
    #[serde(default)]
    pub address: String,
}

type ProfileSubscriber = Box<dyn Fn(Option<&CustomerProfile>) + Send + Sync>;

/// Store for the device-wide active customer profile.
///
/// Every successful [`save`](Self::save) or [`clear`](Self::clear) notifies
/// subscribers with the new profile (or `None`). That notification is the
/// signal the rest of the engine uses to activate or deactivate the
/// per-customer stores.
pub struct CustomerProfileStore {
    storage: Storage,
    subscribers: Mutex<Vec<ProfileSubscriber>>,
}

impl CustomerProfileStore {
    /// Creates a profile store over the given storage.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Registers a profile-changed subscriber.
    pub fn subscribe(&self, subscriber: impl Fn(Option<&CustomerProfile>) + Send + Sync + 'static) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(Box::new(subscriber));
        }
    }

    fn notify(&self, profile: Option<&CustomerProfile>) {
        if let Ok(subs) = self.subscribers.lock() {
            for sub in subs.iter() {
                sub(profile);
            }
        }
    }

    /// Loads the active profile, or `None` when no customer is registered.
    ///
    /// Malformed persisted data is treated as absent (and discarded), never
    /// surfaced as an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] only for backend failures.
    pub fn load(&self) -> Result<Option<CustomerProfile>, StorageError> {
        self.storage.get(&self.storage.customer_key())
    }

    /// Saves `profile` as the active customer and notifies subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::MissingName`] if the name is empty; nothing is
    /// written in that case.
    pub fn save(&self, profile: &CustomerProfile) -> Result<(), ProfileError> {
        if profile.name.trim().is_empty() {
            return Err(ProfileError::MissingName);
        }

        self.storage.set(&self.storage.customer_key(), profile)?;
        info!(phone = %profile.phone, "customer profile saved");
        self.notify(Some(profile));
        Ok(())
    }

    /// Clears the active profile, erases that phone's address book and order
    /// history, and notifies subscribers with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] only for backend failures.
    pub fn clear(&self) -> Result<(), StorageError> {
        if let Some(profile) = self.load()? {
            self.storage.remove(&self.storage.orders_key(&profile.phone))?;
            self.storage
                .remove(&self.storage.addresses_key(&profile.phone))?;
            info!(phone = %profile.phone, "customer profile cleared");
        }
        self.storage.remove(&self.storage.customer_key())?;
        self.notify(None);
        Ok(())
    }
}
