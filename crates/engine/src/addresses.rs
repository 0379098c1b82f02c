//! Named delivery addresses, scoped to one customer phone.
//!
//! Invariants enforced here, not by callers:
//! - a non-empty book has exactly one default address;
//! - once any address exists, the last one can never be removed;
//! - removing the default promotes the first remaining address.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use mearim_core::{AddressId, Phone};

use crate::profile::CustomerProfile;
use crate::storage::{Storage, StorageError};

/// Errors from address-book operations.
#[derive(Debug, Error)]
pub enum AddressError {
    /// The address label is empty.
    #[error("address name cannot be empty")]
    MissingName,

    /// The address text is empty.
    #[error("address text cannot be empty")]
    MissingAddress,

    /// The persistent layer failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A named delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub name: String,
    pub address: String,
    pub is_default: bool,
}

/// One customer's address book.
///
/// Order is insertion order; `list` never reorders.
pub struct AddressBook {
    storage: Storage,
    phone: Phone,
}

impl AddressBook {
    /// Creates the address book scoped to `phone`.
    #[must_use]
    pub const fn new(storage: Storage, phone: Phone) -> Self {
        Self { storage, phone }
    }

    /// The phone this book is scoped to.
    #[must_use]
    pub const fn phone(&self) -> &Phone {
        &self.phone
    }

    fn key(&self) -> String {
        self.storage.addresses_key(&self.phone)
    }

    fn persist(&self, addresses: &[Address]) -> Result<(), StorageError> {
        self.storage.set(&self.key(), &addresses)
    }

    /// All addresses in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] only for backend failures.
    pub fn list(&self) -> Result<Vec<Address>, StorageError> {
        Ok(self.storage.get(&self.key())?.unwrap_or_default())
    }

    /// The current default address, if any address exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] only for backend failures.
    pub fn default_address(&self) -> Result<Option<Address>, StorageError> {
        Ok(self.list()?.into_iter().find(|a| a.is_default))
    }

    /// Look up one address by id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] only for backend failures.
    pub fn get(&self, id: &AddressId) -> Result<Option<Address>, StorageError> {
        Ok(self.list()?.into_iter().find(|a| &a.id == id))
    }

    /// Adds a new address with a fresh unique id.
    ///
    /// The first address added to an empty book becomes the default.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingName`] / [`AddressError::MissingAddress`]
    /// when a field is empty; nothing is written in that case.
    pub fn add(&self, name: &str, address: &str) -> Result<Address, AddressError> {
        let name = name.trim();
        let address = address.trim();
        if name.is_empty() {
            return Err(AddressError::MissingName);
        }
        if address.is_empty() {
            return Err(AddressError::MissingAddress);
        }

        let mut addresses = self.list()?;
        let entry = Address {
            id: AddressId::generate(),
            name: name.to_owned(),
            address: address.to_owned(),
            is_default: addresses.is_empty(),
        };
        addresses.push(entry.clone());
        self.persist(&addresses)?;
        Ok(entry)
    }

    /// Updates the name and text of an existing address.
    ///
    /// Never touches the default flag. Returns `false` (without writing) when
    /// the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingName`] / [`AddressError::MissingAddress`]
    /// when a field is empty.
    pub fn edit(&self, id: &AddressId, name: &str, address: &str) -> Result<bool, AddressError> {
        let name = name.trim();
        let address = address.trim();
        if name.is_empty() {
            return Err(AddressError::MissingName);
        }
        if address.is_empty() {
            return Err(AddressError::MissingAddress);
        }

        let mut addresses = self.list()?;
        let Some(entry) = addresses.iter_mut().find(|a| &a.id == id) else {
            return Ok(false);
        };
        entry.name = name.to_owned();
        entry.address = address.to_owned();
        self.persist(&addresses)?;
        Ok(true)
    }

    /// Removes an address.
    ///
    /// Removal is only permitted while at least two addresses exist: the last
    /// address is never removed (refused as a `false` no-op). If the removed
    /// address was the default, the first remaining address becomes default.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] only for backend failures.
    pub fn remove(&self, id: &AddressId) -> Result<bool, StorageError> {
        let mut addresses = self.list()?;
        if addresses.len() < 2 {
            return Ok(false);
        }

        let Some(pos) = addresses.iter().position(|a| &a.id == id) else {
            return Ok(false);
        };
        let removed = addresses.remove(pos);

        if removed.is_default {
            if let Some(first) = addresses.first_mut() {
                first.is_default = true;
            }
        }

        self.persist(&addresses)?;
        Ok(true)
    }

    /// Makes `id` the default address and clears the flag on all others.
    ///
    /// Returns `false` (without writing) when the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] only for backend failures.
    pub fn set_default(&self, id: &AddressId) -> Result<bool, StorageError> {
        let mut addresses = self.list()?;
        if !addresses.iter().any(|a| &a.id == id) {
            return Ok(false);
        }

        for entry in &mut addresses {
            entry.is_default = &entry.id == id;
        }
        self.persist(&addresses)?;
        Ok(true)
    }

    /// One-time migration of the legacy single `address` field on the profile.
    ///
    /// The first time a profile carrying a non-empty legacy address is
    /// observed while no address-book data exists yet for the phone, a single
    /// default address with the stable id `default` is synthesized and
    /// persisted. Returns whether a migration happened.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] only for backend failures.
    pub fn migrate_legacy(&self, profile: &CustomerProfile) -> Result<bool, StorageError> {
        let legacy = profile.address.trim();
        if legacy.is_empty() {
            return Ok(false);
        }

        let existing: Option<Vec<Address>> = self.storage.get(&self.key())?;
        if existing.is_some() {
            return Ok(false);
        }

        let migrated = Address {
            id: AddressId::legacy(),
            name: "Principal".to_owned(),
            address: legacy.to_owned(),
            is_default: true,
        };
        self.persist(std::slice::from_ref(&migrated))?;
        info!(phone = %self.phone, "migrated legacy profile address into address book");
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryBackend;

    fn book() -> AddressBook {
        AddressBook::new(
            Storage::new(Arc::new(MemoryBackend::new()), "test"),
            Phone::parse("(99) 98888-7777").unwrap(),
        )
    }

    fn default_count(book: &AddressBook) -> usize {
        book.list()
            .unwrap()
            .iter()
            .filter(|a| a.is_default)
            .count()
    }

    #[test]
    fn test_first_added_address_becomes_default() {
        let book = book();
        let casa = book.add("Casa", "Rua A, 10").unwrap();
        assert!(casa.is_default);

        let trabalho = book.add("Trabalho", "Av. B, 20").unwrap();
        assert!(!trabalho.is_default);
        assert_eq!(default_count(&book), 1);
    }

    #[test]
    fn test_add_validates_fields() {
        let book = book();
        assert!(matches!(
            book.add("", "Rua A, 10"),
            Err(AddressError::MissingName)
        ));
        assert!(matches!(
            book.add("Casa", "  "),
            Err(AddressError::MissingAddress)
        ));
        assert!(book.list().unwrap().is_empty());
    }

    #[test]
    fn test_edit_never_touches_default_flag() {
        let book = book();
        let casa = book.add("Casa", "Rua A, 10").unwrap();
        book.add("Trabalho", "Av. B, 20").unwrap();

        assert!(book.edit(&casa.id, "Casa Nova", "Rua A, 11").unwrap());

        let edited = book.get(&casa.id).unwrap().unwrap();
        assert_eq!(edited.name, "Casa Nova");
        assert_eq!(edited.address, "Rua A, 11");
        assert!(edited.is_default);
        assert_eq!(default_count(&book), 1);
    }

    #[test]
    fn test_edit_unknown_id_is_a_noop() {
        let book = book();
        book.add("Casa", "Rua A, 10").unwrap();
        assert!(!book.edit(&AddressId::new("nope"), "X", "Y").unwrap());
    }

    #[test]
    fn test_remove_last_address_is_refused() {
        let book = book();
        let casa = book.add("Casa", "Rua A, 10").unwrap();

        assert!(!book.remove(&casa.id).unwrap());
        assert_eq!(book.list().unwrap().len(), 1);
    }

    #[test]
    fn test_removing_default_promotes_first_remaining() {
        let book = book();
        let casa = book.add("Casa", "Rua A, 10").unwrap();
        let trabalho = book.add("Trabalho", "Av. B, 20").unwrap();
        book.add("Sítio", "Estrada C, km 3").unwrap();

        assert!(book.remove(&casa.id).unwrap());

        let remaining = book.list().unwrap();
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining.first().unwrap().id, trabalho.id);
        assert!(remaining.first().unwrap().is_default);
        assert_eq!(default_count(&book), 1);
    }

    #[test]
    fn test_set_default_is_exclusive() {
        let book = book();
        book.add("Casa", "Rua A, 10").unwrap();
        let trabalho = book.add("Trabalho", "Av. B, 20").unwrap();

        assert!(book.set_default(&trabalho.id).unwrap());
        assert!(book.get(&trabalho.id).unwrap().unwrap().is_default);
        assert_eq!(default_count(&book), 1);

        assert!(!book.set_default(&AddressId::new("nope")).unwrap());
    }

    #[test]
    fn test_exactly_one_default_after_mixed_operations() {
        let book = book();
        let a = book.add("A", "Rua A").unwrap();
        let b = book.add("B", "Rua B").unwrap();
        let c = book.add("C", "Rua C").unwrap();

        book.set_default(&b.id).unwrap();
        book.remove(&b.id).unwrap();
        book.edit(&c.id, "C2", "Rua C, 2").unwrap();
        book.set_default(&c.id).unwrap();
        book.remove(&a.id).unwrap();

        assert_eq!(book.list().unwrap().len(), 1);
        assert_eq!(default_count(&book), 1);
    }

    #[test]
    fn test_legacy_migration_runs_once() {
        let book = book();
        let profile = CustomerProfile {
            name: "Maria".to_owned(),
            phone: book.phone().clone(),
            address: "Rua Velha, 1".to_owned(),
        };

        assert!(book.migrate_legacy(&profile).unwrap());
        let migrated = book.list().unwrap();
        assert_eq!(migrated.len(), 1);
        let entry = migrated.first().unwrap();
        assert_eq!(entry.id, AddressId::legacy());
        assert_eq!(entry.name, "Principal");
        assert_eq!(entry.address, "Rua Velha, 1");
        assert!(entry.is_default);

        // Second observation of the same profile does not re-migrate.
        assert!(!book.migrate_legacy(&profile).unwrap());

        // Nor does it clobber a book the customer has since grown.
        book.add("Trabalho", "Av. B, 20").unwrap();
        assert!(!book.migrate_legacy(&profile).unwrap());
        assert_eq!(book.list().unwrap().len(), 2);
    }

    #[test]
    fn test_migration_skipped_without_legacy_address() {
        let book = book();
        let profile = CustomerProfile {
            name: "Maria".to_owned(),
            phone: book.phone().clone(),
            address: String::new(),
        };
        assert!(!book.migrate_legacy(&profile).unwrap());
        assert!(book.list().unwrap().is_empty());
    }

    #[test]
    fn test_persisted_shape_uses_camel_case() {
        let book = book();
        book.add("Casa", "Rua A, 10").unwrap();

        let raw: serde_json::Value = book
            .storage
            .get(&book.key())
            .unwrap()
            .expect("book persisted");
        let first = raw.get(0).unwrap();
        assert!(first.get("isDefault").is_some());
    }
}
