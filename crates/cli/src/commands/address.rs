//! Address book commands.
//!
//! All of these need an active profile; the book is scoped to its phone.

use mearim_core::AddressId;
use mearim_engine::addresses::AddressBook;
use mearim_engine::{EngineError, OrderSession};

fn book(session: &OrderSession) -> Result<&AddressBook, EngineError> {
    session.addresses().ok_or(EngineError::NoActiveCustomer)
}

/// List saved addresses.
pub fn list(session: &OrderSession) -> Result<(), EngineError> {
    let addresses = book(session)?.list()?;
    if addresses.is_empty() {
        tracing::info!("No saved addresses. Use `mearim address add`.");
        return Ok(());
    }
    for address in addresses {
        let marker = if address.is_default { " (padrão)" } else { "" };
        tracing::info!("{}  {}: {}{marker}", address.id, address.name, address.address);
    }
    Ok(())
}

/// Add an address. The first one becomes the default.
pub fn add(session: &OrderSession, name: &str, address: &str) -> Result<(), EngineError> {
    let added = book(session)?.add(name, address)?;
    tracing::info!("Added {} ({})", added.name, added.id);
    Ok(())
}

/// Edit an address's label and text.
pub fn edit(session: &OrderSession, id: &str, name: &str, address: &str) -> Result<(), EngineError> {
    let id = AddressId::new(id);
    if book(session)?.edit(&id, name, address)? {
        tracing::info!("Updated {id}");
    } else {
        tracing::warn!("No address with id {id}");
    }
    Ok(())
}

/// Remove an address. The last remaining address cannot be removed.
pub fn remove(session: &OrderSession, id: &str) -> Result<(), EngineError> {
    let id = AddressId::new(id);
    if book(session)?.remove(&id)? {
        tracing::info!("Removed {id}");
    } else {
        tracing::warn!("Cannot remove {id}: unknown id or last remaining address");
    }
    Ok(())
}

/// Make an address the default.
pub fn set_default(session: &OrderSession, id: &str) -> Result<(), EngineError> {
    let id = AddressId::new(id);
    if book(session)?.set_default(&id)? {
        tracing::info!("{id} is now the default address");
    } else {
        tracing::warn!("No address with id {id}");
    }
    Ok(())
}
