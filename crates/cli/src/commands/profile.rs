//! Customer profile commands.
//!
//! The saved phone scopes the address book and the order history: setting
//! a profile with a new phone switches to that customer's data, and
//! clearing the profile deletes the scoped data with it.

use mearim_engine::{EngineError, OrderSession};

/// Show the active profile.
pub fn show(session: &OrderSession) {
    match session.profile() {
        Some(profile) => {
            tracing::info!("Name:  {}", profile.name);
            tracing::info!("Phone: {}", profile.phone);
        }
        None => tracing::info!("No profile saved. Use `mearim profile set`."),
    }
}

/// Save the profile and rescope to its phone.
pub fn set(
    session: &mut OrderSession,
    name: &str,
    phone: &str,
    address: &str,
) -> Result<(), EngineError> {
    session.save_profile(name, phone, address)?;
    tracing::info!("Profile saved for {name} ({phone})");
    Ok(())
}

/// Clear the profile along with its addresses and order history.
pub fn clear(session: &mut OrderSession) -> Result<(), EngineError> {
    if session.profile().is_none() {
        tracing::info!("No profile to clear");
        return Ok(());
    }
    session.clear_profile()?;
    tracing::info!("Profile, addresses and order history cleared");
    Ok(())
}
