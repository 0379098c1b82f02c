//! Order history and recurring-order suggestion commands.

use chrono::Utc;
use mearim_engine::{EngineError, OrderSession};

/// List past orders, most recent first.
pub fn list(session: &OrderSession) -> Result<(), EngineError> {
    let orders = session.history()?;
    if orders.is_empty() {
        tracing::info!("No past orders");
        return Ok(());
    }
    for order in orders {
        tracing::info!(
            "{}  {}  {} - {} item(s), {} / {}",
            order.id,
            order.date.format("%d/%m/%Y %H:%M"),
            order.total,
            order.items.len(),
            order.payment_method.label(),
            order.delivery_type.label()
        );
        for item in &order.items {
            tracing::info!("    {} {} {}", item.quantity, item.name, item.brand);
        }
    }
    Ok(())
}

/// Show the recurring-order suggestion, if the last order qualifies.
pub fn suggest(session: &OrderSession) -> Result<(), EngineError> {
    match session.suggestion(Utc::now())? {
        Some(order) => {
            tracing::info!(
                "Your last order ({}) can be repeated:",
                order.date.format("%d/%m/%Y %H:%M")
            );
            for item in &order.items {
                tracing::info!("  {} {} {}", item.quantity, item.name, item.brand);
            }
            tracing::info!("Repeat it with: mearim order reorder {}", order.id);
        }
        None => tracing::info!("No suggestion right now"),
    }
    Ok(())
}
