//! Order placement and reorder commands.
//!
//! `place` drives a full checkout in one invocation: stage the items,
//! apply the payment and delivery choices, submit, and confirm. The
//! resulting `wa.me` link is logged for the customer to open; the order
//! lands in history when a profile is active.

use chrono::Utc;
use mearim_core::{DeliveryType, OrderId, PaymentMethod, ProductId};
use mearim_engine::{DeliveryLocation, EngineError, OrderSession};
use thiserror::Error;

/// Errors from argument parsing, on top of the engine's own.
#[derive(Debug, Error)]
pub enum OrderCommandError {
    #[error("Invalid payment method: {0}. Valid: pix, dinheiro, cartao")]
    InvalidPayment(String),

    #[error("Invalid delivery type: {0}. Valid: entrega, retirada")]
    InvalidDelivery(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

fn parse_payment(s: &str) -> Result<PaymentMethod, OrderCommandError> {
    match s.to_ascii_lowercase().as_str() {
        "pix" => Ok(PaymentMethod::Pix),
        "dinheiro" => Ok(PaymentMethod::Dinheiro),
        "cartao" | "cartão" => Ok(PaymentMethod::Cartao),
        _ => Err(OrderCommandError::InvalidPayment(s.to_owned())),
    }
}

fn parse_delivery(s: &str) -> Result<DeliveryType, OrderCommandError> {
    match s.to_ascii_lowercase().as_str() {
        "entrega" => Ok(DeliveryType::Entrega),
        "retirada" => Ok(DeliveryType::Retirada),
        _ => Err(OrderCommandError::InvalidDelivery(s.to_owned())),
    }
}

/// Place an order and log the `wa.me` link.
pub async fn place(
    session: &mut OrderSession,
    items: &[String],
    payment: &str,
    delivery: &str,
    address_id: Option<&str>,
    address: Option<&str>,
) -> Result<(), OrderCommandError> {
    let payment = parse_payment(payment)?;
    let delivery = parse_delivery(delivery)?;

    for item in items {
        session.toggle_selection(&ProductId::new(item.as_str()), true);
    }
    session.begin_checkout()?;
    session.set_payment_method(payment);
    session.set_delivery_type(delivery);
    if let Some(id) = address_id {
        session.set_delivery_location(DeliveryLocation::Saved(id.into()));
    } else if let Some(text) = address {
        session.set_delivery_location(DeliveryLocation::Custom(text.to_owned()));
    }

    if !session.can_submit()? {
        session.cancel_checkout();
        let missing = mearim_engine::checkout::CheckoutError::MissingDeliveryAddress;
        return Err(EngineError::from(missing).into());
    }

    tracing::info!("Preparing your order...");
    let handoff = session.submit().await?;
    let record = session.confirm_sent(Utc::now())?;

    tracing::info!("Order {} - total {}", record.id, record.total);
    tracing::info!("Open this link to send it on WhatsApp:");
    tracing::info!("  {}", handoff.url);
    Ok(())
}

/// Repeat a past order as-is, without re-running checkout.
pub fn reorder(session: &OrderSession, id: &str) -> Result<(), OrderCommandError> {
    let id = OrderId::new(id);
    match session.reorder(&id)? {
        Some(handoff) => {
            tracing::info!("Open this link to send it on WhatsApp:");
            tracing::info!("  {}", handoff.url);
        }
        None => tracing::warn!("No order with id {id}"),
    }
    Ok(())
}
