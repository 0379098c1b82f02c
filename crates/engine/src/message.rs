//! Composition of the WhatsApp order message.
//!
//! The message is plain text with WhatsApp `*bold*` markers, assembled in a
//! fixed block order: greeting and item lines, total (bulk orders only),
//! customer identification (when a profile exists), then payment and
//! delivery details. Every price is rendered in Brazilian Real format.

use mearim_core::{DeliveryType, PaymentMethod, Price};

use crate::history::{OrderItem, OrderRecord};

/// Everything the composer needs to know about one order.
pub struct OrderSummary<'a> {
    pub items: &'a [OrderItem],
    /// Renders the `Total:` block. Single-product orders omit it.
    pub include_total: bool,
    /// `(name, phone)` of the identified customer, if any.
    pub customer: Option<(&'a str, &'a str)>,
    pub payment_method: PaymentMethod,
    pub delivery_type: DeliveryType,
    /// Resolved delivery address text. Ignored for pickup orders.
    pub address: &'a str,
}

/// Composes the handoff message for a new order.
#[must_use]
pub fn compose_order(merchant_name: &str, summary: &OrderSummary<'_>) -> String {
    compose(
        &format!("Olá {merchant_name}, gostaria de comprar:"),
        summary,
        None,
    )
}

/// Composes the handoff message for repeating a past order.
///
/// Mirrors [`compose_order`] but opens with the repeat greeting, always
/// renders the total, and closes with a note naming the original order date.
#[must_use]
pub fn compose_reorder(merchant_name: &str, record: &OrderRecord) -> String {
    let customer = (!record.customer_name.is_empty())
        .then_some((record.customer_name.as_str(), record.customer_phone.as_str()));
    let summary = OrderSummary {
        items: &record.items,
        include_total: true,
        customer,
        payment_method: record.payment_method,
        delivery_type: record.delivery_type,
        address: record.delivery_address.as_deref().unwrap_or(""),
    };
    let note = format!(
        "*Obs:* Repetindo pedido do dia {}",
        record.date.format("%d/%m/%Y %H:%M")
    );
    compose(
        &format!("Olá {merchant_name}, gostaria de repetir meu pedido:"),
        &summary,
        Some(&note),
    )
}

fn compose(greeting: &str, summary: &OrderSummary<'_>, note: Option<&str>) -> String {
    let mut message = greeting.to_owned();
    for item in summary.items {
        message.push_str(&format!(
            "\n- {} {} {} – {}",
            item.quantity,
            item.name,
            item.brand,
            item.line_total()
        ));
    }

    if summary.include_total {
        let total: Price = summary.items.iter().map(OrderItem::line_total).sum();
        message.push_str(&format!("\n\nTotal: {total}"));
    }

    if let Some((name, phone)) = summary.customer {
        message.push_str(&format!("\n\n*Cliente:* {name}\n*Telefone:* {phone}"));
    }

    message.push_str(&format!(
        "\n\n*Forma de pagamento:* {}\n*Tipo:* {}",
        summary.payment_method.label(),
        summary.delivery_type.label()
    ));

    if summary.delivery_type.requires_address() && !summary.address.trim().is_empty() {
        message.push_str(&format!("\n*Endereço:* {}", summary.address.trim()));
    }

    if let Some(note) = note {
        message.push_str(&format!("\n\n{note}"));
    }

    message
}
