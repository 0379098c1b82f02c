//! Domain enums for payment, delivery and order status.
//!
//! Wire names (serde renames) match the persisted key-value layout, which in
//! turn matches what the storefront always stored: `"pix"`, `"entrega"`,
//! `"completed"`, ... The `label()` methods return the human-facing pt-BR
//! text used in the outbound order message.

use serde::{Deserialize, Serialize};

/// How the customer intends to pay.
///
/// Payment method is a label only - there is no payment processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Pix,
    Dinheiro,
    Cartao,
}

impl PaymentMethod {
    /// Human-facing label for the order message.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pix => "PIX",
            Self::Dinheiro => "Dinheiro",
            Self::Cartao => "Cartão",
        }
    }
}

/// Whether the order is delivered or picked up at the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    #[default]
    Entrega,
    Retirada,
}

impl DeliveryType {
    /// Human-facing label for the order message.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Entrega => "Entrega",
            Self::Retirada => "Retirada no local",
        }
    }

    /// True when the order requires a delivery address.
    #[must_use]
    pub const fn requires_address(self) -> bool {
        matches!(self, Self::Entrega)
    }
}

/// Lifecycle status of a recorded order.
///
/// Records are only written after the customer confirms the handoff, so the
/// only status today is `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Completed,
}

/// Catalog product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Gas,
    Water,
}
