//! Recurring-order suggestion.
//!
//! The policy itself is pure: the most recent order qualifies as a suggestion
//! once it is at least an hour old, so the customer is not re-prompted right
//! after placing an order. On top of that sits per-session suppression: a
//! suggestion that was accepted or dismissed stays gone for the rest of the
//! session, even though it would still qualify. The suppression latch is
//! in-memory only and resets with the session.

use chrono::{DateTime, TimeDelta, Utc};

use mearim_core::ProductId;

use crate::history::OrderRecord;

/// Minimum age of the most recent order before it is suggested again.
pub const SUGGESTION_MIN_AGE: TimeDelta = TimeDelta::hours(1);

/// Pure suggestion policy over a most-recent-first history.
#[must_use]
pub fn qualifying_order(history: &[OrderRecord], now: DateTime<Utc>) -> Option<&OrderRecord> {
    let last = history.first()?;
    (now - last.date >= SUGGESTION_MIN_AGE).then_some(last)
}

/// Session-scoped advisor: the pure policy plus the dismissal latch.
#[derive(Debug, Default)]
pub struct RecurringOrderAdvisor {
    dismissed: bool,
}

impl RecurringOrderAdvisor {
    /// Creates an advisor with a fresh (unsuppressed) session.
    #[must_use]
    pub const fn new() -> Self {
        Self { dismissed: false }
    }

    /// The current suggestion, if the policy yields one and it has not been
    /// suppressed this session.
    #[must_use]
    pub fn suggest<'a>(
        &self,
        history: &'a [OrderRecord],
        now: DateTime<Utc>,
    ) -> Option<&'a OrderRecord> {
        if self.dismissed {
            return None;
        }
        qualifying_order(history, now)
    }

    /// Dismisses the suggestion for the remainder of the session.
    pub const fn dismiss(&mut self) {
        self.dismissed = true;
    }

    /// Accepts the current suggestion: returns the product ids of the
    /// suggested order (for seeding the selection) and suppresses the prompt
    /// for the rest of the session.
    pub fn accept(
        &mut self,
        history: &[OrderRecord],
        now: DateTime<Utc>,
    ) -> Option<Vec<ProductId>> {
        let ids = self
            .suggest(history, now)
            .map(|order| order.items.iter().map(|item| item.id.clone()).collect())?;
        self.dismissed = true;
        Some(ids)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mearim_core::{DeliveryType, OrderId, OrderStatus, PaymentMethod, Price};

    use crate::history::OrderItem;

    fn order_aged(now: DateTime<Utc>, minutes: i64) -> OrderRecord {
        OrderRecord {
            id: OrderId::new("order-1"),
            date: now - TimeDelta::minutes(minutes),
            items: vec![
                OrderItem {
                    id: mearim_core::ProductId::new("gas-ultragaz-13kg"),
                    name: "Botijão de Gás 13kg".to_owned(),
                    brand: "Ultragaz".to_owned(),
                    price: Price::from_centavos(12000),
                    quantity: 1,
                },
                OrderItem {
                    id: mearim_core::ProductId::new("water-cristalina-20l"),
                    name: "Galão de Água 20L".to_owned(),
                    brand: "Cristalina".to_owned(),
                    price: Price::from_centavos(800),
                    quantity: 1,
                },
            ],
            total: Price::from_centavos(12800),
            payment_method: PaymentMethod::Pix,
            delivery_type: DeliveryType::Entrega,
            delivery_address: Some("Rua A, 10".to_owned()),
            customer_name: "Maria".to_owned(),
            customer_phone: "(99) 98888-7777".to_owned(),
            status: OrderStatus::Completed,
        }
    }

    #[test]
    fn test_no_suggestion_for_empty_history() {
        let advisor = RecurringOrderAdvisor::new();
        assert!(advisor.suggest(&[], Utc::now()).is_none());
    }

    #[test]
    fn test_no_suggestion_under_an_hour() {
        let now = Utc::now();
        let history = vec![order_aged(now, 59)];
        let advisor = RecurringOrderAdvisor::new();
        assert!(advisor.suggest(&history, now).is_none());
    }

    #[test]
    fn test_suggestion_past_an_hour() {
        let now = Utc::now();
        let history = vec![order_aged(now, 61)];
        let advisor = RecurringOrderAdvisor::new();
        let suggested = advisor.suggest(&history, now).unwrap();
        assert_eq!(suggested.id, OrderId::new("order-1"));
    }

    #[test]
    fn test_dismissal_suppresses_for_the_session() {
        let now = Utc::now();
        let history = vec![order_aged(now, 61)];

        let mut advisor = RecurringOrderAdvisor::new();
        assert!(advisor.suggest(&history, now).is_some());

        advisor.dismiss();
        assert!(advisor.suggest(&history, now).is_none());
        // Still suppressed even though the policy would fire.
        assert!(advisor.suggest(&history, now + TimeDelta::hours(5)).is_none());
    }

    #[test]
    fn test_accept_yields_product_ids_and_suppresses() {
        let now = Utc::now();
        let history = vec![order_aged(now, 90)];

        let mut advisor = RecurringOrderAdvisor::new();
        let ids = advisor.accept(&history, now).unwrap();
        assert_eq!(
            ids,
            vec![
                mearim_core::ProductId::new("gas-ultragaz-13kg"),
                mearim_core::ProductId::new("water-cristalina-20l"),
            ]
        );

        assert!(advisor.suggest(&history, now).is_none());
        assert!(advisor.accept(&history, now).is_none());
    }

    #[test]
    fn test_only_the_most_recent_order_is_considered() {
        let now = Utc::now();
        // Most recent is too fresh; an older qualifying order must not leak.
        let history = vec![order_aged(now, 10), order_aged(now, 300)];
        let advisor = RecurringOrderAdvisor::new();
        assert!(advisor.suggest(&history, now).is_none());
    }
}
