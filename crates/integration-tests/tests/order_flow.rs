//! End-to-end order flow: selection, checkout, handoff, history,
//! recurring suggestion and reorder, all over a file-backed store.

use chrono::{TimeDelta, Utc};
use mearim_core::{DeliveryType, PaymentMethod, Price, ProductId};
use mearim_engine::{CheckoutPhase, DeliveryLocation};
use mearim_integration_tests::TestContext;

fn gas() -> ProductId {
    ProductId::new("gas-ultragaz-13kg")
}

fn water() -> ProductId {
    ProductId::new("water-cristalina-20l")
}

// ============================================================================
// Checkout & Handoff
// ============================================================================

#[tokio::test]
async fn test_bulk_checkout_produces_wame_link_and_history() {
    let ctx = TestContext::new();
    let mut session = ctx.open();
    session
        .save_profile("Maria Silva", "(99) 98888-7777", "")
        .expect("save profile");
    session
        .addresses()
        .expect("address book")
        .add("Casa", "Rua das Flores, 123")
        .expect("add address");

    session.toggle_selection(&gas(), true);
    session.toggle_selection(&water(), true);
    session.begin_checkout().expect("begin checkout");
    session.set_payment_method(PaymentMethod::Dinheiro);

    let handoff = session.submit().await.expect("submit");
    assert_eq!(handoff.url.host_str(), Some("wa.me"));
    assert_eq!(handoff.url.path(), "/5599984201432");
    assert!(handoff.message.contains("Olá Atacarejo São Manoel"));
    assert!(handoff.message.contains("Total: R$ 128,00"));
    assert!(handoff.message.contains("*Forma de pagamento:* Dinheiro"));
    assert!(handoff.message.contains("*Endereço:* Rua das Flores, 123"));

    let record = session.confirm_sent(Utc::now()).expect("confirm");
    assert_eq!(record.total, Price::from_centavos(12_800));
    assert_eq!(session.checkout_phase(), CheckoutPhase::Idle);
    assert!(session.selection().is_empty());

    // A fresh session over the same store sees the recorded order.
    let reopened = ctx.open();
    let history = reopened.history().expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, record.id);
    assert_eq!(history[0].customer_name, "Maria Silva");
}

#[tokio::test]
async fn test_delivery_without_address_is_blocked_until_pickup_or_custom() {
    let ctx = TestContext::new();
    let mut session = ctx.open();

    session.buy_single(&gas()).expect("buy single");
    assert!(!session.can_submit().expect("can_submit"));
    assert!(session.submit().await.is_err());
    assert_eq!(session.checkout_phase(), CheckoutPhase::Configuring);

    session.set_delivery_location(DeliveryLocation::Custom("Rua B, 20".to_owned()));
    assert!(session.can_submit().expect("can_submit"));

    session.set_delivery_type(DeliveryType::Retirada);
    let handoff = session.submit().await.expect("submit pickup");
    assert!(!handoff.message.contains("*Endereço:*"));
    // Single-product orders carry no total block.
    assert!(!handoff.message.contains("Total:"));
}

#[tokio::test]
async fn test_retry_allows_adjusting_before_resend() {
    let ctx = TestContext::new();
    let mut session = ctx.open();

    session.buy_single(&gas()).expect("buy single");
    session.set_delivery_type(DeliveryType::Retirada);
    session.submit().await.expect("first submit");

    session.retry_checkout().expect("retry");
    assert_eq!(session.checkout_phase(), CheckoutPhase::Configuring);
    session.set_payment_method(PaymentMethod::Cartao);
    let handoff = session.submit().await.expect("second submit");
    assert!(handoff.message.contains("*Forma de pagamento:* Cartão"));
}

#[tokio::test]
async fn test_walkup_order_leaves_no_trace() {
    let ctx = TestContext::new();
    let mut session = ctx.open();

    session.buy_single(&water()).expect("buy single");
    session.set_delivery_type(DeliveryType::Retirada);
    session.submit().await.expect("submit");
    session.confirm_sent(Utc::now()).expect("confirm");

    let reopened = ctx.open();
    assert!(reopened.profile().is_none());
    assert!(reopened.history().expect("history").is_empty());
}

// ============================================================================
// Recurring suggestion & reorder
// ============================================================================

#[tokio::test]
async fn test_hour_old_order_becomes_a_suggestion() {
    let ctx = TestContext::new();
    let mut session = ctx.open();
    session
        .save_profile("Maria Silva", "(99) 98888-7777", "Rua A, 10")
        .expect("save profile");

    session.toggle_selection(&gas(), true);
    session.begin_checkout().expect("begin");
    session.submit().await.expect("submit");
    // Record the order as if it was confirmed two hours ago.
    session
        .confirm_sent(Utc::now() - TimeDelta::hours(2))
        .expect("confirm");

    let mut session = ctx.open();
    let suggestion = session
        .suggestion(Utc::now())
        .expect("suggestion")
        .expect("should suggest");
    assert_eq!(suggestion.items.len(), 1);

    assert!(session.accept_suggestion(Utc::now()).expect("accept"));
    assert!(session.selection().contains(&gas()));
    assert!(session.suggestion(Utc::now()).expect("suggestion").is_none());
}

#[tokio::test]
async fn test_fresh_order_is_not_suggested() {
    let ctx = TestContext::new();
    let mut session = ctx.open();
    session
        .save_profile("Maria Silva", "(99) 98888-7777", "Rua A, 10")
        .expect("save profile");

    session.toggle_selection(&gas(), true);
    session.begin_checkout().expect("begin");
    session.submit().await.expect("submit");
    session.confirm_sent(Utc::now()).expect("confirm");

    let session = ctx.open();
    assert!(session.suggestion(Utc::now()).expect("suggestion").is_none());
}

#[tokio::test]
async fn test_reorder_reuses_recorded_order_verbatim() {
    let ctx = TestContext::new();
    let mut session = ctx.open();
    session
        .save_profile("Maria Silva", "(99) 98888-7777", "Rua A, 10")
        .expect("save profile");

    session.toggle_selection(&gas(), true);
    session.toggle_selection(&water(), true);
    session.begin_checkout().expect("begin");
    session.set_payment_method(PaymentMethod::Dinheiro);
    session.submit().await.expect("submit");
    let record = session.confirm_sent(Utc::now()).expect("confirm");

    let reopened = ctx.open();
    let handoff = reopened
        .reorder(&record.id)
        .expect("reorder")
        .expect("order exists");
    assert!(handoff.message.contains("gostaria de repetir meu pedido"));
    assert!(handoff.message.contains("Total: R$ 128,00"));
    assert!(handoff.message.contains("*Forma de pagamento:* Dinheiro"));
    assert!(handoff.message.contains("*Obs:* Repetindo pedido do dia"));
}

// ============================================================================
// History cap
// ============================================================================

#[tokio::test]
async fn test_history_keeps_the_twenty_most_recent_orders() {
    let ctx = TestContext::new();
    let mut session = ctx.open();
    session
        .save_profile("Maria Silva", "(99) 98888-7777", "Rua A, 10")
        .expect("save profile");

    for _ in 0..25 {
        session.toggle_selection(&gas(), true);
        session.begin_checkout().expect("begin");
        session.submit().await.expect("submit");
        session.confirm_sent(Utc::now()).expect("confirm");
    }

    let history = ctx.open().history().expect("history");
    assert_eq!(history.len(), 20);
}
